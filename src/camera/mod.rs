#[cfg(feature = "openvr")]
pub mod openvr;
pub mod simulated;

pub use simulated::SimulatedCamera;

use crate::error::Result;
use crate::types::{FrameHeader, FrameSize, FrameType, Intrinsics};

/// A camera streaming handle inside an open tracking session.
///
/// Implementations own both the session and the streaming handle and release
/// them on drop, handle first.
pub trait TrackedCamera {
    fn frame_size(&self, frame_type: FrameType) -> Result<FrameSize>;
    fn intrinsics(&self, frame_type: FrameType) -> Result<Intrinsics>;

    /// Copies the latest frame into `buffer`.
    ///
    /// Returns [`crate::Error::NoFrameAvailable`] when the device has nothing new yet.
    fn read_frame(&mut self, frame_type: FrameType, buffer: &mut [u8]) -> Result<FrameHeader>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    #[default]
    #[value(name = "openvr")]
    OpenVr,
    Simulated,
}

/// Opens a tracking session and acquires streaming for `device_index`.
pub fn open_camera(backend: Backend, device_index: u32) -> Result<Box<dyn TrackedCamera>> {
    match backend {
        Backend::OpenVr => open_openvr(device_index),
        Backend::Simulated => Ok(Box::new(SimulatedCamera::default())),
    }
}

#[cfg(feature = "openvr")]
fn open_openvr(device_index: u32) -> Result<Box<dyn TrackedCamera>> {
    Ok(Box::new(openvr::OpenVrCamera::open(device_index)?))
}

#[cfg(not(feature = "openvr"))]
fn open_openvr(_device_index: u32) -> Result<Box<dyn TrackedCamera>> {
    Err(crate::Error::BackendUnavailable(
        "built without the `openvr` feature",
    ))
}
