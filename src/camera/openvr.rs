use std::ffi::{CStr, c_char, c_void};
use std::mem;

use openvr_sys as sys;

use super::TrackedCamera;
use crate::error::{Error, Result};
use crate::types::{DevicePose, FrameHeader, FrameSize, FrameType, Intrinsics};

/// A running OpenVR utility session; shut down on drop.
struct Session;

impl Session {
    fn init() -> Result<Session> {
        let mut error = sys::EVRInitError_VRInitError_None;
        unsafe {
            sys::VR_InitInternal(&mut error, sys::EVRApplicationType_VRApplication_Utility);
        }
        if error != sys::EVRInitError_VRInitError_None {
            return Err(Error::Init(init_error_description(error)));
        }
        log::debug!("OpenVR session started");
        Ok(Session)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        unsafe { sys::VR_ShutdownInternal() };
        log::debug!("OpenVR session shut down");
    }
}

fn init_error_description(error: sys::EVRInitError) -> String {
    let description = unsafe { sys::VR_GetVRInitErrorAsEnglishDescription(error) };
    if description.is_null() {
        format!("init error {}", error as i32)
    } else {
        unsafe { CStr::from_ptr(description) }
            .to_string_lossy()
            .into_owned()
    }
}

/// Fetches the C function table of `IVRTrackedCamera` from a live session.
fn load_tracked_camera(_session: &Session) -> Result<&'static sys::VR_IVRTrackedCamera_FnTable> {
    let mut magic = Vec::from(b"FnTable:".as_ref());
    magic.extend_from_slice(sys::IVRTrackedCamera_Version);
    let mut error = sys::EVRInitError_VRInitError_None;
    let table = unsafe { sys::VR_GetGenericInterface(magic.as_ptr() as *const c_char, &mut error) };
    if error != sys::EVRInitError_VRInitError_None {
        return Err(Error::Init(init_error_description(error)));
    }
    // The runtime keeps the table alive until VR_ShutdownInternal, which only
    // runs after the camera that borrows it is dropped.
    unsafe { (table as *const sys::VR_IVRTrackedCamera_FnTable).as_ref() }
        .ok_or(Error::BackendUnavailable("IVRTrackedCamera interface missing"))
}

fn frame_type_to_sys(frame_type: FrameType) -> sys::EVRTrackedCameraFrameType {
    match frame_type {
        FrameType::Distorted => sys::EVRTrackedCameraFrameType_VRTrackedCameraFrameType_Distorted,
        FrameType::Undistorted => {
            sys::EVRTrackedCameraFrameType_VRTrackedCameraFrameType_Undistorted
        }
        FrameType::MaximumUndistorted => {
            sys::EVRTrackedCameraFrameType_VRTrackedCameraFrameType_MaximumUndistorted
        }
    }
}

fn check(operation: &'static str, code: sys::EVRTrackedCameraError) -> Result<()> {
    if code == sys::EVRTrackedCameraError_VRTrackedCameraError_None {
        Ok(())
    } else if code == sys::EVRTrackedCameraError_VRTrackedCameraError_NoFrameAvailable {
        Err(Error::NoFrameAvailable)
    } else {
        Err(Error::Camera {
            operation,
            code: code as i32,
        })
    }
}

const MISSING_FUNCTION: Error = Error::BackendUnavailable("IVRTrackedCamera function table incomplete");

/// Front-facing camera of a tracked device, streamed through OpenVR.
pub struct OpenVrCamera {
    table: &'static sys::VR_IVRTrackedCamera_FnTable,
    device_index: sys::TrackedDeviceIndex_t,
    handle: sys::TrackedCameraHandle_t,
    // Dropped after `Drop::drop` released the handle.
    _session: Session,
}

impl OpenVrCamera {
    pub fn open(device_index: u32) -> Result<OpenVrCamera> {
        let session = Session::init()?;
        let table = load_tracked_camera(&session)?;

        let acquire = table.AcquireVideoStreamingService.ok_or(MISSING_FUNCTION)?;
        let mut handle: sys::TrackedCameraHandle_t = 0;
        check("AcquireVideoStreamingService", unsafe {
            acquire(device_index, &mut handle)
        })?;
        log::info!("acquired camera stream for device {}", device_index);

        Ok(OpenVrCamera {
            table,
            device_index,
            handle,
            _session: session,
        })
    }
}

impl Drop for OpenVrCamera {
    fn drop(&mut self) {
        if let Some(release) = self.table.ReleaseVideoStreamingService {
            let code = unsafe { release(self.handle) };
            if let Err(e) = check("ReleaseVideoStreamingService", code) {
                log::warn!("{}", e);
            }
        }
    }
}

impl TrackedCamera for OpenVrCamera {
    fn frame_size(&self, frame_type: FrameType) -> Result<FrameSize> {
        let get_size = self.table.GetCameraFrameSize.ok_or(MISSING_FUNCTION)?;
        let (mut width, mut height, mut buffer_size) = (0u32, 0u32, 0u32);
        check("GetCameraFrameSize", unsafe {
            get_size(
                self.device_index,
                frame_type_to_sys(frame_type),
                &mut width,
                &mut height,
                &mut buffer_size,
            )
        })?;
        Ok(FrameSize {
            width,
            height,
            buffer_size,
        })
    }

    fn intrinsics(&self, frame_type: FrameType) -> Result<Intrinsics> {
        let get_intrinsics = self.table.GetCameraIntrinsics.ok_or(MISSING_FUNCTION)?;
        let mut focal_length = sys::HmdVector2_t { v: [0.0; 2] };
        let mut center = sys::HmdVector2_t { v: [0.0; 2] };
        check("GetCameraIntrinsics", unsafe {
            get_intrinsics(
                self.device_index,
                0,
                frame_type_to_sys(frame_type),
                &mut focal_length,
                &mut center,
            )
        })?;
        Ok(Intrinsics::new(focal_length.v, center.v))
    }

    fn read_frame(&mut self, frame_type: FrameType, buffer: &mut [u8]) -> Result<FrameHeader> {
        let get_frame = self.table.GetVideoStreamFrameBuffer.ok_or(MISSING_FUNCTION)?;
        let mut header: sys::CameraVideoStreamFrameHeader_t = unsafe { mem::zeroed() };
        check("GetVideoStreamFrameBuffer", unsafe {
            get_frame(
                self.handle,
                frame_type_to_sys(frame_type),
                buffer.as_mut_ptr() as *mut c_void,
                buffer.len() as u32,
                &mut header,
                mem::size_of::<sys::CameraVideoStreamFrameHeader_t>() as u32,
            )
        })?;

        let pose = &header.trackedDevicePose;
        Ok(FrameHeader {
            width: header.nWidth,
            height: header.nHeight,
            bytes_per_pixel: header.nBytesPerPixel,
            sequence: header.nFrameSequence,
            pose: DevicePose::new(pose.mDeviceToAbsoluteTracking.m),
            pose_is_valid: pose.bPoseIsValid,
        })
    }
}
