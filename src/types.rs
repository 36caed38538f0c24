use nalgebra as na;

/// Image variant delivered by the camera subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FrameType {
    Distorted,
    #[default]
    Undistorted,
    MaximumUndistorted,
}

/// Frame geometry reported once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
    /// Bytes the runtime needs to hold one frame.
    pub buffer_size: u32,
}

/// Pinhole parameters of the tracked camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl Intrinsics {
    pub fn new(focal_length: [f32; 2], center: [f32; 2]) -> Intrinsics {
        Intrinsics {
            fx: focal_length[0],
            fy: focal_length[1],
            cx: center[0],
            cy: center[1],
        }
    }

    /// `[[fx, 0, cx], [0, fy, cy], [0, 0, 1]]`
    pub fn camera_matrix(&self) -> na::Matrix3<f32> {
        na::Matrix3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }
}

/// Device-to-absolute-tracking transform, row-major 3x4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePose {
    pub m: [[f32; 4]; 3],
}

impl DevicePose {
    pub const IDENTITY: DevicePose = DevicePose {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };

    pub fn new(m: [[f32; 4]; 3]) -> DevicePose {
        DevicePose { m }
    }

    pub fn to_na_matrix(&self) -> na::Matrix3x4<f32> {
        na::Matrix3x4::from_fn(|r, c| self.m[r][c])
    }

    pub fn translation(&self) -> [f32; 3] {
        [self.m[0][3], self.m[1][3], self.m[2][3]]
    }
}

impl Default for DevicePose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-frame header filled in alongside the pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameHeader {
    pub width: u32,
    pub height: u32,
    pub bytes_per_pixel: u32,
    /// Monotonic counter maintained by the device.
    pub sequence: u32,
    pub pose: DevicePose,
    pub pose_is_valid: bool,
}
