use std::collections::VecDeque;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::TrackedCamera;
use crate::error::{Error, Result};
use crate::types::{DevicePose, FrameHeader, FrameSize, FrameType, Intrinsics};

const ORBIT_RADIUS: f32 = 0.5;
const HEAD_HEIGHT: f32 = 1.6;
const RADIANS_PER_FRAME: f32 = 0.05;

/// Outcome forced onto an upcoming [`SimulatedCamera::read_frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    NoFrame,
    Camera(i32),
}

/// Synthetic headset camera for dry runs and tests.
///
/// Frames are seeded noise, so the same sequence number always yields the same
/// bytes, and the device orbits the origin at head height.
pub struct SimulatedCamera {
    frame_size: FrameSize,
    intrinsics: Intrinsics,
    bytes_per_pixel: u32,
    sequence: u32,
    faults: VecDeque<Fault>,
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self::new(612, 460, 4)
    }
}

impl SimulatedCamera {
    pub fn new(width: u32, height: u32, bytes_per_pixel: u32) -> SimulatedCamera {
        SimulatedCamera {
            frame_size: FrameSize {
                width,
                height,
                buffer_size: width * height * bytes_per_pixel,
            },
            intrinsics: Intrinsics::new(
                [0.45 * width as f32, 0.45 * width as f32],
                [width as f32 / 2.0, height as f32 / 2.0],
            ),
            bytes_per_pixel,
            sequence: 0,
            faults: VecDeque::new(),
        }
    }

    pub fn with_intrinsics(mut self, intrinsics: Intrinsics) -> Self {
        self.intrinsics = intrinsics;
        self
    }

    /// Queues faults that the next reads return, in order, before frames resume.
    pub fn with_faults(mut self, faults: impl IntoIterator<Item = Fault>) -> Self {
        self.faults.extend(faults);
        self
    }

    pub fn pose_at(sequence: u32) -> DevicePose {
        let angle = sequence as f32 * RADIANS_PER_FRAME;
        let (s, c) = angle.sin_cos();
        DevicePose::new([
            [c, 0.0, s, ORBIT_RADIUS * c],
            [0.0, 1.0, 0.0, HEAD_HEIGHT],
            [-s, 0.0, c, ORBIT_RADIUS * s],
        ])
    }

    pub fn frame_bytes(&self, sequence: u32) -> Vec<u8> {
        let mut bytes = vec![0u8; self.frame_len()];
        ChaCha8Rng::seed_from_u64(sequence as u64).fill_bytes(&mut bytes);
        bytes
    }

    fn frame_len(&self) -> usize {
        (self.frame_size.width * self.frame_size.height * self.bytes_per_pixel) as usize
    }
}

impl TrackedCamera for SimulatedCamera {
    fn frame_size(&self, _frame_type: FrameType) -> Result<FrameSize> {
        Ok(self.frame_size)
    }

    fn intrinsics(&self, _frame_type: FrameType) -> Result<Intrinsics> {
        Ok(self.intrinsics)
    }

    fn read_frame(&mut self, _frame_type: FrameType, buffer: &mut [u8]) -> Result<FrameHeader> {
        match self.faults.pop_front() {
            Some(Fault::NoFrame) => return Err(Error::NoFrameAvailable),
            Some(Fault::Camera(code)) => {
                return Err(Error::Camera {
                    operation: "GetVideoStreamFrameBuffer",
                    code,
                });
            }
            None => {}
        }

        let len = self.frame_len();
        if buffer.len() < len {
            return Err(Error::BufferTooSmall {
                expected: len,
                actual: buffer.len(),
            });
        }
        self.sequence += 1;
        buffer[..len].copy_from_slice(&self.frame_bytes(self.sequence));

        Ok(FrameHeader {
            width: self.frame_size.width,
            height: self.frame_size.height,
            bytes_per_pixel: self.bytes_per_pixel,
            sequence: self.sequence,
            pose: Self::pose_at(self.sequence),
            pose_is_valid: true,
        })
    }
}
