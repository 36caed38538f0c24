use rerun::RecordingStream;

use crate::types::DevicePose;

const TOPIC: &str = "/cam0";

/// Live view of the capture in a spawned rerun viewer.
pub struct Preview {
    recording: RecordingStream,
}

impl Preview {
    /// Spawns a viewer; `None` when it cannot be started, capture goes on without it.
    pub fn spawn(application_id: &str) -> Option<Preview> {
        match rerun::RecordingStreamBuilder::new(application_id).spawn() {
            Ok(recording) => Some(Preview { recording }),
            Err(e) => {
                log::warn!("preview disabled: {}", e);
                None
            }
        }
    }

    pub fn from_recording(recording: RecordingStream) -> Preview {
        Preview { recording }
    }

    /// Shows the encoded frame and the device position at capture `index`.
    pub fn log_frame(&self, index: usize, jpeg: &[u8], pose: &DevicePose) {
        self.recording.set_time_sequence("frame", index as i64);
        let image = rerun::EncodedImage::from_file_contents(jpeg.to_vec());
        if let Err(e) = self.recording.log(format!("{}/image", TOPIC), &image) {
            log::warn!("preview image: {}", e);
        }
        let position = rerun::Points3D::new([pose.translation()])
            .with_radii([rerun::Radius::new_ui_points(5.0)]);
        if let Err(e) = self.recording.log(format!("{}/device", TOPIC), &position) {
            log::warn!("preview pose: {}", e);
        }
    }
}
