use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use crate::camera::TrackedCamera;
use crate::error::{Error, Result};
use crate::frame::frame_to_image;
use crate::io::{METADATA_FILE_NAME, encode_jpeg, prepare_output_dir, write_jpeg};
use crate::metadata::MetadataWriter;
use crate::types::{DevicePose, FrameHeader, FrameSize, FrameType, Intrinsics};
use crate::visualization::Preview;

#[derive(Debug, Clone)]
pub struct RecorderConfig {
    pub frame_count: usize,
    pub output_dir: PathBuf,
    /// Tracked device whose camera streams, 0 is the headset.
    pub device_index: u32,
    pub frame_type: FrameType,
    pub jpeg_quality: u8,
    /// Sleep between polls while the device has no new frame.
    pub poll_interval: Duration,
    /// How long one frame may stay unavailable before it counts as a failure.
    pub frame_timeout: Duration,
    pub max_consecutive_failures: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            frame_count: 100,
            output_dir: PathBuf::from("vr_data"),
            device_index: 0,
            frame_type: FrameType::Undistorted,
            jpeg_quality: crate::io::DEFAULT_JPEG_QUALITY,
            poll_interval: Duration::from_millis(5),
            frame_timeout: Duration::from_secs(2),
            max_consecutive_failures: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub file_name: String,
    /// Device counter, reported but not persisted.
    pub sequence: u32,
    pub pose: DevicePose,
}

#[derive(Debug, Clone)]
pub struct CaptureSummary {
    pub output_dir: PathBuf,
    pub frame_size: FrameSize,
    pub intrinsics: Intrinsics,
    pub frames: Vec<CapturedFrame>,
    /// Frame attempts that were logged and retried.
    pub failures: usize,
}

/// Runs one capture session: intrinsics snapshot, then `frame_count` frames.
///
/// Frame-level failures are logged and the same index is retried, so a
/// finished run always has images `0..frame_count` with matching metadata.
/// Anything that prevents writing the metadata aborts the run.
pub fn record(
    camera: &mut dyn TrackedCamera,
    config: &RecorderConfig,
    preview: Option<&Preview>,
) -> Result<CaptureSummary> {
    let output_dir = prepare_output_dir(&config.output_dir)?;

    let frame_size = camera.frame_size(config.frame_type)?;
    let intrinsics = camera.intrinsics(config.frame_type)?;
    log::info!(
        "width: {} height: {} buffer size: {}",
        frame_size.width,
        frame_size.height,
        frame_size.buffer_size
    );
    log::info!("intrinsics: {:?}", intrinsics);

    let mut metadata = MetadataWriter::create(&output_dir.join(METADATA_FILE_NAME))?;
    metadata.write_size("image_size", frame_size.width, frame_size.height)?;
    metadata.write_matrix("camera_intrinsics", &intrinsics.camera_matrix())?;
    metadata.flush()?;

    let pb = ProgressBar::new(config.frame_count as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
        pb.set_style(style);
    }

    let mut frames = Vec::with_capacity(config.frame_count);
    let mut failures = 0;
    let mut consecutive_failures = 0;
    let mut buffer = vec![0u8; frame_size.buffer_size as usize];

    while frames.len() < config.frame_count {
        let index = frames.len();
        match capture_frame(camera, config, &output_dir, index, &mut buffer, preview) {
            Ok((file_name, header)) => {
                metadata.write_str(&format!("image_path{}", index), &file_name)?;
                metadata.write_matrix(&format!("pose{}", index), &header.pose.to_na_matrix())?;
                metadata.flush()?;

                log::debug!("sequence number: {}", header.sequence);
                if !header.pose_is_valid {
                    log::warn!("frame {}: device reported an invalid pose", index);
                }
                pb.set_message(format!("seq {}", header.sequence));
                pb.inc(1);

                frames.push(CapturedFrame {
                    file_name,
                    sequence: header.sequence,
                    pose: header.pose,
                });
                consecutive_failures = 0;
            }
            Err(e) => {
                failures += 1;
                consecutive_failures += 1;
                log::warn!("frame {}: {}", index, e);
                if consecutive_failures >= config.max_consecutive_failures {
                    pb.abandon();
                    return Err(Error::TooManyFailures(consecutive_failures));
                }
            }
        }
    }
    pb.finish();

    let summary = CaptureSummary {
        output_dir,
        frame_size,
        intrinsics,
        frames,
        failures,
    };
    log::info!(
        "captured {} frames into {} ({} failed attempts)",
        summary.frames.len(),
        summary.output_dir.display(),
        summary.failures
    );
    Ok(summary)
}

fn capture_frame(
    camera: &mut dyn TrackedCamera,
    config: &RecorderConfig,
    output_dir: &Path,
    index: usize,
    buffer: &mut [u8],
    preview: Option<&Preview>,
) -> Result<(String, FrameHeader)> {
    let header = read_frame_blocking(camera, config, buffer)?;
    let img = frame_to_image(&header, buffer)?;
    let jpeg = encode_jpeg(&img, config.jpeg_quality)?;
    if let Some(preview) = preview {
        preview.log_frame(index, &jpeg, &header.pose);
    }
    let file_name = write_jpeg(output_dir, index, &jpeg)?;
    Ok((file_name, header))
}

/// Polls until the device delivers a frame or `frame_timeout` elapses.
fn read_frame_blocking(
    camera: &mut dyn TrackedCamera,
    config: &RecorderConfig,
    buffer: &mut [u8],
) -> Result<FrameHeader> {
    let start = Instant::now();
    loop {
        match camera.read_frame(config.frame_type, buffer) {
            Err(Error::NoFrameAvailable) if start.elapsed() < config.frame_timeout => {
                thread::sleep(config.poll_interval);
            }
            result => return result,
        }
    }
}
