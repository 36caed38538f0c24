use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use vr_recorder::Error;
use vr_recorder::camera::{Backend, open_camera};
use vr_recorder::recorder::{RecorderConfig, record};
use vr_recorder::types::FrameType;
use vr_recorder::visualization::Preview;

#[derive(Parser)]
#[command(version, about, author)]
struct VrRecorderCli {
    /// Number of frames to capture
    #[arg(short = 'n', default_value_t = 100)]
    n: usize,

    /// Path to data
    #[arg(short = 'p', default_value = "vr_data")]
    p: PathBuf,

    /// Tracked device whose camera streams, 0 is the headset
    #[arg(long, default_value_t = 0)]
    device_index: u32,

    /// Image variant delivered by the camera
    #[arg(long, value_enum, default_value = "undistorted")]
    frame_type: FrameType,

    /// Tracking runtime
    #[arg(long, value_enum, default_value = "openvr")]
    backend: Backend,

    /// Do not spawn the preview viewer
    #[arg(long)]
    no_preview: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = VrRecorderCli::parse();

    let config = RecorderConfig {
        frame_count: cli.n,
        output_dir: cli.p,
        device_index: cli.device_index,
        frame_type: cli.frame_type,
        ..Default::default()
    };

    let mut camera = match open_camera(cli.backend, config.device_index) {
        Ok(camera) => camera,
        Err(e @ Error::Init(_)) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let preview = if cli.no_preview {
        None
    } else {
        Preview::spawn("vr_recorder")
    };

    match record(camera.as_mut(), &config, preview.as_ref()) {
        Ok(summary) => {
            println!(
                "Captured {} frames in {}",
                summary.frames.len(),
                summary.output_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
