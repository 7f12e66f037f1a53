//! Live webcam pose classifier.
//!
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use pose_cam::{
    live,
    overlay::OverlayRenderer,
    sensors::{PixelFormat, V4lCamera},
    window::PoseWindow,
    Error,
};
use pose_core::{
    logging::{self, LogConfig},
    LabelSet, PoseService,
};

#[derive(Parser, Debug)]
#[clap(author, version)]
struct Args {
    /// Video device to capture from
    #[clap(long, default_value = "/dev/video0")]
    device: String,

    /// Pixel format requested from the camera (MJPG, BGR3 or RGB3)
    #[clap(long, default_value = "MJPG")]
    format: PixelFormat,

    /// Capture resolution as WIDTHxHEIGHT, the highest supported if omitted
    #[clap(long, value_parser = parse_resolution)]
    resolution: Option<(u32, u32)>,

    /// Frames per second, the highest supported if omitted
    #[clap(long)]
    frame_rate: Option<u32>,

    /// Path of the ONNX pose model
    #[clap(long, default_value = "yoga_pose_model.onnx")]
    model_path: PathBuf,

    /// TrueType font for the on-screen text
    #[clap(long)]
    font: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[clap(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,
}

fn parse_resolution(resolution: &str) -> Result<(u32, u32), String> {
    let invalid = || format!("invalid resolution {resolution}, expected e.g. 1280x720");
    let (width, height) = resolution.split_once('x').ok_or_else(invalid)?;
    Ok((
        width.parse().map_err(|_| invalid())?,
        height.parse().map_err(|_| invalid())?,
    ))
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level.parse().map_err(|_| format!("unknown log level {level}"))
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    logging::init(&LogConfig {
        level: args.log_level,
        dir: None,
        file_prefix: "pose_cam".into(),
    })?;

    // Keep going without a model, every frame then says so
    let service = PoseService::load(&args.model_path, LabelSet::default()).unwrap_or_else(|err| {
        log::error!("{err}");
        PoseService::without_model(LabelSet::default())
    });

    let overlay = match &args.font {
        Some(path) => OverlayRenderer::from_font_file(path)?,
        None => {
            log::warn!("No font given, showing the prediction in the window title only");
            OverlayRenderer::without_font()
        }
    };

    let mut camera = V4lCamera::open(
        &args.device,
        args.format,
        args.resolution,
        args.frame_rate.map(|fps| (1, fps)),
    )?;
    let mut window = PoseWindow::new("Yoga pose classifier");

    log::info!("Live pose detection started, press ESC or q to quit");
    live::run(&mut camera, &mut window, &service, &overlay)?;
    log::info!("Yoga pose detection closed");

    Ok(())
}
