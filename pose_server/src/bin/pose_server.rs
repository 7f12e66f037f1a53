//! Pose server binary.
//!
use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use pose_core::{
    logging::{self, LogConfig},
    LabelSet, PoseService,
};
use pose_server::router;

#[derive(Parser, Debug)]
#[clap(author, version)]
struct Args {
    /// Address to serve the HTTP API on
    #[clap(long, default_value = "127.0.0.1:5000")]
    address: String,

    /// Path of the ONNX pose model
    #[clap(long, default_value = "yoga_pose_model.onnx")]
    model_path: PathBuf,

    /// Origin that browsers may call the API from
    #[clap(long, default_value = "http://localhost:3000")]
    cors_origin: String,

    /// Log level (off, error, warn, info, debug, trace)
    #[clap(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,

    /// Directory for the daily log files
    #[clap(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level.parse().map_err(|_| format!("unknown log level {level}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logger
    logging::init(&LogConfig {
        level: args.log_level,
        dir: Some(args.log_dir.clone()),
        file_prefix: "pose_api".into(),
    })?;

    log::info!("=== Yoga pose API starting ===");
    log::info!("Address: {}", &args.address);

    // Without a model there is nothing to serve
    let service = match PoseService::load(&args.model_path, LabelSet::default()) {
        Ok(service) => Arc::new(service),
        Err(err) => {
            log::error!("{err}");
            log::error!("Model could not be loaded, shutting down");
            return Err(err.into());
        }
    };

    let app = router(service, &args.cors_origin)?;

    // Serve HTTP server
    let addr: SocketAddr = args.address.parse()?;
    log::info!("Serving on http://{addr}");
    axum::Server::bind(&addr)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;

    Ok(())
}
