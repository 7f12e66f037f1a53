//! Endpoints of HTTP server.
//!
use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use axum::{body::Bytes, extract::ConnectInfo, http::StatusCode, Extension, Json};
use pose_core::{frame::decode_base64_image, PoseError, PoseService, Prediction};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Body of a prediction request.
#[derive(Debug, Deserialize, Serialize)]
pub struct PredictRequest {
    /// Base64 encoded image, optionally as a `data:` URI.
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Health check endpoint. Healthy means the classifier is loaded.
pub async fn health(
    Extension(service): Extension<Arc<PoseService>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> (StatusCode, Json<HealthResponse>) {
    let client = client_ip(connect_info);
    log::info!("Health check requested - IP: {client}");

    if !service.is_loaded() {
        log::error!("Health check failed, model not loaded - IP: {client}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse {
                status: "error".into(),
                message: "Model not loaded".into(),
            }),
        );
    }

    log::info!("Health check passed - IP: {client}");
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
            message: "API is running and the model is loaded".into(),
        }),
    )
}

/// Classify the pose in a base64 encoded image.
pub async fn predict(
    Extension(service): Extension<Arc<PoseService>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> Result<Json<Prediction>, ApiError> {
    let client = client_ip(connect_info);
    let request_id = request_id(&client);
    log::info!("[{request_id}] New prediction request - IP: {client}");

    let start = Instant::now();
    match run_prediction(service, &body, &request_id).await {
        Ok(prediction) => {
            log::info!(
                "[{request_id}] Prediction done: {} ({:.2}%) - took {:.3}s",
                prediction.pose,
                prediction.confidence,
                start.elapsed().as_secs_f32()
            );
            Ok(Json(prediction))
        }
        Err(err) => {
            if err.is_client_error() {
                log::warn!("[{request_id}] {err}");
            } else {
                log::error!("[{request_id}] {err}");
            }
            Err(ApiError(err))
        }
    }
}

async fn run_prediction(
    service: Arc<PoseService>,
    body: &[u8],
    request_id: &str,
) -> Result<Prediction, PoseError> {
    if !service.is_loaded() {
        return Err(PoseError::ModelNotLoaded);
    }

    let payload = image_field(body)?;
    log::debug!("[{request_id}] Base64 image received, decoding");

    let frame = decode_base64_image(&payload)?;
    log::debug!(
        "[{request_id}] Running model on {}x{} image",
        frame.width(),
        frame.height()
    );

    tokio::task::spawn_blocking(move || service.classify(&frame))
        .await
        .map_err(|err| PoseError::Inference(err.to_string()))?
}

/// Extract the `image` field. Anything but a JSON object carrying it counts as missing.
fn image_field(body: &[u8]) -> Result<String, PoseError> {
    serde_json::from_slice::<PredictRequest>(body)
        .ok()
        .and_then(|request| request.image)
        .ok_or(PoseError::MissingInput)
}

fn client_ip(connect_info: Option<ConnectInfo<SocketAddr>>) -> String {
    connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".into())
}

/// `<unix seconds>-<client ip>`
fn request_id(client: &str) -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("{secs}-{client}")
}
