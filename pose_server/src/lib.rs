//! HTTP API of the yoga pose classifier.
pub mod endpoints;
pub mod error;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Extension, Router,
};
use pose_core::PoseService;
use tower_http::cors::CorsLayer;

use crate::endpoints::{health, predict};

/// Build the API router around an already constructed pose service.
///
/// Browsers may call the API from `cors_origin`; preflight requests are answered
/// by the CORS layer. Request bodies are not size limited, photos of any size are
/// accepted.
pub fn router(service: Arc<PoseService>, cors_origin: &str) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/api/predict", post(predict))
        .route("/api/health", get(health))
        .layer(Extension(service))
        .layer(DefaultBodyLimit::disable())
        .layer(cors);

    Ok(app)
}
