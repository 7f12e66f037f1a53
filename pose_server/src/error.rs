//! Mapping of pipeline errors onto HTTP responses.
//!
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pose_core::PoseError;
use serde::{Deserialize, Serialize};

/// JSON body of every failed request.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError(pub PoseError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<PoseError> for ApiError {
    fn from(err: PoseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
