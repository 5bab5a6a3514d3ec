//! Mapping of [`WriteError`] onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::error::WriteError;

#[derive(Debug)]
pub struct ApiError(pub WriteError);

impl From<WriteError> for ApiError {
    fn from(err: WriteError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = if self.0.is_client_error() {
            tracing::warn!("Rejected request: {}", self.0);
            "Invalid request data"
        } else {
            tracing::error!("Write failed: {}", self.0);
            "Error writing data"
        };
        let body = json!({ "message": message, "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}
