use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::data::repositories::StoreError;

#[derive(Error, Debug)]
pub enum SrsError {
    #[error("User not authenticated")]
    NotAuthenticated,
    #[error("Review storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
    #[error("Word lookup failed: {0}")]
    WordLookupFailed(String),
    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl SrsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SrsError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            SrsError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            SrsError::WordLookupFailed(_) => StatusCode::BAD_GATEWAY,
            SrsError::TaskFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SrsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("SRS request failed: {}", self);
        }

        let body = json!({
            "error": self.to_string(),
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}
