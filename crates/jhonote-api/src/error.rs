//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

/// Error returned by every handler. Rendered as `{"error": message}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("{message}")]
    BulkIncomplete {
        succeeded: usize,
        failed: usize,
        message: String,
    },
    #[error(transparent)]
    Internal(jhonote_core::Error),
}

impl From<jhonote_core::Error> for ApiError {
    fn from(err: jhonote_core::Error) -> Self {
        use jhonote_core::Error;
        match err {
            Error::Validation(msg) => ApiError::BadRequest(msg),
            Error::NoteNotFound(id) => ApiError::NotFound(format!("Note {} not found", id)),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::Unauthenticated(msg) => ApiError::Unauthorized(msg),
            Error::StoreUnavailable(msg) => ApiError::Unavailable(msg),
            Error::BulkIncomplete {
                succeeded,
                failed,
                message,
            } => ApiError::BulkIncomplete {
                succeeded,
                failed,
                message,
            },
            other => ApiError::Internal(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BulkIncomplete { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::BulkIncomplete {
                succeeded,
                failed,
                message,
            } => {
                error!(succeeded, failed, error = %message, "Bulk request incomplete");
                json!({
                    "error": format!("{} succeeded, {} failed", succeeded, failed),
                    "succeeded": succeeded,
                    "failed": failed,
                })
            }
            ApiError::Internal(err) => {
                error!(error = %err, "Request failed");
                json!({ "error": err.to_string() })
            }
            ApiError::Unavailable(msg) => {
                error!(error = %msg, "Note store unavailable");
                json!({ "error": "Note store unavailable" })
            }
            other => {
                warn!(status = status.as_u16(), error = %other, "Request rejected");
                json!({ "error": other.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}
