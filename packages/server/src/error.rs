use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{BatchInterrupted, StorageError};
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    #[schema(example = false)]
    pub success: bool,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `PASSWORD_ERROR`,
    /// `STORAGE_UNAVAILABLE`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "please enter a name")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    PasswordMismatch,
    /// The storage backend could not answer. Never reported as "available".
    StorageUnavailable(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            // Client-side mistakes are answered with 200 and `success: false`,
            // which is what the landing page script expects.
            AppError::Validation(msg) => (
                StatusCode::OK,
                ErrorBody {
                    success: false,
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::PasswordMismatch => (
                StatusCode::OK,
                ErrorBody {
                    success: false,
                    code: "PASSWORD_ERROR",
                    message: "password error".into(),
                },
            ),
            // Logged with its underlying cause by `From<StorageError>`.
            AppError::StorageUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    success: false,
                    code: "STORAGE_UNAVAILABLE",
                    message: msg,
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        success: false,
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable(_) | StorageError::Malformed(_) => {
                tracing::error!("Storage unavailable: {err}");
                AppError::StorageUnavailable(
                    "name storage is temporarily unavailable, please try again later".into(),
                )
            }
            // The registry turns conflicts into a normal "taken" result, so
            // one reaching here is a bug.
            StorageError::Conflict(key) => {
                AppError::Internal(format!("unhandled conflict for key {key}"))
            }
            StorageError::Backend(detail) => AppError::Internal(detail),
        }
    }
}

impl From<BatchInterrupted> for AppError {
    fn from(err: BatchInterrupted) -> Self {
        let committed = err.partial.added.len();
        match AppError::from(err.source) {
            AppError::StorageUnavailable(msg) => AppError::StorageUnavailable(format!(
                "{msg} ({committed} name(s) were added before the failure)"
            )),
            other => other,
        }
    }
}
