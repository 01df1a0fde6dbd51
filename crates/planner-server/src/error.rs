use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use planner_core::error::CoreError;
use serde::Serialize;

/// Client-facing error body, always `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error returned from API handlers; carries the HTTP status it maps to.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            // All engine errors are caused by malformed client input and
            // surface as validation failures, never as server faults.
            CoreError::MissingRule
            | CoreError::UnsupportedRule(_)
            | CoreError::InvalidOperand(_)
            | CoreError::InvalidStartDate(_)
            | CoreError::InvalidInput(_) => Self::bad_request(err.to_string()),
            CoreError::NotFound(_) => Self::not_found(err.to_string()),
            CoreError::Database(_) | CoreError::Migration(_) | CoreError::Io(_) => {
                tracing::error!(error = %err, "storage failure");
                Self::internal("internal storage error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}
