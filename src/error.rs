use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Longest collaborator error detail relayed back to the caller
pub const MAX_ERROR_DETAIL_CHARS: usize = 250;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Server configuration error")]
    Configuration(String),

    #[error("{0}")]
    BadRequest(String),

    /// Key validator refused the caller's key. The reason is surfaced verbatim.
    #[error("{reason}")]
    KeyRejected { status: StatusCode, reason: String },

    #[error("Could not reach API key validation service.")]
    ValidatorUnreachable(String),

    /// Speech API answered with a non-success status
    #[error("{detail}")]
    Upstream { status: StatusCode, detail: String },

    #[error("Error contacting speech service.")]
    SpeechUnreachable(String),

    #[error("Internal server error.")]
    Internal(String),
}

/// Error response structure - simplified to just message + status code
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::KeyRejected { status, .. } | Self::Upstream { status, .. } => *status,
            Self::Configuration(_)
            | Self::ValidatorUnreachable(_)
            | Self::SpeechUnreachable(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to simplified error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
        }
    }

    /// Internal detail that is logged but never sent to the caller
    fn log_detail(&self) -> Option<&str> {
        match self {
            Self::Configuration(detail)
            | Self::ValidatorUnreachable(detail)
            | Self::SpeechUnreachable(detail)
            | Self::Internal(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Caller mistakes are warnings, everything else is an error
        if status.is_client_error() {
            tracing::warn!(
                error = %self,
                status = %status.as_u16(),
                "Request rejected"
            );
        } else {
            tracing::error!(
                error = %self,
                detail = self.log_detail().unwrap_or_default(),
                status = %status.as_u16(),
                "Request failed"
            );
        }

        let error_response = self.to_response();

        (status, Json(error_response)).into_response()
    }
}

/// Truncate collaborator error text to at most `MAX_ERROR_DETAIL_CHARS` characters
pub fn truncate_detail(detail: &str) -> String {
    detail.chars().take(MAX_ERROR_DETAIL_CHARS).collect()
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
