use crate::error::{truncate_detail, AppError};
use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum SpeechServiceError {
    #[error("speech service is not configured: {0}")]
    NotConfigured(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("api key rejected ({status}): {reason}")]
    KeyRejected { status: StatusCode, reason: String },
    #[error("key validator unreachable: {0}")]
    ValidatorUnreachable(String),
    #[error("speech api returned {status}: {detail}")]
    Upstream { status: StatusCode, detail: String },
    #[error("speech api unreachable: {0}")]
    SpeechUnreachable(String),
}

impl From<SpeechServiceError> for AppError {
    fn from(err: SpeechServiceError) -> Self {
        match err {
            SpeechServiceError::NotConfigured(msg) => AppError::Configuration(msg),
            SpeechServiceError::Invalid(msg) => AppError::BadRequest(msg),
            SpeechServiceError::KeyRejected { status, reason } => {
                AppError::KeyRejected { status, reason }
            }
            SpeechServiceError::ValidatorUnreachable(msg) => AppError::ValidatorUnreachable(msg),
            SpeechServiceError::Upstream { status, detail } => AppError::Upstream {
                status,
                detail: truncate_detail(&detail),
            },
            SpeechServiceError::SpeechUnreachable(msg) => AppError::SpeechUnreachable(msg),
        }
    }
}
