use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::{
    domain::speech::{SpeechRequest, SpeechService, SpeechServiceApi, SpeechSynthesisResult},
    error::{AppError, AppResult},
};

/// Header carrying the shared secret of trusted internal callers
pub const X_INTERNAL_SECRET: &str = "x-internal-secret";

pub struct SpeechController {
    speech_service: Arc<SpeechService>,
}

impl SpeechController {
    pub fn new(speech_service: Arc<SpeechService>) -> Self {
        Self { speech_service }
    }

    /// POST /api/generate-speech - Relay text or SSML to the speech provider
    pub async fn generate_speech(
        State(controller): State<Arc<SpeechController>>,
        headers: HeaderMap,
        payload: Result<Json<SpeechRequest>, JsonRejection>,
    ) -> AppResult<Response> {
        let Json(request) =
            payload.map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e.body_text())))?;

        let bypass_secret = headers
            .get(X_INTERNAL_SECRET)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let result = controller
            .speech_service
            .synthesize(request, bypass_secret)
            .await
            .map_err(AppError::from)?;

        audio_response(result)
    }
}

/// Audio body plus the metadata headers
fn audio_response(result: SpeechSynthesisResult) -> AppResult<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.content_type)
        .header("X-Character-Count", result.char_count)
        .header("X-Voice-Used", result.voice.as_str())
        .body(Body::from(result.audio_data))
        .map_err(|e| AppError::Internal(format!("Failed to build audio response: {}", e)))
}
