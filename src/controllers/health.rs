use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use crate::infrastructure::config::Config;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready once the speech credential is configured
pub async fn health_ready(State(config): State<Arc<Config>>) -> impl IntoResponse {
    match config.speech_credentials() {
        Some(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "tts": "configured",
                "key_validation": config.key_validation_url,
            })),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "tts": "not_configured",
                "key_validation": config.key_validation_url,
            })),
        ),
    }
}
