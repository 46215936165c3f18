pub mod cors;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::infrastructure::config::Config;
use crate::{
    controllers::{health, speech::SpeechController},
    infrastructure::middleware::request_id_middleware,
};

pub use cors::cors_layer;

/// Build the application router with all routes and layers
pub fn build_router(config: Arc<Config>, speech_controller: Arc<SpeechController>) -> Router {
    // Speech route (public; authorization happens against the key validator)
    let speech_routes = Router::new()
        .route("/api/generate-speech", post(SpeechController::generate_speech))
        .with_state(speech_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(config.clone())
        .merge(speech_routes)
        // Each `Router::layer` call wraps the previous ones, so the last is outermost.
        // Request ids sit outside CORS so preflight answers carry one too
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins))
        .layer(axum::middleware::from_fn(request_id_middleware))
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    speech_controller: Arc<SpeechController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(config.clone(), speech_controller);

    // Start server
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
