use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use speech_relay::controllers::speech::SpeechController;
use speech_relay::domain::speech::SpeechService;
use speech_relay::infrastructure::config::{Config, LogFormat};
use speech_relay::infrastructure::http::start_http_server;
use speech_relay::infrastructure::repositories::{AzureTtsRepository, HttpKeyValidationRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting speech relay on {}:{}",
        config.host,
        config.port
    );

    // Missing speech credentials do not stop startup; requests fail until they are set
    match config.speech_credentials() {
        Some(credentials) => tracing::info!(
            endpoint = %credentials.endpoint,
            output_format = %config.azure_output_format,
            "Azure speech configured"
        ),
        None => tracing::warn!(
            "AZURE_SPEECH_KEY or AZURE_SPEECH_REGION not set. Speech requests will fail with a configuration error"
        ),
    }

    tracing::info!(
        key_validation_url = %config.key_validation_url,
        bypass_enabled = config.internal_bypass_secret.is_some(),
        allowed_origins = ?config.allowed_origins,
        development = config.is_development(),
        "Key validation configured"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    let key_validation_repo = Arc::new(HttpKeyValidationRepository::new(
        config.key_validation_url.clone(),
    ));
    let tts_repo = Arc::new(AzureTtsRepository::new(config.azure_output_format.clone()));

    // 2. Instantiate services
    let speech_service = Arc::new(SpeechService::new(
        key_validation_repo,
        tts_repo,
        config.clone(),
    ));

    // 3. Instantiate controllers
    let speech_controller = Arc::new(SpeechController::new(speech_service));

    // Start HTTP server with all routes
    start_http_server(config, speech_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "speech_relay=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "speech_relay=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
