use super::dto::SpeechRequest;
use super::error::SpeechServiceError;
use super::input::SpeechInput;
use crate::infrastructure::config::{Config, SpeechCredentials};
use crate::infrastructure::repositories::{KeyValidationRepository, KeyVerdict, TtsError, TtsRepository};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SpeechSynthesisResult {
    pub audio_data: Vec<u8>,
    pub content_type: &'static str,
    pub char_count: usize,
    pub voice: String,
}

pub struct SpeechService {
    key_validation_repo: Arc<dyn KeyValidationRepository>,
    tts_repo: Arc<dyn TtsRepository>,
    config: Arc<Config>,
}

impl SpeechService {
    pub fn new(
        key_validation_repo: Arc<dyn KeyValidationRepository>,
        tts_repo: Arc<dyn TtsRepository>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            key_validation_repo,
            tts_repo,
            config,
        }
    }
}

#[async_trait]
pub trait SpeechServiceApi: Send + Sync {
    /// Relay a speech request to the speech provider
    ///
    /// This operation:
    /// - Validates the text/voice or markup in the request
    /// - Validates the caller's API key, unless the bypass secret matches
    /// - Calls the speech provider with the server-held credential
    ///
    /// Returns the provider's audio unmodified along with request metadata
    async fn synthesize(
        &self,
        request: SpeechRequest,
        bypass_secret: Option<String>,
    ) -> Result<SpeechSynthesisResult, SpeechServiceError>;
}

#[async_trait]
impl SpeechServiceApi for SpeechService {
    async fn synthesize(
        &self,
        request: SpeechRequest,
        bypass_secret: Option<String>,
    ) -> Result<SpeechSynthesisResult, SpeechServiceError> {
        // 1. Validate input
        let input = SpeechInput::from_request(&request)?;
        let char_count = input.characters_needed();

        tracing::info!(
            voice = %input.voice_label(),
            char_count = char_count,
            "Speech synthesis request"
        );

        // 2. Resolve provider credentials before any outbound call
        let credentials = self.credentials()?;

        // 3. Authorize
        if self.config.is_bypass_secret(bypass_secret.as_deref()) {
            tracing::info!("Bypass secret matched, skipping API key validation");
        } else {
            self.authorize(request.api_key.as_deref(), char_count).await?;
        }

        // 4. Synthesize
        let ssml = input.to_ssml();
        let audio = self
            .tts_repo
            .synthesize(&ssml, &credentials.key, &credentials.endpoint)
            .await
            .map_err(|e| match e {
                TtsError::Upstream { status, detail } => {
                    SpeechServiceError::Upstream { status, detail }
                }
                TtsError::Transport(msg) => SpeechServiceError::SpeechUnreachable(msg),
            })?;

        Ok(SpeechSynthesisResult {
            audio_data: audio.data,
            content_type: audio.content_type,
            char_count,
            voice: input.voice_label().to_string(),
        })
    }
}

impl SpeechService {
    fn credentials(&self) -> Result<SpeechCredentials, SpeechServiceError> {
        self.config.speech_credentials().ok_or_else(|| {
            SpeechServiceError::NotConfigured(
                "AZURE_SPEECH_KEY or AZURE_SPEECH_REGION is not set".to_string(),
            )
        })
    }

    async fn authorize(
        &self,
        api_key: Option<&str>,
        char_count: usize,
    ) -> Result<(), SpeechServiceError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SpeechServiceError::Invalid("API Key is required.".to_string()))?;

        let verdict = self
            .key_validation_repo
            .validate(api_key, char_count)
            .await
            .map_err(SpeechServiceError::ValidatorUnreachable)?;

        match verdict {
            KeyVerdict::Accepted => {
                tracing::info!(api_key = %mask_key(api_key), "API key validated");
                Ok(())
            }
            KeyVerdict::Rejected { status, reason } => {
                tracing::warn!(
                    api_key = %mask_key(api_key),
                    status = %status.as_u16(),
                    reason = %reason,
                    "API key validation failed"
                );
                Err(SpeechServiceError::KeyRejected { status, reason })
            }
        }
    }
}

/// Keep only the first four characters of a key for logs
fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{}***", prefix)
}
