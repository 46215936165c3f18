use async_trait::async_trait;
use axum::http::StatusCode;

/// Audio returned by the speech provider
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    pub data: Vec<u8>,
    pub content_type: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    /// The provider answered with a non-success status
    #[error("speech provider returned {status}: {detail}")]
    Upstream { status: StatusCode, detail: String },
    /// The provider could not be reached or the body could not be read
    #[error("speech provider transport error: {0}")]
    Transport(String),
}

/// Repository for TTS synthesis operations.
/// Abstracts the underlying speech provider.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize an SSML document to speech
    ///
    /// Returns MP3 audio ready for playback
    ///
    /// # Arguments
    /// * `ssml` - A complete SSML document
    /// * `key` - The provider subscription key
    /// * `endpoint` - The provider synthesis endpoint
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(
        &self,
        ssml: &str,
        key: &str,
        endpoint: &str,
    ) -> Result<SynthesizedAudio, TtsError>;
}
