use super::dto::SpeechRequest;
use super::error::SpeechServiceError;
use super::markup::{build_ssml, spoken_text};
use once_cell::sync::Lazy;
use regex::Regex;

/// Language code, region code, then an alphanumeric name ending in `Neural`
static VOICE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}-[A-Z]{2}-[A-Za-z0-9]+Neural$").unwrap());

/// A voice identifier such as `km-KH-SreymomNeural`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceName(String);

impl VoiceName {
    pub fn parse(raw: &str) -> Result<Self, SpeechServiceError> {
        if VOICE_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(SpeechServiceError::Invalid(format!(
                "Invalid voice format: {}",
                raw
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `km-KH` for `km-KH-SreymomNeural`
    pub fn locale(&self) -> &str {
        &self.0[..5]
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated synthesis input
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechInput {
    /// Plain text to be wrapped in SSML for the given voice
    Text { text: String, voice: VoiceName },
    /// Caller-built SSML forwarded as is
    Markup { ssml: String },
}

impl SpeechInput {
    /// Validate the request body. Markup wins when both markup and text are sent,
    /// but a supplied voice must match the voice pattern either way.
    pub fn from_request(request: &SpeechRequest) -> Result<Self, SpeechServiceError> {
        let voice = non_blank(request.voice.as_deref())
            .map(VoiceName::parse)
            .transpose()?;

        if let Some(ssml) = non_blank(request.ssml_data.as_deref()) {
            return Ok(SpeechInput::Markup {
                ssml: ssml.to_string(),
            });
        }

        let text = non_blank(request.text.as_deref())
            .ok_or_else(|| SpeechServiceError::Invalid("No SSML data provided".to_string()))?;

        let voice =
            voice.ok_or_else(|| SpeechServiceError::Invalid("No voice provided".to_string()))?;

        Ok(SpeechInput::Text {
            text: text.to_string(),
            voice,
        })
    }

    /// The SSML document sent to the speech API
    pub fn to_ssml(&self) -> String {
        match self {
            SpeechInput::Text { text, voice } => build_ssml(text, voice),
            SpeechInput::Markup { ssml } => ssml.clone(),
        }
    }

    /// Characters billed against the caller's key: the spoken text, not the markup
    pub fn characters_needed(&self) -> usize {
        match self {
            SpeechInput::Text { text, .. } => text.trim().chars().count(),
            SpeechInput::Markup { ssml } => spoken_text(ssml).chars().count(),
        }
    }

    /// Label for the `X-Voice-Used` response header
    pub fn voice_label(&self) -> &str {
        match self {
            SpeechInput::Text { voice, .. } => voice.as_str(),
            SpeechInput::Markup { .. } => "ssml",
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
