use crate::domain::speech::dto::{KeyValidationRequest, KeyValidationResponse};
use async_trait::async_trait;
use axum::http::StatusCode;

const FALLBACK_REASON: &str = "API Key validation failed.";

/// Outcome of asking the key validation service about a caller key
#[derive(Debug, Clone, PartialEq)]
pub enum KeyVerdict {
    Accepted,
    Rejected { status: StatusCode, reason: String },
}

/// Repository for checking caller API keys against the remote key manager
#[async_trait]
pub trait KeyValidationRepository: Send + Sync {
    /// Ask whether `api_key` may spend `characters_needed` characters.
    ///
    /// # Errors
    /// Returns error only when the validator could not be reached at all.
    /// A refusal is a `KeyVerdict::Rejected`, not an error.
    async fn validate(&self, api_key: &str, characters_needed: usize) -> Result<KeyVerdict, String>;
}

/// Key validation over HTTP
pub struct HttpKeyValidationRepository {
    url: String,
    http_client: reqwest::Client,
}

impl HttpKeyValidationRepository {
    pub fn new(url: String) -> Self {
        Self {
            url,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl KeyValidationRepository for HttpKeyValidationRepository {
    async fn validate(&self, api_key: &str, characters_needed: usize) -> Result<KeyVerdict, String> {
        let request = KeyValidationRequest {
            api_key: api_key.to_string(),
            characters_needed,
        };

        let response = self
            .http_client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    url = %self.url,
                    "Key validation request failed"
                );
                format!("Key validation request failed: {}", e)
            })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);

        // An unreadable body still carries the validator's status
        let body = match response.json::<KeyValidationResponse>().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    status = %status.as_u16(),
                    "Key validation response could not be parsed"
                );
                None
            }
        };

        Ok(verdict(status, body))
    }
}

/// Non-2xx or `isValid: false` is a rejection. A 200 rejection becomes 403.
fn verdict(status: StatusCode, body: Option<KeyValidationResponse>) -> KeyVerdict {
    let is_valid = body.as_ref().map(|b| b.is_valid).unwrap_or(false);
    if status.is_success() && is_valid {
        return KeyVerdict::Accepted;
    }

    let reason = body
        .and_then(|b| b.reason)
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| FALLBACK_REASON.to_string());

    let status = if status == StatusCode::OK {
        StatusCode::FORBIDDEN
    } else {
        status
    };

    KeyVerdict::Rejected { status, reason }
}
