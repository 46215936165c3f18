use serde::Deserialize;
use std::env;
use subtle::ConstantTimeEq;

pub const DEFAULT_KEY_VALIDATION_URL: &str = "https://api-key-manager.onrender.com/api/validate-key";
pub const DEFAULT_OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Azure Speech
    pub azure_speech_key: Option<String>,
    pub azure_speech_region: Option<String>,
    pub azure_speech_endpoint: Option<String>,
    pub azure_output_format: String,
    // Key validation
    pub key_validation_url: String,
    pub internal_bypass_secret: Option<String>,
    // CORS
    pub allowed_origins: AllowedOrigins,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Origins allowed to call the relay from a browser
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Parse a comma-separated allow-list. `*` or an empty value allows any origin.
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        }
    }
}

/// Speech credentials resolved for one request
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechCredentials {
    pub key: String,
    pub endpoint: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            azure_speech_key: non_empty_var("AZURE_SPEECH_KEY"),
            azure_speech_region: non_empty_var("AZURE_SPEECH_REGION"),
            azure_speech_endpoint: non_empty_var("AZURE_SPEECH_ENDPOINT"),
            azure_output_format: non_empty_var("AZURE_OUTPUT_FORMAT")
                .unwrap_or_else(|| DEFAULT_OUTPUT_FORMAT.to_string()),
            key_validation_url: non_empty_var("KEY_VALIDATION_URL")
                .unwrap_or_else(|| DEFAULT_KEY_VALIDATION_URL.to_string()),
            internal_bypass_secret: non_empty_var("INTERNAL_BYPASS_SECRET"),
            allowed_origins: AllowedOrigins::parse(
                &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Resolve the speech key and endpoint, or `None` when the service is not configured.
    /// An explicit endpoint wins over the one derived from the region.
    pub fn speech_credentials(&self) -> Option<SpeechCredentials> {
        let key = self.azure_speech_key.clone()?;
        let endpoint = match (&self.azure_speech_endpoint, &self.azure_speech_region) {
            (Some(endpoint), _) => endpoint.clone(),
            (None, Some(region)) => format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                region
            ),
            (None, None) => return None,
        };

        Some(SpeechCredentials { key, endpoint })
    }

    /// Whether `candidate` matches the configured bypass secret.
    /// Never matches when no secret is configured.
    pub fn is_bypass_secret(&self, candidate: Option<&str>) -> bool {
        match (&self.internal_bypass_secret, candidate) {
            (Some(secret), Some(candidate)) => {
                !secret.is_empty() && bool::from(secret.as_bytes().ct_eq(candidate.as_bytes()))
            }
            _ => false,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
