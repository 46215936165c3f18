use serde::{Deserialize, Serialize};

/// Request for POST /api/generate-speech
///
/// Every field is optional here so that missing fields are reported by the
/// relay's own validation rather than as a JSON rejection.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SpeechRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssml_data: Option<String>,
    #[serde(default, rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Body sent to the key validation service
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValidationRequest {
    pub api_key: String,
    pub characters_needed: usize,
}

/// Body returned by the key validation service
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValidationResponse {
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub reason: Option<String>,
}
