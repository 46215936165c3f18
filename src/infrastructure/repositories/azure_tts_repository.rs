use super::tts_repository::{SynthesizedAudio, TtsError, TtsRepository};
use async_trait::async_trait;
use axum::http::StatusCode;

pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";
const SSML_CONTENT_TYPE: &str = "application/ssml+xml";
const USER_AGENT: &str = "speech-relay";

/// Azure Cognitive Services implementation of TTS repository
pub struct AzureTtsRepository {
    output_format: String,
    http_client: reqwest::Client,
}

impl AzureTtsRepository {
    pub fn new(output_format: String) -> Self {
        Self {
            output_format,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TtsRepository for AzureTtsRepository {
    async fn synthesize(
        &self,
        ssml: &str,
        key: &str,
        endpoint: &str,
    ) -> Result<SynthesizedAudio, TtsError> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            endpoint = %endpoint,
            output_format = %self.output_format,
            ssml_length = ssml.len(),
            "Calling Azure TTS API"
        );

        let response = self
            .http_client
            .post(endpoint)
            .header(SUBSCRIPTION_KEY_HEADER, key)
            .header(reqwest::header::CONTENT_TYPE, SSML_CONTENT_TYPE)
            .header(OUTPUT_FORMAT_HEADER, &self.output_format)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .body(ssml.to_string())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    endpoint = %endpoint,
                    "Azure TTS API call failed"
                );
                TtsError::Transport(e.to_string())
            })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);

        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = %status.as_u16(),
                detail = %detail,
                "Azure TTS API returned an error"
            );
            return Err(TtsError::Upstream { status, detail });
        }

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| TtsError::Transport(format!("Failed to read audio: {}", e)))?
            .to_vec();

        let duration = start_time.elapsed();
        let throughput_chars_per_sec = if duration.as_secs_f64() > 0.0 {
            ssml.len() as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        tracing::info!(
            provider = "azure",
            latency_ms = duration.as_millis(),
            ssml_length = ssml.len(),
            audio_size_bytes = audio_data.len(),
            throughput_chars_per_sec = format!("{:.2}", throughput_chars_per_sec),
            "TTS synthesis completed"
        );

        Ok(SynthesizedAudio {
            data: audio_data,
            content_type: AUDIO_CONTENT_TYPE,
        })
    }
}
