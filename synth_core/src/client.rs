use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use tts_core::{PcmBuffer, DEFAULT_SAMPLE_RATE};

use crate::error::{SynthesisError, SynthesisResult};
use crate::request::SynthesisRequest;
use crate::wire::{ErrorEnvelope, GenerateContentResponse};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Narrow seam between the pipeline and whatever produces PCM from text.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        api_key: &str,
        request: &SynthesisRequest,
    ) -> SynthesisResult<PcmBuffer>;
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    /// Used when the payload mime type does not declare a rate.
    pub default_sample_rate: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            default_sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

/// Speech synthesis through the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> SynthesisResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SynthesisError::Configuration(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl SpeechSynthesizer for GeminiClient {
    async fn synthesize(
        &self,
        api_key: &str,
        request: &SynthesisRequest,
    ) -> SynthesisResult<PcmBuffer> {
        if api_key.trim().is_empty() {
            return Err(SynthesisError::MissingCredential);
        }

        debug!(
            voice = %request.voice(),
            persona = %request.persona(),
            speed = request.speed(),
            "sending synthesis request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request.to_body())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .and_then(|error| error.message)
                .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
            warn!(status = status.as_u16(), "speech service rejected request: {message}");
            return Err(SynthesisError::Remote {
                status: Some(status.as_u16()),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| SynthesisError::Remote {
                status: Some(status.as_u16()),
                message: format!("invalid response body: {e}"),
            })?;

        if let Some(error) = parsed.error.as_ref() {
            let message = error
                .message
                .clone()
                .unwrap_or_else(|| "request failed".to_string());
            return Err(SynthesisError::Remote {
                status: error.code,
                message,
            });
        }

        let inline = parsed
            .inline_audio()
            .filter(|inline| !inline.data.trim().is_empty())
            .ok_or(SynthesisError::EmptyResult)?;
        let sample_rate = inline
            .sample_rate()
            .unwrap_or(self.config.default_sample_rate);

        let pcm = PcmBuffer::from_base64(&inline.data, sample_rate)?;
        debug!(
            samples = pcm.len(),
            sample_rate,
            duration_ms = pcm.duration_ms(),
            "decoded inline audio"
        );
        Ok(pcm)
    }
}
