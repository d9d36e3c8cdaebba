// Configuration for the studio, read from the environment

use std::path::PathBuf;
use std::time::Duration;

use synth_core::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use tts_core::DEFAULT_SAMPLE_RATE;

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub api_base_url: String,
    pub model: String,
    pub synthesis_timeout_secs: u64,
    pub sample_rate: u32,
    pub export_dir: PathBuf,
    pub key_store_path: PathBuf,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            synthesis_timeout_secs: 60,
            sample_rate: DEFAULT_SAMPLE_RATE,
            export_dir: PathBuf::from("."),
            key_store_path: default_key_store_path(),
        }
    }
}

fn default_key_store_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("persona-lab")
        .join("keys.json")
}

impl StudioConfig {
    /// Load from the process environment, after applying any `.env` file.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = non_empty("GEMINI_API_BASE").unwrap_or(defaults.api_base_url);

        let model = non_empty("GEMINI_TTS_MODEL").unwrap_or(defaults.model);

        let synthesis_timeout_secs = non_empty("SYNTHESIS_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.synthesis_timeout_secs);

        let sample_rate = non_empty("SAMPLE_RATE")
            .and_then(|v| v.trim().parse().ok())
            .filter(|rate| *rate > 0)
            .unwrap_or(defaults.sample_rate);

        let export_dir = non_empty("EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        let key_store_path = non_empty("KEY_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.key_store_path);

        Self {
            api_base_url,
            model,
            synthesis_timeout_secs,
            sample_rate,
            export_dir,
            key_store_path,
        }
    }

    pub fn synthesis_timeout(&self) -> Duration {
        Duration::from_secs(self.synthesis_timeout_secs)
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            base_url: self.api_base_url.clone(),
            model: self.model.clone(),
            timeout: self.synthesis_timeout(),
            default_sample_rate: self.sample_rate,
        }
    }
}
