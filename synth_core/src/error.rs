use thiserror::Error;
use tts_core::{CatalogError, DecodeError};

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Invalid synthesis request: {0}")]
    Configuration(String),

    #[error("No API key configured")]
    MissingCredential,

    #[error("Speech service error: {message}")]
    Remote { status: Option<u16>, message: String },

    #[error("Speech service returned no audio data")]
    EmptyResult,

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl From<CatalogError> for SynthesisError {
    fn from(e: CatalogError) -> Self {
        SynthesisError::Configuration(e.to_string())
    }
}

impl From<reqwest::Error> for SynthesisError {
    fn from(e: reqwest::Error) -> Self {
        let message = if e.is_timeout() {
            "request timed out".to_string()
        } else if e.is_connect() {
            format!("could not reach the speech service: {e}")
        } else {
            e.to_string()
        };
        SynthesisError::Remote {
            status: e.status().map(|s| s.as_u16()),
            message,
        }
    }
}

pub type SynthesisResult<T> = Result<T, SynthesisError>;
