use synth_core::SynthesisError;
use thiserror::Error;
use tts_core::{AudioError, DecodeError, PlaybackError};

/// Errors surfaced to the caller of a studio operation.
///
/// Each one is terminal for the call that produced it; nothing is retried.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Speech service error: {message}")]
    Remote { status: Option<u16>, message: String },

    #[error("Speech service returned no audio data")]
    EmptyResult,

    #[error("Could not decode audio: {0}")]
    Decode(String),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Key store error: {0}")]
    KeyStore(#[source] anyhow::Error),

    #[error("No generated audio to export")]
    NothingToExport,

    #[error("Export failed: {0}")]
    Export(#[source] anyhow::Error),
}

impl From<SynthesisError> for StudioError {
    fn from(e: SynthesisError) -> Self {
        match e {
            SynthesisError::Configuration(msg) => StudioError::Configuration(msg),
            SynthesisError::MissingCredential => {
                StudioError::Authentication("No API key configured".to_string())
            }
            SynthesisError::Remote { status, message } => StudioError::Remote { status, message },
            SynthesisError::EmptyResult => StudioError::EmptyResult,
            SynthesisError::Decode(e) => StudioError::Decode(e.to_string()),
        }
    }
}

impl From<DecodeError> for StudioError {
    fn from(e: DecodeError) -> Self {
        StudioError::Decode(e.to_string())
    }
}

impl From<AudioError> for StudioError {
    fn from(e: AudioError) -> Self {
        StudioError::Decode(e.to_string())
    }
}

pub type StudioResult<T> = Result<T, StudioError>;
