//! Raw PCM buffers and inline payload decoding.

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

/// Sample rate of the audio returned by the speech model.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Inline audio payload is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("Decoded audio has an odd byte count ({0}); expected whole 16-bit samples")]
    OddByteCount(usize),
}

/// Signed 16-bit mono samples at a fixed sample rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl PcmBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Reinterpret little-endian bytes as 16-bit samples.
    ///
    /// An odd byte count is rejected instead of dropping the trailing byte.
    pub fn from_le_bytes(bytes: &[u8], sample_rate: u32) -> Result<Self, DecodeError> {
        if bytes.len() % 2 != 0 {
            return Err(DecodeError::OddByteCount(bytes.len()));
        }
        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self::new(samples, sample_rate))
    }

    /// Decode a base64 inline payload carrying little-endian PCM.
    pub fn from_base64(data: &str, sample_rate: u32) -> Result<Self, DecodeError> {
        let bytes = general_purpose::STANDARD
            .decode(data.trim())
            .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
        Self::from_le_bytes(&bytes, sample_rate)
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }
}
