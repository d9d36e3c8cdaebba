use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::catalog::Voice;
use crate::pcm::PcmBuffer;
use crate::wav::{encode_wav, AudioError};

pub const WAV_MIME_TYPE: &str = "audio/wav";

/// An encoded, immutable audio artifact.
///
/// Container bytes are reference counted so playback and export can share
/// one copy without cloning the payload.
#[derive(Debug, Clone)]
pub struct AudioAsset {
    bytes: Arc<[u8]>,
    mime_type: &'static str,
    sample_rate: u32,
    sample_count: usize,
    voice: Voice,
    created_at: DateTime<Utc>,
}

impl AudioAsset {
    /// Encode a PCM buffer into a WAV asset, consuming the buffer.
    pub fn from_pcm(pcm: PcmBuffer, voice: Voice) -> Result<Self, AudioError> {
        let bytes = encode_wav(&pcm)?;
        Ok(Self {
            bytes: bytes.into(),
            mime_type: WAV_MIME_TYPE,
            sample_rate: pcm.sample_rate(),
            sample_count: pcm.len(),
            voice,
            created_at: Utc::now(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.sample_count as u64 * 1000 / self.sample_rate as u64
    }

    /// Export file name, e.g. `kore_20250101_120000.wav`.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.wav",
            self.voice.id().to_lowercase(),
            self.created_at.format("%Y%m%d_%H%M%S")
        )
    }

    /// Samples of the data chunk, without the container header.
    pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
        self.bytes[crate::wav::WAV_HEADER_LEN..]
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
    }
}
