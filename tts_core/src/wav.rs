use thiserror::Error;

use crate::pcm::PcmBuffer;

/// Size of the canonical RIFF/WAVE header written by [`encode_wav`].
pub const WAV_HEADER_LEN: usize = 44;

const NUM_CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("Audio too large for a WAV container: {0} data bytes")]
    TooLarge(usize),

    #[error("Unsupported sample rate for a WAV container: {0} Hz")]
    UnsupportedSampleRate(u32),

    #[error("Malformed WAV header: {0}")]
    MalformedHeader(&'static str),
}

/// Encode mono 16-bit PCM as a RIFF/WAVE byte stream.
///
/// The output is a pure function of the input: a 44-byte header followed by
/// the samples in little-endian order.
pub fn encode_wav(pcm: &PcmBuffer) -> Result<Vec<u8>, AudioError> {
    encode_wav_samples(pcm.samples(), pcm.sample_rate())
}

pub fn encode_wav_samples(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, AudioError> {
    let data_len = samples.len() * 2;
    let data_size = u32::try_from(data_len)
        .ok()
        .filter(|size| size.checked_add(36).is_some())
        .ok_or(AudioError::TooLarge(data_len))?;

    let block_align: u16 = NUM_CHANNELS * (BITS_PER_SAMPLE / 8);
    let byte_rate = Some(sample_rate)
        .filter(|rate| *rate > 0)
        .and_then(|rate| rate.checked_mul(u32::from(block_align)))
        .ok_or(AudioError::UnsupportedSampleRate(sample_rate))?;
    let riff_size: u32 = 36 + data_size;

    let mut out = Vec::<u8>::with_capacity(WAV_HEADER_LEN + data_len);

    // RIFF header
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_size.to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&NUM_CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());

    for sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }

    Ok(out)
}

/// Fields of a canonical 44-byte WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub riff_size: u32,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    /// Parse the header produced by [`encode_wav`].
    pub fn parse(bytes: &[u8]) -> Result<Self, AudioError> {
        if bytes.len() < WAV_HEADER_LEN {
            return Err(AudioError::MalformedHeader("shorter than 44 bytes"));
        }
        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        let u32_at =
            |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);

        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(AudioError::MalformedHeader("missing RIFF/WAVE tags"));
        }
        if &bytes[12..16] != b"fmt " || u32_at(16) != 16 || u16_at(20) != 1 {
            return Err(AudioError::MalformedHeader("expected a 16-byte PCM fmt chunk"));
        }
        if &bytes[36..40] != b"data" {
            return Err(AudioError::MalformedHeader("missing data chunk"));
        }

        Ok(Self {
            riff_size: u32_at(4),
            channels: u16_at(22),
            sample_rate: u32_at(24),
            byte_rate: u32_at(28),
            block_align: u16_at(32),
            bits_per_sample: u16_at(34),
            data_size: u32_at(40),
        })
    }
}
