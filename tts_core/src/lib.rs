//! Audio side of the persona speech studio.
//!
//! - [`catalog`]: closed voice and persona enumerations
//! - [`pcm`]: raw 16-bit PCM buffers decoded from inline payloads
//! - [`wav`]: RIFF/WAVE container encoding
//! - [`asset`]: immutable encoded audio shared by playback and export
//! - [`playback`]: single-session playback state machine and backends
//!
//! Enable the `playback` feature for [`playback::RodioBackend`], which
//! renders to the default output device.

pub mod asset;
pub mod catalog;
pub mod pcm;
pub mod playback;
pub mod wav;

pub use asset::{AudioAsset, WAV_MIME_TYPE};
pub use catalog::{CatalogError, Persona, Voice};
pub use pcm::{DecodeError, PcmBuffer, DEFAULT_SAMPLE_RATE};
pub use playback::{
    PlaybackBackend, PlaybackController, PlaybackError, PlaybackEvent, PlaybackEvents,
    PlaybackHandle, PlaybackState, SessionId,
};
pub use wav::{encode_wav, encode_wav_samples, AudioError, WavHeader, WAV_HEADER_LEN};
