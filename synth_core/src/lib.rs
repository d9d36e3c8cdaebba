//! Remote speech synthesis.
//!
//! [`SynthesisRequest`] turns text, persona and voice into one instruction
//! and request body; [`GeminiClient`] posts it and decodes the inline PCM
//! payload of the reply. Callers depend on the [`SpeechSynthesizer`] trait
//! so the wire format stays behind this crate.

mod client;
mod error;
mod request;
pub mod wire;

pub use client::{GeminiClient, GeminiConfig, SpeechSynthesizer, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{SynthesisError, SynthesisResult};
pub use request::{SynthesisRequest, MAX_SPEED, MIN_SPEED};
