use tts_core::{Persona, Voice};

use crate::error::{SynthesisError, SynthesisResult};
use crate::wire::{
    Content, GenerateContentRequest, GenerationConfig, PrebuiltVoiceConfig, SpeechConfig,
    TextPart, VoiceConfig,
};

pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 2.0;

/// One synthesis invocation. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    text: String,
    persona: Persona,
    voice: Voice,
    speed: f32,
}

impl SynthesisRequest {
    /// Speed is clamped to `[0.5, 2.0]`. It only reaches the model as a hint
    /// inside the instruction; the returned audio is never resampled.
    pub fn new(
        text: impl Into<String>,
        persona: Persona,
        voice: Voice,
        speed: f32,
    ) -> SynthesisResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SynthesisError::Configuration(
                "Text cannot be empty".to_string(),
            ));
        }
        if !speed.is_finite() {
            return Err(SynthesisError::Configuration(format!(
                "Speed must be a finite number, got {speed}"
            )));
        }
        Ok(Self {
            text,
            persona,
            voice,
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
        })
    }

    /// Resolve catalog ids, rejecting unknown ones.
    pub fn from_ids(
        text: impl Into<String>,
        persona_id: &str,
        voice_id: &str,
        speed: f32,
    ) -> SynthesisResult<Self> {
        let persona: Persona = persona_id.parse()?;
        let voice: Voice = voice_id.parse()?;
        Self::new(text, persona, voice, speed)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Single prompt carrying style, speed and the literal text.
    pub fn instruction(&self) -> String {
        format!(
            "Persona: {}. Speed: {}x. Text: \"{}\"",
            self.persona.instruction(),
            self.speed,
            self.text
        )
    }

    pub fn to_body(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![TextPart {
                    text: self.instruction(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.id().to_string(),
                        },
                    },
                },
            },
        }
    }
}
