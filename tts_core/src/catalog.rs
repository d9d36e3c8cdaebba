//! Voice and persona catalogs.
//!
//! Both catalogs are closed enumerations: an id that is not listed here is
//! rejected when it is parsed, so the rest of the pipeline only ever sees
//! values that resolve.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lookup failure for a catalog id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unknown voice '{0}'. Available voices: {1}")]
    UnknownVoice(String, String),

    #[error("Unknown persona '{0}'. Available personas: {1}")]
    UnknownPersona(String, String),
}

// =============================================================================
// Voices
// =============================================================================

/// Prebuilt voices offered by the speech model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Voice {
    #[default]
    Kore,
    Aoede,
    Leda,
    Zephyr,
    Puck,
    Charon,
    Orus,
    Fenrir,
}

impl Voice {
    pub const ALL: [Voice; 8] = [
        Voice::Kore,
        Voice::Aoede,
        Voice::Leda,
        Voice::Zephyr,
        Voice::Puck,
        Voice::Charon,
        Voice::Orus,
        Voice::Fenrir,
    ];

    /// Identifier sent to the service as `voiceName`.
    #[inline]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Kore => "Kore",
            Self::Aoede => "Aoede",
            Self::Leda => "Leda",
            Self::Zephyr => "Zephyr",
            Self::Puck => "Puck",
            Self::Charon => "Charon",
            Self::Orus => "Orus",
            Self::Fenrir => "Fenrir",
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.id()
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Kore => "Bright female voice",
            Self::Aoede => "Gentle female voice",
            Self::Leda => "Mature female voice",
            Self::Zephyr => "Sunny male voice",
            Self::Puck => "Lively male voice",
            Self::Charon => "Deep male voice",
            Self::Orus => "Steady male voice",
            Self::Fenrir => "Magnetic male voice",
        }
    }

    fn available() -> String {
        Self::ALL.iter().map(Voice::id).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for Voice {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.id() == s)
            .ok_or_else(|| CatalogError::UnknownVoice(s.to_string(), Self::available()))
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

// =============================================================================
// Personas
// =============================================================================

/// Delivery styles injected into the synthesis instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Default,
    Storyteller,
    Anchor,
    Professor,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Default,
        Persona::Storyteller,
        Persona::Anchor,
        Persona::Professor,
    ];

    #[inline]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Storyteller => "storyteller",
            Self::Anchor => "anchor",
            Self::Professor => "professor",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Default => "Standard Broadcast",
            Self::Storyteller => "Audiobook Narrator",
            Self::Anchor => "Live-stream Host",
            Self::Professor => "Old Professor",
        }
    }

    /// Style directive embedded verbatim in the instruction.
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Default => "Speak naturally and clearly.",
            Self::Storyteller => {
                "Speak like a professional audiobook narrator. Use dramatic pauses and emotional depth."
            }
            Self::Anchor => "Speak like a high-energy live streamer. Be extremely enthusiastic.",
            Self::Professor => "Speak like a wise old professor. Slow pace and clear articulation.",
        }
    }

    fn available() -> String {
        Self::ALL.iter().map(Persona::id).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for Persona {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| CatalogError::UnknownPersona(s.to_string(), Self::available()))
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
