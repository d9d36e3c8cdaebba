//! Persona speech studio: turn text, a persona and a voice into playable
//! speech, one generation at a time.
//!
//! ```no_run
//! # async fn demo(backend: std::sync::Arc<dyn studio::PlaybackBackend>) -> studio::StudioResult<()> {
//! use studio::{GenerationRequest, SessionCoordinator, StudioConfig};
//!
//! studio::telemetry::init_tracing();
//! let coordinator = SessionCoordinator::from_config(StudioConfig::from_env(), backend)?;
//! coordinator.spawn_event_loop();
//! coordinator.set_api_key("my-key")?;
//!
//! let request = GenerationRequest::new("Hello").with_persona("storyteller").with_voice("Charon");
//! coordinator.generate_and_play(&request).await?;
//! coordinator.export_last_to_default_dir()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod key_store;
pub mod telemetry;
pub mod validation;

pub use config::StudioConfig;
pub use coordinator::{GenerationOutcome, GenerationRequest, SessionCoordinator};
pub use error::{StudioError, StudioResult};
pub use key_store::{FileKeyStore, KeyStore, MemoryKeyStore, API_KEY_NAME};
pub use tts_core::{AudioAsset, PlaybackBackend, PlaybackState, Persona, Voice};

#[cfg(feature = "playback")]
pub use tts_core::playback::RodioBackend;
