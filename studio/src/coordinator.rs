//! Generate-and-play orchestration.
//!
//! Each call to [`SessionCoordinator::generate_and_play`] is tagged with a
//! sequence number when it is issued. Results are applied in issue order:
//! a response whose sequence is no longer the latest is dropped, so a slow
//! early request can never replace the audio of a later one.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use synth_core::{GeminiClient, SpeechSynthesizer, SynthesisRequest};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tts_core::{
    AudioAsset, PlaybackBackend, PlaybackController, PlaybackError, PlaybackEvent, PlaybackState,
    SessionId,
};

use crate::config::StudioConfig;
use crate::error::{StudioError, StudioResult};
use crate::key_store::{FileKeyStore, KeyStore};
use crate::validation::{validate_api_key, validate_text};

/// User input for one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub text: String,
    pub persona_id: String,
    pub voice_id: String,
    pub speed: f32,
}

impl GenerationRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            persona_id: "default".to_string(),
            voice_id: "Kore".to_string(),
            speed: 1.0,
        }
    }

    pub fn with_persona(mut self, persona_id: impl Into<String>) -> Self {
        self.persona_id = persona_id.into();
        self
    }

    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// The asset was handed to playback and retained for export.
    Playing {
        sequence: u64,
        session: SessionId,
        asset: Arc<AudioAsset>,
    },
    /// A newer generation was issued while this one was in flight.
    Superseded { sequence: u64 },
}

pub struct SessionCoordinator {
    config: StudioConfig,
    key_store: Arc<dyn KeyStore>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    playback: Arc<PlaybackController>,
    sequence: Arc<AtomicU64>,
    last_asset: Arc<Mutex<Option<Arc<AudioAsset>>>>,
    events: Mutex<Option<mpsc::UnboundedReceiver<PlaybackEvent>>>,
}

impl SessionCoordinator {
    pub fn new(
        config: StudioConfig,
        key_store: Arc<dyn KeyStore>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        backend: Arc<dyn PlaybackBackend>,
    ) -> Arc<Self> {
        let (playback, events) = PlaybackController::new(backend);
        Arc::new(Self {
            config,
            key_store,
            synthesizer,
            playback: Arc::new(playback),
            sequence: Arc::new(AtomicU64::new(0)),
            last_asset: Arc::new(Mutex::new(None)),
            events: Mutex::new(Some(events)),
        })
    }

    /// Production wiring: file key store and the Gemini client.
    pub fn from_config(
        config: StudioConfig,
        backend: Arc<dyn PlaybackBackend>,
    ) -> StudioResult<Arc<Self>> {
        let key_store = Arc::new(FileKeyStore::new(&config.key_store_path));
        let synthesizer = Arc::new(GeminiClient::new(config.gemini())?);
        info!(
            model = %config.model,
            key_store = %config.key_store_path.display(),
            "studio configured"
        );
        Ok(Self::new(config, key_store, synthesizer, backend))
    }

    /// Forward backend playback events into the state machine.
    ///
    /// Must be called from within a tokio runtime. Returns `None` if the
    /// loop was already started. Transitions run on the blocking pool since
    /// releasing a session calls into the backend.
    pub fn spawn_event_loop(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut events = self
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;
        let coordinator = Arc::downgrade(self);

        Some(tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let Some(coordinator) = coordinator.upgrade() else {
                    break;
                };
                let playback = Arc::clone(&coordinator.playback);
                drop(coordinator);

                if let Err(e) =
                    tokio::task::spawn_blocking(move || playback.handle_event(event)).await
                {
                    warn!("playback event handling failed: {e}");
                }
            }
            debug!("playback event loop finished");
        }))
    }

    /// Synthesize `request` and play the result.
    ///
    /// Preconditions are checked before anything else happens: a missing
    /// key, empty text or unknown persona/voice fail without a network call
    /// and leave current playback untouched.
    pub async fn generate_and_play(
        &self,
        request: &GenerationRequest,
    ) -> StudioResult<GenerationOutcome> {
        let stored_key = self.key_store.get().map_err(StudioError::KeyStore)?;
        let api_key = validate_api_key(stored_key.as_deref())?.to_string();
        validate_text(&request.text)?;
        let synthesis = SynthesisRequest::from_ids(
            &request.text,
            &request.persona_id,
            &request.voice_id,
            request.speed,
        )?;

        // Issue the sequence before stopping: an earlier request finishing in
        // between must already see itself as stale.
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        if self.stop_off_runtime().await {
            debug!(sequence, "stopped current playback for a new generation");
        }

        info!(
            sequence,
            voice = %synthesis.voice(),
            persona = %synthesis.persona(),
            speed = synthesis.speed(),
            text_len = synthesis.text().len(),
            "issuing synthesis request"
        );

        let pcm = self
            .synthesizer
            .synthesize(&api_key, &synthesis)
            .await
            .map_err(|e| {
                warn!(sequence, "synthesis failed: {e}");
                StudioError::from(e)
            })?;
        let asset = Arc::new(AudioAsset::from_pcm(pcm, synthesis.voice())?);

        // Checking the sequence and starting playback happen under one lock so
        // two completions cannot interleave between the check and the start.
        // Opening the device may block, so this runs on the blocking pool.
        let playback = Arc::clone(&self.playback);
        let last_asset = Arc::clone(&self.last_asset);
        let issued = Arc::clone(&self.sequence);
        let retained = Arc::clone(&asset);
        let started = tokio::task::spawn_blocking(move || {
            let mut last_asset = last_asset.lock().unwrap_or_else(PoisonError::into_inner);
            let latest = issued.load(Ordering::SeqCst);
            if sequence != latest {
                info!(sequence, latest, "discarding superseded synthesis result");
                return Ok(None);
            }
            *last_asset = Some(Arc::clone(&retained));
            playback.start(retained).map(Some)
        })
        .await
        .map_err(|e| StudioError::Playback(PlaybackError::StartFailed(e.to_string())))??;

        let Some(session) = started else {
            return Ok(GenerationOutcome::Superseded { sequence });
        };
        info!(
            sequence,
            session,
            duration_ms = asset.duration_ms(),
            bytes = asset.bytes().len(),
            "generated audio is playing"
        );

        Ok(GenerationOutcome::Playing {
            sequence,
            session,
            asset,
        })
    }

    /// Stop current playback. A no-op when nothing is playing.
    pub fn stop(&self) -> bool {
        self.playback.stop()
    }

    async fn stop_off_runtime(&self) -> bool {
        let playback = Arc::clone(&self.playback);
        match tokio::task::spawn_blocking(move || playback.stop()).await {
            Ok(stopped) => stopped,
            Err(e) => {
                warn!("stopping playback failed: {e}");
                false
            }
        }
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn subscribe_playback(&self) -> watch::Receiver<PlaybackState> {
        self.playback.subscribe()
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// Sequence number of the most recently issued generation.
    pub fn latest_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Asset of the latest successful generation, if any.
    pub fn last_asset(&self) -> Option<Arc<AudioAsset>> {
        self.last_asset
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Write the retained asset into `dir` and return the file path.
    pub fn export_last(&self, dir: impl AsRef<Path>) -> StudioResult<PathBuf> {
        let asset = self.last_asset().ok_or(StudioError::NothingToExport)?;
        let dir = dir.as_ref();

        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))
            .map_err(StudioError::Export)?;
        let path = dir.join(asset.file_name());
        fs::write(&path, asset.bytes())
            .with_context(|| format!("Failed to write {}", path.display()))
            .map_err(StudioError::Export)?;

        info!(path = %path.display(), bytes = asset.bytes().len(), "exported audio");
        Ok(path)
    }

    /// Export into the configured `EXPORT_DIR`.
    pub fn export_last_to_default_dir(&self) -> StudioResult<PathBuf> {
        self.export_last(&self.config.export_dir)
    }

    pub fn set_api_key(&self, key: &str) -> StudioResult<()> {
        let key = key.trim();
        if key.is_empty() {
            self.key_store.clear().map_err(StudioError::KeyStore)?;
            info!("API key cleared");
        } else {
            self.key_store.set(key).map_err(StudioError::KeyStore)?;
            info!("API key saved");
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        match self.key_store.get() {
            Ok(key) => validate_api_key(key.as_deref()).is_ok(),
            Err(e) => {
                warn!("could not read key store: {e:#}");
                false
            }
        }
    }
}
