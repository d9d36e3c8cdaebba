//! Playback lifecycle.
//!
//! [`PlaybackController`] owns at most one session at a time. The session's
//! backend handle is released on every edge out of `Playing`: stop, natural
//! completion, failure, and being superseded by a newer session.

mod backend;
#[cfg(feature = "playback")]
mod device;

pub use backend::{
    PlaybackBackend, PlaybackError, PlaybackEvent, PlaybackEvents, PlaybackHandle, SessionId,
};
#[cfg(feature = "playback")]
pub use device::RodioBackend;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::asset::AudioAsset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Stopped,
    Completed,
    Failed,
}

impl PlaybackState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Completed | Self::Failed)
    }
}

struct Session {
    id: SessionId,
    asset: Arc<AudioAsset>,
    handle: Option<Box<dyn PlaybackHandle>>,
}

impl Session {
    fn release(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop();
            debug!(session = self.id, "released playback handle");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Default)]
struct Inner {
    state: PlaybackState,
    session: Option<Session>,
}

pub struct PlaybackController {
    backend: Arc<dyn PlaybackBackend>,
    events: mpsc::UnboundedSender<PlaybackEvent>,
    inner: Mutex<Inner>,
    next_session: AtomicU64,
    state_tx: watch::Sender<PlaybackState>,
}

impl PlaybackController {
    /// Create a controller and the receiving end of its event channel.
    ///
    /// Backend notifications arrive on the receiver; feed them back through
    /// [`PlaybackController::handle_event`].
    pub fn new(
        backend: Arc<dyn PlaybackBackend>,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(PlaybackState::Idle);
        let controller = Self {
            backend,
            events,
            inner: Mutex::new(Inner::default()),
            next_session: AtomicU64::new(1),
            state_tx,
        };
        (controller, rx)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, inner: &mut Inner, state: PlaybackState) {
        inner.state = state;
        self.state_tx.send_replace(state);
    }

    /// Start playing `asset`, superseding any session that is still playing.
    pub fn start(&self, asset: Arc<AudioAsset>) -> Result<SessionId, PlaybackError> {
        let mut inner = self.lock();

        if let Some(mut previous) = inner.session.take() {
            if inner.state == PlaybackState::Playing {
                info!(session = previous.id, "superseding active playback");
            }
            previous.release();
        }

        let id = self.next_session.fetch_add(1, Ordering::Relaxed);
        let events = PlaybackEvents::new(id, self.events.clone());

        match self.backend.play(&asset, events) {
            Ok(handle) => {
                inner.session = Some(Session {
                    id,
                    asset,
                    handle: Some(handle),
                });
                self.set_state(&mut inner, PlaybackState::Playing);
                info!(session = id, "playback started");
                Ok(id)
            }
            Err(e) => {
                inner.session = Some(Session {
                    id,
                    asset,
                    handle: None,
                });
                self.set_state(&mut inner, PlaybackState::Failed);
                warn!(session = id, "playback failed to start: {e}");
                Err(e)
            }
        }
    }

    /// Stop the playing session. Returns `false` when nothing was playing.
    pub fn stop(&self) -> bool {
        let mut inner = self.lock();
        if inner.state != PlaybackState::Playing {
            return false;
        }
        if let Some(session) = inner.session.as_mut() {
            session.release();
            info!(session = session.id, "playback stopped");
        }
        self.set_state(&mut inner, PlaybackState::Stopped);
        true
    }

    /// Apply a backend notification. Events for superseded sessions are ignored.
    pub fn handle_event(&self, event: PlaybackEvent) {
        let mut inner = self.lock();
        let current = inner.session.as_ref().map(|s| s.id);
        if current != Some(event.session()) {
            debug!(?event, ?current, "ignoring event for stale session");
            return;
        }

        match event {
            PlaybackEvent::Started(id) => {
                debug!(session = id, "backend reported start");
            }
            PlaybackEvent::Completed(id) => {
                if inner.state == PlaybackState::Playing {
                    if let Some(session) = inner.session.as_mut() {
                        session.release();
                    }
                    self.set_state(&mut inner, PlaybackState::Completed);
                    info!(session = id, "playback completed");
                }
            }
            PlaybackEvent::Stopped(id) => {
                if inner.state == PlaybackState::Playing {
                    if let Some(session) = inner.session.as_mut() {
                        session.release();
                    }
                    self.set_state(&mut inner, PlaybackState::Stopped);
                    info!(session = id, "playback stopped by backend");
                }
            }
            PlaybackEvent::Failed(id, reason) => {
                if let Some(session) = inner.session.as_mut() {
                    session.release();
                }
                self.set_state(&mut inner, PlaybackState::Failed);
                warn!(session = id, "playback failed: {reason}");
            }
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.lock().state
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.lock().session.as_ref().map(|s| s.id)
    }

    pub fn current_asset(&self) -> Option<Arc<AudioAsset>> {
        self.lock().session.as_ref().map(|s| Arc::clone(&s.asset))
    }

    /// Observe state transitions, e.g. to render a stop button.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }
}
