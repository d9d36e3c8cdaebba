use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::asset::AudioAsset;

/// Identifier of one playback session, unique per controller.
pub type SessionId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("Failed to initialize audio output: {0}")]
    OutputUnavailable(String),

    #[error("Failed to start playback: {0}")]
    StartFailed(String),
}

/// Lifecycle notifications sent by a backend for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Started(SessionId),
    Completed(SessionId),
    Stopped(SessionId),
    Failed(SessionId, String),
}

impl PlaybackEvent {
    pub fn session(&self) -> SessionId {
        match self {
            Self::Started(id) | Self::Completed(id) | Self::Stopped(id) | Self::Failed(id, _) => *id,
        }
    }
}

/// Sender half handed to a backend, already bound to its session.
#[derive(Debug, Clone)]
pub struct PlaybackEvents {
    session: SessionId,
    tx: UnboundedSender<PlaybackEvent>,
}

impl PlaybackEvents {
    pub(crate) fn new(session: SessionId, tx: UnboundedSender<PlaybackEvent>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn started(&self) {
        self.send(PlaybackEvent::Started(self.session));
    }

    pub fn completed(&self) {
        self.send(PlaybackEvent::Completed(self.session));
    }

    pub fn stopped(&self) {
        self.send(PlaybackEvent::Stopped(self.session));
    }

    pub fn failed(&self, reason: impl Into<String>) {
        self.send(PlaybackEvent::Failed(self.session, reason.into()));
    }

    fn send(&self, event: PlaybackEvent) {
        // The controller may already be gone during shutdown.
        let _ = self.tx.send(event);
    }
}

/// Something that can render an asset to an output device.
pub trait PlaybackBackend: Send + Sync {
    /// Begin playing `asset`, reporting its lifecycle through `events`.
    ///
    /// The returned handle owns every resource the session holds. May block
    /// while the device opens, so async callers run it on a blocking thread.
    fn play(
        &self,
        asset: &AudioAsset,
        events: PlaybackEvents,
    ) -> Result<Box<dyn PlaybackHandle>, PlaybackError>;
}

/// Owned resource of one running session.
pub trait PlaybackHandle: Send {
    /// Halt output and free the underlying resource. Must be idempotent and
    /// must not wait for the device to drain.
    fn stop(&mut self);
}
