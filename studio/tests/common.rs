//! Common utilities for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use studio::{KeyStore, MemoryKeyStore, SessionCoordinator, StudioConfig};
use synth_core::{SpeechSynthesizer, SynthesisError, SynthesisRequest, SynthesisResult};
use tts_core::{
    AudioAsset, PcmBuffer, PlaybackBackend, PlaybackError, PlaybackEvents, PlaybackHandle,
};

pub const TEST_KEY: &str = "test-key-for-integration-tests";

// =============================================================================
// Synthesizer
// =============================================================================

#[derive(Clone)]
pub enum Reply {
    Audio { samples: Vec<i16>, delay: Duration },
    Error(Arc<dyn Fn() -> SynthesisError + Send + Sync>),
}

/// Scripted synthesizer keyed by request text.
///
/// Unscripted text yields 1000 samples of value 1 immediately.
#[derive(Default)]
pub struct MockSynthesizer {
    replies: Mutex<HashMap<String, Reply>>,
    calls: AtomicUsize,
    keys: Mutex<Vec<String>>,
}

impl MockSynthesizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply_audio(&self, text: &str, samples: usize, value: i16, delay: Duration) {
        self.replies.lock().unwrap().insert(
            text.to_string(),
            Reply::Audio {
                samples: vec![value; samples],
                delay,
            },
        );
    }

    pub fn reply_error<F>(&self, text: &str, make: F)
    where
        F: Fn() -> SynthesisError + Send + Sync + 'static,
    {
        self.replies
            .lock()
            .unwrap()
            .insert(text.to_string(), Reply::Error(Arc::new(make)));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn keys_seen(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(
        &self,
        api_key: &str,
        request: &SynthesisRequest,
    ) -> SynthesisResult<PcmBuffer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.keys.lock().unwrap().push(api_key.to_string());

        let reply = self.replies.lock().unwrap().get(request.text()).cloned();
        match reply {
            Some(Reply::Audio { samples, delay }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(PcmBuffer::new(samples, 24_000))
            }
            Some(Reply::Error(make)) => Err(make()),
            None => Ok(PcmBuffer::new(vec![1; 1000], 24_000)),
        }
    }
}

// =============================================================================
// Playback backend
// =============================================================================

/// Backend that never touches a device and counts unreleased handles.
#[derive(Default)]
pub struct MockBackend {
    pub live: Arc<AtomicUsize>,
    pub fail_next: AtomicBool,
    /// Blocks `play` this long, like a slow device open.
    pub start_delay_ms: AtomicU64,
    /// Blocks the next handle `stop` this long.
    pub stop_delay_ms: Arc<AtomicU64>,
    played: Mutex<Vec<Vec<i16>>>,
    current: Mutex<Option<PlaybackEvents>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Samples of every asset handed to `play`, in order.
    pub fn played(&self) -> Vec<Vec<i16>> {
        self.played.lock().unwrap().clone()
    }

    /// Report natural completion of the most recent session.
    pub fn complete_current(&self) {
        if let Some(events) = self.current.lock().unwrap().as_ref() {
            events.completed();
        }
    }

    pub fn fail_current(&self, reason: &str) {
        if let Some(events) = self.current.lock().unwrap().as_ref() {
            events.failed(reason);
        }
    }
}

struct MockHandle {
    live: Arc<AtomicUsize>,
    stop_delay_ms: Arc<AtomicU64>,
    released: bool,
}

impl PlaybackHandle for MockHandle {
    fn stop(&mut self) {
        if !self.released {
            let delay = self.stop_delay_ms.swap(0, Ordering::SeqCst);
            if delay > 0 {
                std::thread::sleep(Duration::from_millis(delay));
            }
            self.released = true;
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl PlaybackBackend for MockBackend {
    fn play(
        &self,
        asset: &AudioAsset,
        events: PlaybackEvents,
    ) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        let delay = self.start_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            std::thread::sleep(Duration::from_millis(delay));
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(PlaybackError::OutputUnavailable("no output device".to_string()));
        }
        self.live.fetch_add(1, Ordering::SeqCst);
        self.played.lock().unwrap().push(asset.samples().collect());
        events.started();
        *self.current.lock().unwrap() = Some(events);
        Ok(Box::new(MockHandle {
            live: Arc::clone(&self.live),
            stop_delay_ms: Arc::clone(&self.stop_delay_ms),
            released: false,
        }))
    }
}

// =============================================================================
// Wiring
// =============================================================================

pub struct Harness {
    pub coordinator: Arc<SessionCoordinator>,
    pub synthesizer: Arc<MockSynthesizer>,
    pub backend: Arc<MockBackend>,
    pub keys: Arc<MemoryKeyStore>,
}

pub fn harness_with_key(key: Option<&str>) -> Harness {
    studio::telemetry::init_tracing();

    let synthesizer = MockSynthesizer::new();
    let backend = MockBackend::new();
    let keys = Arc::new(match key {
        Some(k) => MemoryKeyStore::with_key(k),
        None => MemoryKeyStore::new(),
    });
    let key_store: Arc<dyn KeyStore> = keys.clone();

    let coordinator = SessionCoordinator::new(
        StudioConfig::default(),
        key_store,
        synthesizer.clone(),
        backend.clone(),
    );

    Harness {
        coordinator,
        synthesizer,
        backend,
        keys,
    }
}

pub fn harness() -> Harness {
    harness_with_key(Some(TEST_KEY))
}
