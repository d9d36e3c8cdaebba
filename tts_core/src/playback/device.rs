use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use super::backend::{PlaybackBackend, PlaybackError, PlaybackEvents, PlaybackHandle};
use crate::asset::AudioAsset;

/// Plays assets on the default output device.
///
/// Every session gets its own thread that owns the output stream, so the
/// stream never has to cross threads.
#[derive(Debug, Clone)]
pub struct RodioBackend {
    poll_interval: Duration,
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(20),
        }
    }
}

impl RodioBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlaybackBackend for RodioBackend {
    fn play(
        &self,
        asset: &AudioAsset,
        events: PlaybackEvents,
    ) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        const I16_MAX_F32: f32 = i16::MAX as f32;
        let samples: Vec<f32> = asset.samples().map(|s| s as f32 / I16_MAX_F32).collect();
        let sample_rate = asset.sample_rate();

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let poll_interval = self.poll_interval;
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), PlaybackError>>();

        let thread = std::thread::Builder::new()
            .name(format!("playback-{}", events.session()))
            .spawn(move || {
                let stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(s) => s,
                    Err(e) => {
                        let _ = ready_tx.send(Err(PlaybackError::OutputUnavailable(e.to_string())));
                        return;
                    }
                };
                let sink = Sink::connect_new(stream.mixer());
                sink.append(rodio::buffer::SamplesBuffer::new(1, sample_rate, samples));
                let _ = ready_tx.send(Ok(()));
                events.started();

                loop {
                    if stop_flag.load(Ordering::Acquire) {
                        sink.stop();
                        events.stopped();
                        break;
                    }
                    if sink.empty() {
                        events.completed();
                        break;
                    }
                    std::thread::sleep(poll_interval);
                }
                debug!(session = events.session(), "playback thread finished");
            })
            .map_err(|e| PlaybackError::StartFailed(e.to_string()))?;

        match ready_rx.recv() {
            // The thread is detached from here on and exits on its own
            // once it sees the stop flag.
            Ok(Ok(())) => Ok(Box::new(RodioHandle { stop })),
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(_) => {
                warn!("playback thread exited before reporting readiness");
                Err(PlaybackError::StartFailed(
                    "playback thread exited unexpectedly".to_string(),
                ))
            }
        }
    }
}

struct RodioHandle {
    stop: Arc<AtomicBool>,
}

impl PlaybackHandle for RodioHandle {
    fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
