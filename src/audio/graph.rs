use std::sync::{Arc, RwLock};
use std::time::Duration;

use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapProd, HeapRb};
use thiserror::Error;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{EncodedClip, SampleSink};
use crate::config::{DEFAULT_SAMPLE_RATE, WINDOW_MS};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("capture graph is already running")]
    AlreadyRunning,
}

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub sample_rate: u32,
    pub window: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            window: Duration::from_millis(WINDOW_MS),
        }
    }
}

pub type DispatchFn = Arc<dyn Fn(EncodedClip) + Send + Sync>;

/// Write end of the capture graph's sample ring. Handed to the audio
/// callback; pushes are lossy when the ring is full and never block.
pub struct FrameSink {
    producer: HeapProd<f32>,
}

impl SampleSink for FrameSink {
    fn push(&mut self, samples: &[f32]) {
        let _ = self.producer.push_slice(samples);
    }
}

struct RunningGraph {
    cancel: CancellationToken,
}

/// Accumulates microphone frames and flushes them on a fixed cadence:
/// every window the pending samples are drained, encoded as WAV and handed
/// to the registered dispatch callback. Empty windows are skipped without
/// encoding or dispatching anything.
pub struct AudioGraph {
    config: CaptureConfig,
    dispatch: Arc<RwLock<Option<DispatchFn>>>,
    running: Option<RunningGraph>,
}

impl AudioGraph {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            dispatch: Arc::new(RwLock::new(None)),
            running: None,
        }
    }

    /// Register or replace the window consumer. The graph does not need to
    /// be restarted for the swap to take effect.
    pub fn set_dispatch<F>(&self, handler: F)
    where
        F: Fn(EncodedClip) + Send + Sync + 'static,
    {
        *self.dispatch.write().unwrap() = Some(Arc::new(handler));
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Build the ring and spawn the flush loop. Returns the sink the audio
    /// callback feeds. Errors if the graph is already running; on error no
    /// timer is registered.
    pub fn start(&mut self) -> Result<FrameSink, GraphError> {
        if self.running.is_some() {
            return Err(GraphError::AlreadyRunning);
        }

        let sample_rate = self.config.sample_rate;
        let window = self.config.window;

        // Two windows of headroom; the callback drops samples beyond that.
        let capacity =
            (sample_rate as usize * window.as_millis() as usize / 1000 * 2).max(4096);
        let (producer, mut consumer) = HeapRb::<f32>::new(capacity).split();

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let dispatch = self.dispatch.clone();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + window, window);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let samples: Vec<f32> = consumer.pop_iter().collect();
                        if samples.is_empty() {
                            continue;
                        }

                        let clip = EncodedClip::from_samples(&samples, sample_rate);
                        debug!(samples = samples.len(), bytes = clip.len(), "window flushed");

                        let handler = dispatch.read().unwrap().clone();
                        match handler {
                            Some(handler) => handler(clip),
                            None => debug!("no dispatch registered; window dropped"),
                        }
                    }
                }
            }
            debug!("capture graph flush loop stopped");
        });

        info!(sample_rate, window_ms = window.as_millis() as u64, "capture graph started");
        self.running = Some(RunningGraph { cancel });
        Ok(FrameSink { producer })
    }

    /// Cancel the flush loop and drop the pending buffer. Safe to call
    /// repeatedly and safe to call when the graph never started.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.cancel.cancel();
            info!("capture graph stopped");
        }
    }
}

impl Drop for AudioGraph {
    fn drop(&mut self) {
        self.stop();
    }
}
