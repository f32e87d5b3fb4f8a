use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::audio::{wav, SampleSink};

/// A finished media take, self-describing for the summary endpoint.
#[derive(Debug, Clone)]
pub struct Recording {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// External chunked-recorder collaborator. The core only starts and stops
/// it and asks for the finished take afterwards.
pub trait MediaRecorder: Send + Sync {
    fn start(&self);
    fn stop(&self);
    fn recording(&self) -> Option<Recording>;
}

/// Stands in for a recorder the host environment does not provide
/// (there is no video path in a headless session).
pub struct NullRecorder;

impl MediaRecorder for NullRecorder {
    fn start(&self) {}
    fn stop(&self) {}
    fn recording(&self) -> Option<Recording> {
        None
    }
}

#[derive(Default)]
struct TrackInner {
    staging: Vec<f32>,
    taken: Vec<f32>,
    active: bool,
}

/// Audio-only recorder: the capture callback appends into a staging buffer,
/// a 1000ms cadence moves staged samples into the take, and stop finalizes
/// one WAV. Runs independently of the capture graph's window cadence.
pub struct WavTrackRecorder {
    sample_rate: u32,
    chunk_interval: Duration,
    inner: Arc<Mutex<TrackInner>>,
    cancel: Mutex<Option<CancellationToken>>,
}

impl WavTrackRecorder {
    pub fn new(sample_rate: u32, chunk_interval: Duration) -> Self {
        Self {
            sample_rate,
            chunk_interval,
            inner: Arc::new(Mutex::new(TrackInner::default())),
            cancel: Mutex::new(None),
        }
    }

    /// Sink the capture callback feeds. Samples pushed while the recorder
    /// is stopped are ignored.
    pub fn sink(&self) -> TrackSink {
        TrackSink {
            inner: self.inner.clone(),
        }
    }
}

impl MediaRecorder for WavTrackRecorder {
    fn start(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.staging.clear();
            inner.taken.clear();
            inner.active = true;
        }

        let token = CancellationToken::new();
        *self.cancel.lock().unwrap() = Some(token.clone());

        let inner = self.inner.clone();
        let every = self.chunk_interval;
        tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let mut inner = inner.lock().unwrap();
                        let staged = std::mem::take(&mut inner.staging);
                        inner.taken.extend_from_slice(&staged);
                    }
                }
            }
            debug!("track recorder chunk loop stopped");
        });
    }

    fn stop(&self) {
        if let Some(token) = self.cancel.lock().unwrap().take() {
            token.cancel();
        }
        let mut inner = self.inner.lock().unwrap();
        // Flush the final partial chunk.
        let staged = std::mem::take(&mut inner.staging);
        inner.taken.extend_from_slice(&staged);
        inner.active = false;
    }

    fn recording(&self) -> Option<Recording> {
        let inner = self.inner.lock().unwrap();
        if inner.taken.is_empty() {
            return None;
        }
        Some(Recording {
            data: wav::encode(&inner.taken, self.sample_rate),
            mime_type: wav::WAV_MIME.to_string(),
        })
    }
}

pub struct TrackSink {
    inner: Arc<Mutex<TrackInner>>,
}

impl SampleSink for TrackSink {
    fn push(&mut self, samples: &[f32]) {
        let mut inner = self.inner.lock().unwrap();
        if inner.active {
            inner.staging.extend_from_slice(samples);
        }
    }
}
