use std::time::Duration;

/// Flush cadence of the capture graph: one comment window per flush.
pub const WINDOW_MS: u64 = 4000;

/// Base stagger between comments returned for the same window.
pub const STAGGER_MS: u64 = 800;

/// Upper bound of the random jitter added to each comment's stagger.
pub const JITTER_MS: u64 = 500;

/// Chunk emission cadence of the media recorders. Independent of the
/// window cadence; the two must not be conflated.
pub const RECORDER_CHUNK_MS: u64 = 1000;

/// How long a transient user-visible notice stays up before auto-clearing.
pub const NOTICE_TTL_MS: u64 = 3000;

pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub sample_rate: u32,
    pub window: Duration,
    pub stagger: Duration,
    pub jitter: Duration,
    pub recorder_chunk: Duration,
    pub notice_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            window: Duration::from_millis(WINDOW_MS),
            stagger: Duration::from_millis(STAGGER_MS),
            jitter: Duration::from_millis(JITTER_MS),
            recorder_chunk: Duration::from_millis(RECORDER_CHUNK_MS),
            notice_ttl: Duration::from_millis(NOTICE_TTL_MS),
        }
    }
}
