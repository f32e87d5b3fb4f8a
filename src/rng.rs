use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rand::Rng;

/// Injectable randomness seam. Jitter, chat colors and co-host voices all
/// draw from this so tests can pin the outcomes.
pub trait RandomSource: Send + Sync {
    /// Uniform value in [0, 1).
    fn unit(&self) -> f32;
}

/// Production source backed by the thread-local generator.
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn unit(&self) -> f32 {
        rand::thread_rng().gen::<f32>()
    }
}

/// Cycles through a fixed sequence of values. Deterministic, for tests.
pub struct SequenceRandom {
    values: Vec<f32>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f32>) -> Self {
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }

    /// A source that always yields the same value.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRandom {
    fn unit(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.values[i % self.values.len()]
    }
}

/// Uniform pick from a non-empty slice.
pub fn pick<'a, T>(rng: &dyn RandomSource, items: &'a [T]) -> &'a T {
    let idx = ((rng.unit() * items.len() as f32) as usize).min(items.len() - 1);
    &items[idx]
}

/// Uniform delay in [0, max).
pub fn jitter(rng: &dyn RandomSource, max: Duration) -> Duration {
    Duration::from_millis((rng.unit() * max.as_millis() as f32) as u64)
}
