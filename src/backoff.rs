//! Bounded exponential backoff with jitter, used to pace upstream reconnects.

use std::time::Duration;

use rand::Rng;

/// Exponential backoff generator.
///
/// The sequence doubles between `min` and `max`, with uniform additive
/// jitter up to `jitter` tacked on after clamping to `max` — so the
/// returned delay can slightly exceed `max`, but never `max + jitter`.
#[derive(Debug, Clone)]
pub struct Backoff {
    min: Duration,
    max: Duration,
    jitter: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(min: Duration, max: Duration, jitter: Duration) -> Self {
        Self {
            min,
            max,
            jitter,
            current: min,
        }
    }

    /// Returns the delay to wait before the next attempt, then doubles the
    /// internal delay (clamped to `max`) for the following call.
    pub fn next(&mut self) -> Duration {
        self.next_with_rng(&mut rand::thread_rng())
    }

    /// Testable variant that takes an explicit RNG.
    pub fn next_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Duration {
        let base = self.current.min(self.max);
        let jitter_add = if self.jitter.is_zero() {
            Duration::ZERO
        } else {
            Duration::from_nanos(rng.gen_range(0..=self.jitter.as_nanos() as u64))
        };

        self.current = (self.current * 2).min(self.max);

        base + jitter_add
    }

    /// Resets the delay back to `min`.
    pub fn reset(&mut self) {
        self.current = self.min;
    }
}

impl Default for Backoff {
    /// Defaults per spec: min 1 minute, max 10 minutes, jitter 1 minute.
    fn default() -> Self {
        Self::new(
            Duration::from_secs(60),
            Duration::from_secs(600),
            Duration::from_secs(60),
        )
    }
}
