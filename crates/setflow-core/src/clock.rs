//! Wall-clock abstraction.
//!
//! The engine computes elapsed time as `now - phase_started_at` on
//! every read, so the only thing it needs from the environment is a
//! millisecond timestamp source. Production code uses [`SystemClock`];
//! tests use [`ManualClock`] to advance simulated time deterministically.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Millisecond wall-clock source.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// Real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Hand-driven clock for tests and simulation.
///
/// Time only moves when [`advance_ms`](ManualClock::advance_ms) or
/// [`set_ms`](ManualClock::set_ms) is called.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    /// Move the clock forward by `delta_ms`.
    pub fn advance_ms(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Jump the clock to an absolute instant.
    pub fn set_ms(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);
        clock.advance_ms(500);
        assert_eq!(clock.now_ms(), 1_500);
        clock.set_ms(10_000);
        assert_eq!(clock.now_ms(), 10_000);
    }
}
