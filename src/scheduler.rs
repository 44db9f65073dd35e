//! Interval-gated periodic tasks off one monotonic clock.
//!
//! The main loop polls two independent [`PeriodicTask`]s each pass: a slow
//! one gating the probe batch read and a fast one gating control
//! evaluation. Neither blocks; a task simply fires when its own elapsed
//! time reaches its own interval.
//!
//! ```text
//!        monotonic now_ms
//!              │
//!     ┌────────┴────────┐
//!     ▼                 ▼
//!  sensor task       control task
//!  (2000 ms)          (500 ms)
//!     │                 │
//!     ▼                 ▼
//!  SensorCache     ChannelController
//!  refresh_all      evaluate × N
//! ```
//!
//! [`PeriodicTask::poll`] returns the *actual* elapsed time since the
//! previous fire, not the nominal interval. The control task feeds that
//! value into the cooling ramp, so scheduler jitter never compounds into
//! ramp-rate error over a cycle that runs for tens of minutes to hours.

/// One non-blocking periodic gate.
#[derive(Debug, Clone, Copy)]
pub struct PeriodicTask {
    interval_ms: u64,
    last_run_ms: u64,
}

impl PeriodicTask {
    /// The first fire happens one full interval after the clock's origin.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_run_ms: 0,
        }
    }

    /// Fire if due. Returns `Some(elapsed_ms)` — the true wall-clock time
    /// since the previous fire — when the interval has passed, `None`
    /// otherwise. `now_ms` must be monotonic.
    pub fn poll(&mut self, now_ms: u64) -> Option<u64> {
        let elapsed = now_ms.saturating_sub(self.last_run_ms);
        if elapsed >= self.interval_ms {
            self.last_run_ms = now_ms;
            Some(elapsed)
        } else {
            None
        }
    }

    /// Configured interval.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
