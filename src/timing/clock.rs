use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::foundation::error::{WaylineError, WaylineResult};

/// Monotonic time source in milliseconds.
///
/// The engine itself is driven with explicit timestamps; a clock only
/// exists so drivers (and tests) agree on where those timestamps come from.
pub trait Clock {
    /// Milliseconds elapsed since the clock's origin.
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by a monotonic [`Instant`] origin.
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// A clock whose origin is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually advanced clock for deterministic tests and scrub drivers.
///
/// Clones share the same underlying time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// A clock starting at 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `delta_ms`.
    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }

    /// Set the clock to an absolute timestamp.
    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Cooperative frame scheduler.
///
/// The schedule is polled, not callback-driven: the owning loop asks
/// [`FrameScheduler::poll`] whether a tick is due at `now`. Cancelling stops
/// the schedule and is idempotent; a cancelled scheduler can be started
/// again.
#[derive(Clone, Debug)]
pub struct FrameScheduler {
    interval_ms: f64,
    next_due_ms: Option<f64>,
}

impl FrameScheduler {
    /// Create a scheduler with a fixed tick interval in milliseconds.
    pub fn new(interval_ms: f64) -> WaylineResult<Self> {
        if !interval_ms.is_finite() || interval_ms <= 0.0 {
            return Err(WaylineError::validation(
                "scheduler interval must be finite and > 0",
            ));
        }
        Ok(Self {
            interval_ms,
            next_due_ms: None,
        })
    }

    /// Start (or restart) the schedule; the first tick is due one interval
    /// after `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.interval_ms);
    }

    /// Stop the schedule. Cancelling an already-cancelled scheduler is a
    /// no-op.
    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    /// `true` while the schedule is active.
    pub fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Report whether a tick is due at `now_ms`, scheduling the next one
    /// relative to `now_ms` so suspended intervals collapse into a single
    /// tick instead of a burst.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.next_due_ms {
            Some(due) if now_ms >= due => {
                self.next_due_ms = Some(now_ms + self.interval_ms);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/clock.rs"]
mod tests;
