//! Fixed-period tick scheduling.
//!
//! The simulation does not own a timer. Whoever owns the event loop keeps a
//! [`Ticker`], feeds it the current time each frame, and calls
//! [`crate::motion::Simulation::tick`] whenever [`Ticker::poll`] says so.

use std::time::Duration;

/// Interval timer with an explicit start/stop lifecycle.
///
/// Times are seconds on any monotonic clock (egui's `input.time` in the
/// viewer). At most one tick is reported per poll; after a long stall the
/// schedule restarts from the stall instead of bursting to catch up.
#[derive(Clone, Debug)]
pub struct Ticker {
    period: f64,
    last: Option<f64>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.as_secs_f64(),
            last: None,
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(self.period)
    }

    pub fn start(&mut self, now: f64) {
        self.last = Some(now);
    }

    pub fn stop(&mut self) {
        self.last = None;
    }

    pub fn is_running(&self) -> bool {
        self.last.is_some()
    }

    /// Returns `true` if a tick is due at `now` and consumes it.
    pub fn poll(&mut self, now: f64) -> bool {
        let Some(last) = self.last else {
            return false;
        };

        let elapsed = now - last;
        if elapsed < self.period {
            return false;
        }

        // Keep the cadence on small overshoots; resync after a stall.
        self.last = Some(if elapsed >= 2.0 * self.period {
            now
        } else {
            last + self.period
        });
        true
    }

    /// Time until the next tick is due, or `None` when stopped.
    pub fn remaining(&self, now: f64) -> Option<Duration> {
        let last = self.last?;
        Some(Duration::from_secs_f64((last + self.period - now).max(0.0)))
    }
}
