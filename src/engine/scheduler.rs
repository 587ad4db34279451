//! Tick scheduling abstraction.
//!
//! The controller only decides *whether* ticks should be flowing; the front
//! end owns the actual periodic wake-up (see `cmd::run`, which drives a tokio
//! interval while [`Scheduler::is_active`] holds). Stopping is the sole
//! cancellation primitive and is idempotent.

use std::time::Duration;

/// Default wake-up period of the tick loop.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

pub trait Scheduler: Send {
    /// Begin (or restart) periodic ticking.
    fn start(&mut self);
    /// Stop ticking. Safe to call when already stopped.
    fn stop(&mut self);
    fn is_active(&self) -> bool;
    fn interval(&self) -> Duration;
}

/// Flag-based scheduler polled by an external interval loop.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    interval: Duration,
    active: bool,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            active: false,
        }
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl Scheduler for IntervalScheduler {
    fn start(&mut self) {
        self.active = true;
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn interval(&self) -> Duration {
        self.interval
    }
}
