//! Elapsed-time reconciliation.
//!
//! Replays boundary crossings for a wall-clock gap instead of simulating every
//! tick, so catching up after hours of suspension costs one iteration per
//! step boundary crossed. Overshoot past a boundary carries into the next
//! step; a freeze (auto-advance off) or the terminal step discards whatever
//! gap time is left.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::advance::{Trigger, advance};
use super::clock::elapsed_secs;
use super::runtime::SequenceRuntime;
use crate::sequence::SequenceConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reconciled {
    /// Step, cycle, or terminal boundaries crossed while catching up
    pub crossings: u32,
}

impl Reconciled {
    pub fn crossed_boundary(&self) -> bool {
        self.crossings > 0
    }
}

/// Catch `runtime` up to `now`.
///
/// No-op unless the runtime is running, has a timestamp, and `now` is strictly
/// after it.
pub fn reconcile(
    config: &SequenceConfig,
    runtime: &mut SequenceRuntime,
    now: DateTime<Utc>,
) -> Reconciled {
    let mut outcome = Reconciled::default();

    if !runtime.is_running {
        return outcome;
    }
    let Some(last_tick) = runtime.last_tick else {
        return outcome;
    };
    let elapsed = elapsed_secs(last_tick, now);
    if elapsed <= 0.0 {
        return outcome;
    }

    runtime.remaining_sec -= elapsed;
    while runtime.remaining_sec <= 0.0 && !runtime.completed {
        let overshoot = runtime.remaining_sec.abs();
        let advanced = advance(config, runtime, Trigger::Timer);
        outcome.crossings += 1;
        if runtime.completed || !advanced.kept_running {
            // advance() already left the full duration (freeze) or zero (terminal)
            break;
        }
        runtime.remaining_sec = config.step_duration(runtime.step_index) - overshoot;
    }

    runtime.last_tick = if runtime.is_running { Some(now) } else { None };

    if outcome.crossed_boundary() {
        debug!(
            elapsed_secs = elapsed,
            crossings = outcome.crossings,
            cycle = runtime.cycle_index,
            step = runtime.step_index,
            remaining = runtime.remaining_sec,
            "reconciled elapsed time"
        );
    }
    outcome
}
