//! Sequence timer engine.
//!
//! This module provides:
//! - **Runtime**: the mutable progress cursor over a sequence config
//! - **Advancement**: step → step, step → cycle, and cycle → completion
//! - **Reconciliation**: replaying an arbitrary wall-clock gap in one pass
//! - **Scheduling**: the injected start/stop tick abstraction
//! - **Controller**: the start/pause/resume/reset/skip/back command surface
//!
//! Time is always read through an injected [`Clock`], so the algorithms are
//! deterministic under test.

mod advance;
mod clock;
mod controller;
mod reconcile;
mod runtime;
mod scheduler;

pub use advance::{Advanced, Boundary, Trigger, advance, retreat};
pub use clock::{Clock, ManualClock, SystemClock, elapsed_secs};
pub use controller::{Controller, Snapshot};
pub use reconcile::{Reconciled, reconcile};
pub use runtime::{PlaybackStatus, SequenceRuntime};
pub use scheduler::{DEFAULT_TICK_INTERVAL, IntervalScheduler, Scheduler};
