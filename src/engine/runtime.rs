use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sequence::SequenceConfig;

/// Coarse playback state derived from the runtime flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackStatus::Idle => write!(f, "idle"),
            PlaybackStatus::Running => write!(f, "running"),
            PlaybackStatus::Paused => write!(f, "paused"),
            PlaybackStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Live progress cursor over a [`SequenceConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRuntime {
    pub cycle_index: usize,
    pub step_index: usize,
    /// Seconds left in the current step; fractional while running
    pub remaining_sec: f64,
    pub is_running: bool,
    pub is_paused: bool,
    pub completed: bool,
    /// Last instant the remaining time was reconciled; set iff running
    pub last_tick: Option<DateTime<Utc>>,
}

impl SequenceRuntime {
    /// Fresh runtime at the first step of the first cycle, not running.
    pub fn new(config: &SequenceConfig) -> Self {
        let first = config.step_duration(0);
        Self {
            cycle_index: 0,
            step_index: 0,
            remaining_sec: if first > 0.0 { first } else { 1.0 },
            is_running: false,
            is_paused: false,
            completed: false,
            last_tick: None,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.completed {
            PlaybackStatus::Completed
        } else if self.is_running {
            PlaybackStatus::Running
        } else if self.is_paused {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Idle
        }
    }

    pub fn is_at_origin(&self) -> bool {
        self.cycle_index == 0 && self.step_index == 0
    }

    pub(crate) fn run_from(&mut self, now: DateTime<Utc>) {
        self.is_running = true;
        self.is_paused = false;
        self.completed = false;
        self.last_tick = Some(now);
    }

    /// Stop counting and wait for a manual resume.
    pub(crate) fn freeze(&mut self) {
        self.is_running = false;
        self.is_paused = true;
        self.last_tick = None;
    }

    pub(crate) fn finish(&mut self) {
        self.is_running = false;
        self.is_paused = false;
        self.completed = true;
        self.remaining_sec = 0.0;
        self.last_tick = None;
    }

    /// Every invariant a reachable runtime must satisfy against `config`.
    pub fn satisfies_invariants(&self, config: &SequenceConfig) -> bool {
        let duration = config.step_duration(self.step_index);
        let indices = self.cycle_index < config.cycles as usize && self.step_index < config.steps.len();
        let remaining = self.remaining_sec >= 0.0 && self.remaining_sec <= duration;
        let flags = !(self.is_running && self.is_paused);
        let terminal = !self.completed
            || (!self.is_running && !self.is_paused && self.remaining_sec == 0.0);
        let timestamp = self.is_running == self.last_tick.is_some();
        indices && remaining && flags && terminal && timestamp
    }
}
