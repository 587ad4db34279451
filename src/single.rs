//! Single countdown timer.
//!
//! The degenerate one-step case of the sequence engine: one duration, no
//! cycles, no persistence of progress. Driven only by a foreground tick loop.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::engine::{PlaybackStatus, elapsed_secs};
use crate::sound::{RemindCue, SoundEvent};

pub const DEFAULT_SINGLE_DURATION: u32 = 60;

/// A duration change requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjust {
    /// Add (or subtract) seconds from both duration and remaining time
    By(i64),
    /// Replace the duration and restart the countdown from it
    Set(u32),
}

/// What a single tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SingleTick {
    pub finished: bool,
    pub cue: Option<SoundEvent>,
}

#[derive(Debug, Clone)]
pub struct SingleTimer {
    duration_sec: u32,
    remaining_sec: f64,
    is_running: bool,
    is_paused: bool,
    last_tick: Option<DateTime<Utc>>,
    remind: RemindCue,
}

impl SingleTimer {
    pub fn new(duration_sec: u32) -> Self {
        let duration_sec = duration_sec.max(1);
        Self {
            duration_sec,
            remaining_sec: f64::from(duration_sec),
            is_running: false,
            is_paused: false,
            last_tick: None,
            remind: RemindCue::default(),
        }
    }

    pub fn with_remind(mut self, remind: RemindCue) -> Self {
        self.remind = remind;
        self
    }

    pub fn duration_sec(&self) -> u32 {
        self.duration_sec
    }

    pub fn remaining_sec(&self) -> f64 {
        self.remaining_sec
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.is_running {
            PlaybackStatus::Running
        } else if self.is_paused {
            PlaybackStatus::Paused
        } else if self.remaining_sec <= 0.0 {
            PlaybackStatus::Completed
        } else {
            PlaybackStatus::Idle
        }
    }

    /// Start counting; a finished timer restarts from its full duration.
    pub fn start(&mut self, now: DateTime<Utc>) -> Option<SoundEvent> {
        if self.is_running {
            return None;
        }
        if self.remaining_sec <= 0.0 {
            self.remaining_sec = f64::from(self.duration_sec);
        }
        self.is_running = true;
        self.is_paused = false;
        self.last_tick = Some(now);
        self.remind.observe(self.remaining_sec)
    }

    pub fn pause(&mut self) -> Option<SoundEvent> {
        if !self.is_running {
            return None;
        }
        self.is_running = false;
        self.is_paused = true;
        self.last_tick = None;
        self.remind.silence()
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<SoundEvent> {
        if self.is_running || self.remaining_sec <= 0.0 {
            return self.start(now);
        }
        self.is_running = true;
        self.is_paused = false;
        self.last_tick = Some(now);
        self.remind.observe(self.remaining_sec)
    }

    pub fn reset(&mut self) -> Option<SoundEvent> {
        self.is_running = false;
        self.is_paused = false;
        self.remaining_sec = f64::from(self.duration_sec);
        self.last_tick = None;
        self.remind.silence()
    }

    /// Change the duration. Ignored while a running timer sits at zero.
    pub fn adjust(&mut self, adjust: Adjust) -> bool {
        if self.is_running && self.remaining_sec <= 0.0 {
            return false;
        }
        match adjust {
            Adjust::Set(secs) => {
                self.duration_sec = secs.max(1);
                self.remaining_sec = f64::from(self.duration_sec);
            }
            Adjust::By(delta) => {
                let duration = (i64::from(self.duration_sec) + delta).clamp(1, i64::from(u32::MAX));
                self.duration_sec = duration as u32;
                let duration = f64::from(self.duration_sec);
                self.remaining_sec = (self.remaining_sec + delta as f64).max(1.0).min(duration);
            }
        }
        debug!(duration = self.duration_sec, remaining = self.remaining_sec, "single timer adjusted");
        true
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> SingleTick {
        if !self.is_running {
            return SingleTick::default();
        }
        let delta = self
            .last_tick
            .map_or(0.0, |last| elapsed_secs(last, now).max(0.0));
        self.last_tick = Some(now);
        self.remaining_sec -= delta;

        if self.remaining_sec <= 0.0 {
            self.remaining_sec = 0.0;
            self.is_running = false;
            self.last_tick = None;
            debug!(duration = self.duration_sec, "single timer finished");
            return SingleTick {
                finished: true,
                cue: self.remind.silence(),
            };
        }
        SingleTick {
            finished: false,
            cue: self.remind.observe(self.remaining_sec),
        }
    }
}

impl Default for SingleTimer {
    fn default() -> Self {
        Self::new(DEFAULT_SINGLE_DURATION)
    }
}
