//! Session: the active mode plus the sequence controller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::engine::{Clock, Controller, PlaybackStatus, Scheduler};
use crate::persistence::Persistence;
use crate::sound::{RemindCue, SoundPlayer};

/// Which timer the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Single,
    Sequence,
}

impl Mode {
    /// Parse a stored value; anything unrecognised is `Single`.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Single => write!(f, "single"),
            Mode::Sequence => write!(f, "sequence"),
        }
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(Mode::Single),
            "sequence" => Ok(Mode::Sequence),
            _ => anyhow::bail!("Invalid mode: {}. Use single or sequence", s),
        }
    }
}

pub struct Session {
    mode: Mode,
    controller: Controller,
    persistence: Arc<Persistence>,
}

impl Session {
    /// Hydrate mode, config and runtime from `persistence`.
    pub fn open(
        persistence: Arc<Persistence>,
        clock: Arc<dyn Clock>,
        sound: Arc<dyn SoundPlayer>,
        scheduler: Box<dyn Scheduler>,
        remind: RemindCue,
    ) -> Self {
        let mode = persistence.load_mode();
        let controller = Controller::hydrate(Arc::clone(&persistence), clock, sound, scheduler)
            .with_remind(remind);
        Self {
            mode,
            controller,
            persistence,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    /// Change mode. Leaving sequence mode pauses a running sequence.
    pub fn switch_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        if self.mode == Mode::Sequence && self.controller.status() == PlaybackStatus::Running {
            self.controller.pause();
        }
        self.mode = mode;
        self.persistence.save_mode(mode);
        info!(%mode, "mode switched");
    }
}
