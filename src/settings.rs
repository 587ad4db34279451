//! User settings for seqtimer.
//!
//! Settings live in `seqtimer.toml` inside the state directory, or at the path
//! given with `--config`. Layering is file → environment → CLI.
//!
//! # File Format
//!
//! ```toml
//! [timer]
//! tick_interval_ms = 200
//!
//! [sound]
//! enabled = true
//! remind_threshold_sec = 60
//! remind_stop_sec = 55
//! ```
//!
//! # Environment
//!
//! | Variable             | Effect                                  |
//! |----------------------|-----------------------------------------|
//! | `SEQTIMER_TICK_MS`   | overrides `timer.tick_interval_ms`      |
//! | `SEQTIMER_SOUND`     | `off`/`false`/`0` disables sound        |
//! | `SEQTIMER_STATE_DIR` | state directory when `--state-dir` unset |

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::errors::SettingsError;
use crate::sound::{DEFAULT_REMIND_STOP_SEC, DEFAULT_REMIND_THRESHOLD_SEC, RemindCue};

pub const SETTINGS_FILE: &str = "seqtimer.toml";
pub const STATE_DIR_ENV: &str = "SEQTIMER_STATE_DIR";
pub const TICK_ENV: &str = "SEQTIMER_TICK_MS";
pub const SOUND_ENV: &str = "SEQTIMER_SOUND";

const MIN_TICK_MS: u64 = 10;
const MAX_TICK_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSection {
    /// Foreground tick period in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_tick_interval_ms() -> u64 {
    200
}

impl Default for TimerSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundSection {
    #[serde(default = "default_sound_enabled")]
    pub enabled: bool,
    /// Remaining seconds at which the remind cue plays
    #[serde(default = "default_remind_threshold")]
    pub remind_threshold_sec: u32,
    /// Remaining seconds at which a playing remind cue is cut off
    #[serde(default = "default_remind_stop")]
    pub remind_stop_sec: u32,
}

fn default_sound_enabled() -> bool {
    true
}

fn default_remind_threshold() -> u32 {
    DEFAULT_REMIND_THRESHOLD_SEC
}

fn default_remind_stop() -> u32 {
    DEFAULT_REMIND_STOP_SEC
}

impl Default for SoundSection {
    fn default() -> Self {
        Self {
            enabled: default_sound_enabled(),
            remind_threshold_sec: default_remind_threshold(),
            remind_stop_sec: default_remind_stop(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub timer: TimerSection,
    #[serde(default)]
    pub sound: SoundSection,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse seqtimer.toml")
    }

    /// Load the settings file at `path`, or defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize seqtimer.toml")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;
        Ok(())
    }

    /// Apply process environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(TICK_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.timer.tick_interval_ms = ms,
                Err(_) => warn!(value = %raw, "ignoring non-numeric {}", TICK_ENV),
            }
        }
        if let Some(raw) = lookup(SOUND_ENV) {
            let raw = raw.trim().to_lowercase();
            self.sound.enabled = !matches!(raw.as_str(), "off" | "false" | "0" | "no");
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let tick = self.timer.tick_interval_ms;
        if !(MIN_TICK_MS..=MAX_TICK_MS).contains(&tick) {
            return Err(SettingsError::TickIntervalOutOfBounds { value: tick });
        }
        if self.sound.remind_stop_sec >= self.sound.remind_threshold_sec {
            return Err(SettingsError::RemindWindowInverted {
                threshold: self.sound.remind_threshold_sec,
                stop: self.sound.remind_stop_sec,
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.timer.tick_interval_ms)
    }

    pub fn remind_cue(&self) -> RemindCue {
        RemindCue::new(self.sound.remind_threshold_sec, self.sound.remind_stop_sec)
    }
}

/// Resolve the state directory (CLI → env → platform data dir → `./.seqtimer`).
pub fn resolve_state_dir(cli: Option<&Path>) -> PathBuf {
    resolve_state_dir_from(cli, |key| std::env::var(key).ok())
}

pub fn resolve_state_dir_from(
    cli: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> PathBuf {
    if let Some(dir) = cli {
        return dir.to_path_buf();
    }
    if let Some(dir) = lookup(STATE_DIR_ENV).filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|d| d.join("seqtimer"))
        .unwrap_or_else(|| PathBuf::from(".seqtimer"))
}
