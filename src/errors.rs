//! Typed error hierarchy for seqtimer.
//!
//! - `ValidationErrors`: user-facing messages for a rejected sequence config
//! - `TimerError`: controller and config-submission failures
//! - `SettingsError`: invalid `seqtimer.toml` values
//!
//! Storage failures have no variant: the persistence layer swallows them and
//! reports "nothing stored" instead.

use std::path::PathBuf;
use thiserror::Error;

/// De-duplicated, ordered list of messages explaining why a config was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message unless an identical one is already present.
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.messages.contains(&message) {
            self.messages.push(message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages.join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors surfaced by the playback controller and config submission.
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("Sequence config is invalid: {0}")]
    InvalidConfig(#[from] ValidationErrors),

    #[error("Unknown template '{name}'. Available: {available}")]
    UnknownTemplate { name: String, available: String },

    #[error("Failed to read sequence config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse sequence config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unsupported config format for {path} (expected .json or .toml)")]
    UnsupportedFormat { path: PathBuf },
}

/// Errors from validating `seqtimer.toml`.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("tick_interval_ms must be in [10, 5000], got {value}")]
    TickIntervalOutOfBounds { value: u64 },

    #[error("remind_stop_sec ({stop}) must be below remind_threshold_sec ({threshold})")]
    RemindWindowInverted { threshold: u32, stop: u32 },
}
