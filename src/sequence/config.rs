//! Sequence configuration model and validation.
//!
//! A `SequenceConfig` is the unit of validation and persistence. It is replaced
//! wholesale on every edit; nothing patches a live config in place.
//!
//! # File format
//!
//! User-submitted configs may be JSON or TOML:
//!
//! ```toml
//! name = "Intervals"
//! cycles = 3
//! auto_start_next = true
//! auto_start_next_cycle = false
//!
//! [[steps]]
//! label = "Sprint"
//! duration_sec = 30
//! type = "work"
//!
//! [[steps]]
//! label = "Walk"
//! duration_sec = 90
//! type = "rest"
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use super::step::{Step, StepType};
use crate::errors::{TimerError, ValidationErrors};

/// What happens after the last step of the last cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndBehavior {
    #[default]
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceConfig {
    #[serde(default)]
    pub name: String,
    pub steps: Vec<Step>,
    #[serde(default = "default_cycles")]
    pub cycles: u32,
    /// Continue into the next step without pausing when a step ends on its own
    #[serde(default = "default_auto_start")]
    pub auto_start_next: bool,
    /// Continue into the next cycle without pausing when a cycle ends on its own
    #[serde(default = "default_auto_start")]
    pub auto_start_next_cycle: bool,
    #[serde(default)]
    pub end_behavior: EndBehavior,
}

fn default_cycles() -> u32 {
    1
}

fn default_auto_start() -> bool {
    true
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            steps: vec![Step::new("Step 1", 60, StepType::Generic)],
            cycles: default_cycles(),
            auto_start_next: default_auto_start(),
            auto_start_next_cycle: default_auto_start(),
            end_behavior: EndBehavior::default(),
        }
    }
}

pub const MSG_STEP_DURATION: &str = "Each step needs a duration of at least 1 second.";
pub const MSG_CYCLES: &str = "Cycle count must be at least 1.";
pub const MSG_NO_STEPS: &str = "At least one step is required.";

impl SequenceConfig {
    /// Check the config invariants, collecting every user-facing problem.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for step in &self.steps {
            if step.duration_sec < 1 {
                errors.push(MSG_STEP_DURATION);
            }
        }
        if self.cycles < 1 {
            errors.push(MSG_CYCLES);
        }
        if self.steps.is_empty() {
            errors.push(MSG_NO_STEPS);
        }
        errors.into_result()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Build a config from untrusted JSON (e.g. persisted state).
    ///
    /// Returns `None` when the candidate fails [`validate_candidate`] or does
    /// not fit the typed model.
    pub fn from_candidate(candidate: Value) -> Option<Self> {
        if !validate_candidate(&candidate) {
            return None;
        }
        let config: SequenceConfig = serde_json::from_value(candidate).ok()?;
        config.is_valid().then_some(config)
    }

    /// Parse a user-submitted config file; the caller validates it.
    pub fn from_file(path: &Path) -> Result<Self, TimerError> {
        let content = std::fs::read_to_string(path).map_err(|source| TimerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let parse_error = |message: String| TimerError::ConfigParse {
            path: path.to_path_buf(),
            message,
        };

        match extension.as_deref() {
            Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
            Some("toml") => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
            _ => Err(TimerError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Total steps the sequence plays across all cycles.
    pub fn total_steps(&self) -> u64 {
        u64::from(self.cycles) * self.steps.len() as u64
    }

    /// Full duration of the step at `index` in seconds, 0 when out of range.
    pub fn step_duration(&self, index: usize) -> f64 {
        self.steps.get(index).map_or(0.0, Step::duration)
    }

    pub fn last_step_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn last_cycle_index(&self) -> usize {
        (self.cycles as usize).saturating_sub(1)
    }

    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            "Untitled sequence"
        } else {
            trimmed
        }
    }
}

/// Structural check of an untrusted candidate config.
///
/// Rejects non-objects, missing or empty `steps`, a `cycles` that is not a
/// positive integer, and any step whose `duration_sec` is not a finite
/// number >= 1.
pub fn validate_candidate(candidate: &Value) -> bool {
    let Some(object) = candidate.as_object() else {
        return false;
    };

    let Some(steps) = object.get("steps").and_then(Value::as_array) else {
        return false;
    };
    if steps.is_empty() {
        return false;
    }

    let cycles_ok = object
        .get("cycles")
        .and_then(Value::as_u64)
        .is_some_and(|cycles| cycles >= 1 && cycles <= u64::from(u32::MAX));
    if !cycles_ok {
        return false;
    }

    steps.iter().all(|step| {
        step.get("duration_sec")
            .and_then(Value::as_f64)
            .is_some_and(|duration| duration.is_finite() && duration >= 1.0)
    })
}
