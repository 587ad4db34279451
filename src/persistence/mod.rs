//! Persistence adapter.
//!
//! Serialises mode, sequence config and sequence runtime to a [`StateStore`]
//! and restores them on startup. Every read degrades gracefully:
//! - a missing or invalid config falls back to the default config
//! - each runtime field is clamped into range against the *current* config
//! - an unrecognised mode becomes `single`
//!
//! Reconciliation against the current time is the controller's job; this
//! module only restores a runtime that satisfies the invariants.

mod store;

pub use store::{FileStore, MemoryStore, StateKey, StateStore};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::engine::SequenceRuntime;
use crate::sequence::SequenceConfig;
use crate::session::Mode;

pub struct Persistence {
    store: Box<dyn StateStore>,
}

impl Persistence {
    pub fn new(store: impl StateStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn load_mode(&self) -> Mode {
        self.load_json(StateKey::Mode)
            .and_then(|value| value.as_str().map(Mode::from_stored))
            .unwrap_or_default()
    }

    pub fn save_mode(&self, mode: Mode) -> bool {
        self.save_json(StateKey::Mode, &mode)
    }

    /// Stored config if present and valid, otherwise the default config.
    pub fn load_config(&self) -> SequenceConfig {
        match self.load_json(StateKey::SequenceConfig) {
            Some(value) => SequenceConfig::from_candidate(value).unwrap_or_else(|| {
                warn!("stored sequence config is invalid, using defaults");
                SequenceConfig::default()
            }),
            None => SequenceConfig::default(),
        }
    }

    pub fn save_config(&self, config: &SequenceConfig) -> bool {
        self.save_json(StateKey::SequenceConfig, config)
    }

    /// Stored runtime clamped against `config`, or `None` if nothing usable
    /// was stored.
    pub fn load_runtime(&self, config: &SequenceConfig, now: DateTime<Utc>) -> Option<SequenceRuntime> {
        let value = self.load_json(StateKey::SequenceRuntime)?;
        if !value.is_object() {
            return None;
        }
        Some(restore_runtime(&value, config, now))
    }

    pub fn save_runtime(&self, runtime: &SequenceRuntime) -> bool {
        self.save_json(StateKey::SequenceRuntime, runtime)
    }

    fn load_json(&self, key: StateKey) -> Option<Value> {
        let raw = self.store.load(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(?key, error = %e, "ignoring unparsable state entry");
                None
            }
        }
    }

    fn save_json<T: Serialize>(&self, key: StateKey, value: &T) -> bool {
        let json = match serde_json::to_string_pretty(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(?key, error = %e, "failed to serialize state entry");
                return false;
            }
        };
        let saved = self.store.save(key, &json);
        debug!(?key, saved, "persisted");
        saved
    }
}

/// Rebuild a runtime from an untrusted JSON snapshot.
///
/// Fields are read independently so one corrupt field does not discard the
/// rest; each is clamped into its valid range for `config`.
pub fn restore_runtime(value: &Value, config: &SequenceConfig, now: DateTime<Utc>) -> SequenceRuntime {
    let mut runtime = SequenceRuntime::new(config);

    let index = |field: &str, max: usize| -> usize {
        value
            .get(field)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
            .map_or(0, |v| (v.max(0.0) as usize).min(max))
    };
    let flag = |field: &str| value.get(field).and_then(Value::as_bool).unwrap_or(false);

    runtime.cycle_index = index("cycle_index", config.last_cycle_index());
    runtime.step_index = index("step_index", config.last_step_index());

    let duration = config.step_duration(runtime.step_index);
    runtime.remaining_sec = value
        .get("remaining_sec")
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .map_or(duration, |v| v.clamp(0.0, duration));

    let last_tick = value
        .get("last_tick")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        // a tick from the future would stall reconciliation until the clock catches up
        .map(|t| t.min(now));

    if flag("completed") {
        runtime.finish();
    } else if flag("is_running") {
        // without a timestamp there is no gap to replay; count from now
        runtime.run_from(last_tick.unwrap_or(now));
    } else if flag("is_paused") {
        runtime.freeze();
    }

    runtime
}
