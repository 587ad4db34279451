use serde::{Deserialize, Deserializer, Serialize};

/// Semantic kind of a step. Only affects presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    #[default]
    Generic,
    Work,
    Rest,
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepType::Generic => write!(f, "generic"),
            StepType::Work => write!(f, "work"),
            StepType::Rest => write!(f, "rest"),
        }
    }
}

impl std::str::FromStr for StepType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generic" => Ok(StepType::Generic),
            "work" => Ok(StepType::Work),
            "rest" => Ok(StepType::Rest),
            _ => anyhow::bail!(
                "Invalid step type '{}'. Valid values: generic, work, rest",
                s
            ),
        }
    }
}

/// One timed phase within a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Display label; may be empty, in which case the UI shows "Step N"
    #[serde(default)]
    pub label: String,
    /// Duration in whole seconds, at least 1 for a valid config
    #[serde(deserialize_with = "whole_seconds")]
    pub duration_sec: u32,
    #[serde(default, rename = "type")]
    pub step_type: StepType,
}

impl Step {
    pub fn new(label: &str, duration_sec: u32, step_type: StepType) -> Self {
        Self {
            label: label.to_string(),
            duration_sec,
            step_type,
        }
    }

    /// Duration as fractional seconds, the unit the runtime counts in.
    #[inline]
    pub fn duration(&self) -> f64 {
        f64::from(self.duration_sec)
    }

    /// Label to display for the step at `index`, falling back to "Step N".
    pub fn display_label(&self, index: usize) -> String {
        let trimmed = self.label.trim();
        if trimmed.is_empty() {
            format!("Step {}", index + 1)
        } else {
            trimmed.to_string()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeconds {
    Whole(u64),
    Negative(i64),
    Fractional(f64),
}

/// Accept any finite number of seconds, flooring fractions and treating
/// negatives as 0 so validation reports them.
fn whole_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match RawSeconds::deserialize(deserializer)? {
        RawSeconds::Whole(n) => Ok(u32::try_from(n).unwrap_or(u32::MAX)),
        RawSeconds::Negative(_) => Ok(0),
        RawSeconds::Fractional(f) if f.is_finite() => Ok(f.max(0.0).floor() as u32),
        RawSeconds::Fractional(_) => Err(serde::de::Error::custom(
            "duration_sec must be a finite number",
        )),
    }
}
