//! Built-in sequence presets.
//!
//! Applying a template replaces the current config wholesale and resets the
//! runtime, exactly like saving an edited config.

use super::config::{EndBehavior, SequenceConfig};
use super::step::{Step, StepType};

/// Names accepted by [`get_template`], in display order.
pub const TEMPLATE_NAMES: &[&str] = &["pomodoro", "cooking"];

/// Look up a preset by name (case-insensitive).
pub fn get_template(name: &str) -> Option<SequenceConfig> {
    match name.to_lowercase().as_str() {
        "pomodoro" => Some(pomodoro()),
        "cooking" => Some(cooking()),
        _ => None,
    }
}

fn pomodoro() -> SequenceConfig {
    SequenceConfig {
        name: "Pomodoro".to_string(),
        steps: vec![
            Step::new("Work", 25 * 60, StepType::Work),
            Step::new("Break", 5 * 60, StepType::Rest),
        ],
        cycles: 4,
        auto_start_next: true,
        auto_start_next_cycle: true,
        end_behavior: EndBehavior::Stop,
    }
}

fn cooking() -> SequenceConfig {
    SequenceConfig {
        name: "Cooking example".to_string(),
        steps: vec![
            Step::new("First stage", 10 * 60, StepType::Generic),
            Step::new("Flip reminder", 30, StepType::Generic),
            Step::new("Finish", 3 * 60, StepType::Generic),
        ],
        cycles: 1,
        auto_start_next: true,
        auto_start_next_cycle: true,
        end_behavior: EndBehavior::Stop,
    }
}
