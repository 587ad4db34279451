//! Sequence definition: steps, cycle count, auto-advance policy, and presets.

mod config;
mod step;
mod templates;

pub use config::{
    EndBehavior, MSG_CYCLES, MSG_NO_STEPS, MSG_STEP_DURATION, SequenceConfig, validate_candidate,
};
pub use step::{Step, StepType};
pub use templates::{TEMPLATE_NAMES, get_template};
