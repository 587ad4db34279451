//! Step/cycle advancement.
//!
//! One algorithm covers every way a step can end: the tick loop and
//! reconciliation call it with [`Trigger::Timer`], a user skip calls it with
//! [`Trigger::Manual`]. Only timer-triggered advances honour the
//! auto-advance flags; a manual skip always proceeds.
//!
//! Stopping the scheduler is the caller's job: whenever the runtime comes
//! back not running, the caller must stop ticking.

use tracing::debug;

use super::runtime::SequenceRuntime;
use crate::sequence::SequenceConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The countdown of the current step reached zero
    Timer,
    /// The user asked to skip the current step
    Manual,
}

/// Which boundary an advance crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Moved to the next step within the same cycle
    Step,
    /// Wrapped to the first step of the next cycle
    Cycle,
    /// Finished the last step of the last cycle
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advanced {
    pub boundary: Boundary,
    /// Whether the runtime is still counting down after the advance
    pub kept_running: bool,
}

pub fn advance(config: &SequenceConfig, runtime: &mut SequenceRuntime, trigger: Trigger) -> Advanced {
    if runtime.step_index < config.last_step_index() {
        runtime.step_index += 1;
        runtime.remaining_sec = config.step_duration(runtime.step_index);
        runtime.completed = false;
        return continue_or_freeze(runtime, Boundary::Step, trigger, config.auto_start_next);
    }

    if runtime.cycle_index < config.last_cycle_index() {
        runtime.cycle_index += 1;
        runtime.step_index = 0;
        runtime.remaining_sec = config.step_duration(0);
        runtime.completed = false;
        return continue_or_freeze(runtime, Boundary::Cycle, trigger, config.auto_start_next_cycle);
    }

    runtime.finish();
    debug!(cycles = config.cycles, "sequence completed");
    Advanced {
        boundary: Boundary::Finished,
        kept_running: false,
    }
}

fn continue_or_freeze(
    runtime: &mut SequenceRuntime,
    boundary: Boundary,
    trigger: Trigger,
    auto_start: bool,
) -> Advanced {
    if trigger == Trigger::Timer && !auto_start {
        runtime.freeze();
        debug!(
            cycle = runtime.cycle_index,
            step = runtime.step_index,
            ?boundary,
            "auto-advance disabled, pausing at boundary"
        );
        return Advanced {
            boundary,
            kept_running: false,
        };
    }

    debug!(
        cycle = runtime.cycle_index,
        step = runtime.step_index,
        ?boundary,
        ?trigger,
        "advanced"
    );
    Advanced {
        boundary,
        kept_running: runtime.is_running,
    }
}

/// Move one step backwards, wrapping into the previous cycle's last step.
///
/// Returns `false` (and leaves the runtime untouched) at the very first step
/// of the first cycle. The caller decides the running/paused status.
pub fn retreat(config: &SequenceConfig, runtime: &mut SequenceRuntime) -> bool {
    if runtime.step_index > 0 {
        runtime.step_index -= 1;
    } else if runtime.cycle_index > 0 {
        runtime.cycle_index -= 1;
        runtime.step_index = config.last_step_index();
    } else {
        return false;
    }
    runtime.remaining_sec = config.step_duration(runtime.step_index);
    runtime.completed = false;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{Step, StepType};
    use chrono::Utc;

    fn config(steps: &[u32], cycles: u32, next: bool, next_cycle: bool) -> SequenceConfig {
        SequenceConfig {
            steps: steps
                .iter()
                .map(|d| Step::new("", *d, StepType::Generic))
                .collect(),
            cycles,
            auto_start_next: next,
            auto_start_next_cycle: next_cycle,
            ..SequenceConfig::default()
        }
    }

    fn running(config: &SequenceConfig) -> SequenceRuntime {
        let mut runtime = SequenceRuntime::new(config);
        runtime.run_from(Utc::now());
        runtime
    }

    #[test]
    fn test_step_advance_keeps_running() {
        let config = config(&[30, 20], 1, true, true);
        let mut runtime = running(&config);
        let result = advance(&config, &mut runtime, Trigger::Timer);
        assert_eq!(result.boundary, Boundary::Step);
        assert!(result.kept_running);
        assert_eq!(runtime.step_index, 1);
        assert_eq!(runtime.remaining_sec, 20.0);
        assert!(runtime.satisfies_invariants(&config));
    }

    #[test]
    fn test_step_advance_freezes_without_auto_start() {
        let config = config(&[30, 20], 1, false, true);
        let mut runtime = running(&config);
        let result = advance(&config, &mut runtime, Trigger::Timer);
        assert!(!result.kept_running);
        assert!(runtime.is_paused);
        assert!(!runtime.is_running);
        assert!(runtime.last_tick.is_none());
        assert_eq!(runtime.step_index, 1);
        assert_eq!(runtime.remaining_sec, 20.0);
    }

    #[test]
    fn test_cycle_advance_uses_cycle_flag() {
        let config = config(&[30, 20], 2, true, false);
        let mut runtime = running(&config);
        advance(&config, &mut runtime, Trigger::Timer);
        let result = advance(&config, &mut runtime, Trigger::Timer);
        assert_eq!(result.boundary, Boundary::Cycle);
        assert!(!result.kept_running);
        assert_eq!((runtime.cycle_index, runtime.step_index), (1, 0));
        assert_eq!(runtime.remaining_sec, 30.0);
        assert!(runtime.is_paused);
    }

    #[test]
    fn test_manual_trigger_bypasses_flags() {
        let config = config(&[30, 20], 2, false, false);
        let mut runtime = running(&config);
        assert!(advance(&config, &mut runtime, Trigger::Manual).kept_running);
        assert!(advance(&config, &mut runtime, Trigger::Manual).kept_running);
        assert_eq!((runtime.cycle_index, runtime.step_index), (1, 0));
        assert!(runtime.is_running);
    }

    #[test]
    fn test_manual_trigger_on_paused_runtime_stays_stopped() {
        let config = config(&[30, 20], 1, true, true);
        let mut runtime = SequenceRuntime::new(&config);
        let result = advance(&config, &mut runtime, Trigger::Manual);
        assert!(!result.kept_running);
        assert_eq!(runtime.step_index, 1);
    }

    #[test]
    fn test_terminal_transition() {
        let config = config(&[30], 1, true, true);
        let mut runtime = running(&config);
        let result = advance(&config, &mut runtime, Trigger::Timer);
        assert_eq!(result.boundary, Boundary::Finished);
        assert!(!result.kept_running);
        assert!(runtime.completed);
        assert_eq!(runtime.remaining_sec, 0.0);
        assert!(!runtime.is_running && !runtime.is_paused);
        assert!(runtime.last_tick.is_none());
    }

    #[test]
    fn test_completes_after_exactly_cycles_times_steps_advances() {
        for (steps, cycles) in [(vec![5], 1), (vec![5, 6, 7], 1), (vec![5, 6], 3), (vec![1], 4)] {
            let config = config(&steps, cycles, true, true);
            let mut runtime = running(&config);
            let mut advances = 0u64;
            while !runtime.completed {
                advance(&config, &mut runtime, Trigger::Timer);
                advances += 1;
                assert!(runtime.satisfies_invariants(&config));
                assert!(advances <= config.total_steps());
            }
            assert_eq!(advances, config.total_steps());
        }
    }

    #[test]
    fn test_retreat_within_and_across_cycles() {
        let config = config(&[30, 20, 10], 2, true, true);
        let mut runtime = SequenceRuntime::new(&config);
        runtime.cycle_index = 1;
        runtime.step_index = 0;
        runtime.remaining_sec = 3.0;

        assert!(retreat(&config, &mut runtime));
        assert_eq!((runtime.cycle_index, runtime.step_index), (0, 2));
        assert_eq!(runtime.remaining_sec, 10.0);

        assert!(retreat(&config, &mut runtime));
        assert_eq!((runtime.cycle_index, runtime.step_index), (0, 1));
        assert_eq!(runtime.remaining_sec, 20.0);
    }

    #[test]
    fn test_retreat_at_origin_is_noop() {
        let config = config(&[30, 20], 2, true, true);
        let mut runtime = SequenceRuntime::new(&config);
        runtime.remaining_sec = 12.5;
        let before = runtime.clone();
        assert!(!retreat(&config, &mut runtime));
        assert_eq!(runtime, before);
    }
}
