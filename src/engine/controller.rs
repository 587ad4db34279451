//! Playback controller: the command surface of the sequence timer.
//!
//! State machine:
//!
//! | From              | Command  | To                                   |
//! |-------------------|----------|--------------------------------------|
//! | Idle / Paused     | `start`  | Running                              |
//! | Completed         | `start`  | reset, then Running                  |
//! | Running           | `pause`  | Paused                               |
//! | Paused / Idle     | `resume` | Running                              |
//! | Completed         | `resume` | reset, then Running                  |
//! | any               | `reset`  | Idle at cycle 0, step 0              |
//! | not Completed     | `skip`   | next step; Running stays Running     |
//! | not at origin     | `back`   | previous step; Running stays Running |
//!
//! Every command first catches the runtime up to the clock, so it always
//! starts from a consistent state, and persists the result afterwards.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::advance::{Trigger, advance, retreat};
use super::clock::Clock;
use super::reconcile::{Reconciled, reconcile};
use super::runtime::{PlaybackStatus, SequenceRuntime};
use super::scheduler::Scheduler;
use crate::errors::TimerError;
use crate::persistence::Persistence;
use crate::sequence::{SequenceConfig, TEMPLATE_NAMES, get_template};
use crate::sound::{self, RemindCue, SoundKind, SoundPlayer};

/// Read-only view handed to presentation.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub config: &'a SequenceConfig,
    pub runtime: &'a SequenceRuntime,
    pub status: PlaybackStatus,
}

pub struct Controller {
    config: SequenceConfig,
    runtime: SequenceRuntime,
    clock: Arc<dyn Clock>,
    scheduler: Box<dyn Scheduler>,
    sound: Arc<dyn SoundPlayer>,
    persistence: Arc<Persistence>,
    remind: RemindCue,
}

impl Controller {
    /// Controller over `config` with a fresh runtime. Nothing is persisted
    /// until the first command.
    pub fn with_config(
        config: SequenceConfig,
        persistence: Arc<Persistence>,
        clock: Arc<dyn Clock>,
        sound: Arc<dyn SoundPlayer>,
        scheduler: Box<dyn Scheduler>,
    ) -> Self {
        let runtime = SequenceRuntime::new(&config);
        Self {
            config,
            runtime,
            clock,
            scheduler,
            sound,
            persistence,
            remind: RemindCue::default(),
        }
    }

    /// Restore config and runtime from storage and replay the gap since the
    /// runtime was last written.
    pub fn hydrate(
        persistence: Arc<Persistence>,
        clock: Arc<dyn Clock>,
        sound: Arc<dyn SoundPlayer>,
        scheduler: Box<dyn Scheduler>,
    ) -> Self {
        let now = clock.now();
        let config = persistence.load_config();
        let restored = persistence.load_runtime(&config, now);
        let had_runtime = restored.is_some();

        let mut controller = Self::with_config(config, persistence, clock, sound, scheduler);
        if let Some(runtime) = restored {
            controller.runtime = runtime;
        }

        let outcome = reconcile(&controller.config, &mut controller.runtime, now);
        if controller.runtime.is_running {
            controller.scheduler.start();
        }
        if had_runtime {
            controller.persist_runtime();
        }
        debug!(
            crossings = outcome.crossings,
            status = %controller.runtime.status(),
            "hydrated sequence"
        );
        controller
    }

    /// Replace the default remind thresholds.
    pub fn with_remind(mut self, remind: RemindCue) -> Self {
        self.remind = remind;
        self
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            config: &self.config,
            runtime: &self.runtime,
            status: self.runtime.status(),
        }
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    pub fn runtime(&self) -> &SequenceRuntime {
        &self.runtime
    }

    pub fn status(&self) -> PlaybackStatus {
        self.runtime.status()
    }

    /// Whether the tick loop should keep waking up.
    pub fn is_scheduled(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn tick_interval(&self) -> Duration {
        self.scheduler.interval()
    }

    /// One scheduler wake-up: fold elapsed time in, crossing any boundaries.
    pub fn tick(&mut self) -> Reconciled {
        if !self.runtime.is_running {
            self.scheduler.stop();
            return Reconciled::default();
        }
        let outcome = self.catch_up();
        self.persist_runtime();
        outcome
    }

    pub fn start(&mut self) -> Result<(), TimerError> {
        self.config.validate()?;
        self.catch_up();
        if self.runtime.is_running {
            return Ok(());
        }
        if self.runtime.completed {
            self.reset_runtime();
        }
        self.run_now();
        info!(
            cycle = self.runtime.cycle_index,
            step = self.runtime.step_index,
            "sequence started"
        );
        self.persist_runtime();
        Ok(())
    }

    pub fn pause(&mut self) {
        self.catch_up();
        if !self.runtime.is_running {
            return;
        }
        self.runtime.freeze();
        self.scheduler.stop();
        sound::apply(self.sound.as_ref(), self.remind.silence());
        info!(remaining = self.runtime.remaining_sec, "sequence paused");
        self.persist_runtime();
    }

    pub fn resume(&mut self) {
        self.catch_up();
        if self.runtime.is_running {
            return;
        }
        if self.runtime.completed {
            self.reset_runtime();
        }
        self.run_now();
        info!(remaining = self.runtime.remaining_sec, "sequence resumed");
        self.persist_runtime();
    }

    pub fn reset(&mut self) {
        self.reset_runtime();
        self.sound.stop(SoundKind::End);
        info!("sequence reset");
        self.persist_runtime();
    }

    /// Advance to the next step regardless of the auto-advance flags.
    pub fn skip(&mut self) {
        self.catch_up();
        if self.runtime.completed {
            return;
        }
        let was_running = self.runtime.is_running;
        let advanced = advance(&self.config, &mut self.runtime, Trigger::Manual);
        if !self.runtime.completed {
            self.hold_status(was_running);
        }
        self.sync_scheduler();
        info!(boundary = ?advanced.boundary, "step skipped");
        self.persist_runtime();
    }

    /// Return to the previous step. No effect at the very first step.
    pub fn back(&mut self) {
        self.catch_up();
        let was_running = self.runtime.is_running;
        if !retreat(&self.config, &mut self.runtime) {
            return;
        }
        self.hold_status(was_running);
        self.sync_scheduler();
        info!(
            cycle = self.runtime.cycle_index,
            step = self.runtime.step_index,
            "stepped back"
        );
        self.persist_runtime();
    }

    /// Replace the config wholesale (editor save). Rejected configs change
    /// nothing.
    pub fn apply_config(&mut self, config: SequenceConfig) -> Result<(), TimerError> {
        config.validate()?;
        self.config = config;
        self.reset_runtime();
        info!(name = %self.config.display_name(), steps = self.config.steps.len(), "sequence config applied");
        self.persistence.save_config(&self.config);
        self.persist_runtime();
        Ok(())
    }

    pub fn apply_template(&mut self, name: &str) -> Result<(), TimerError> {
        let template = get_template(name).ok_or_else(|| TimerError::UnknownTemplate {
            name: name.to_string(),
            available: TEMPLATE_NAMES.join(", "),
        })?;
        self.apply_config(template)
    }

    fn catch_up(&mut self) -> Reconciled {
        let now = self.clock.now();
        let outcome = reconcile(&self.config, &mut self.runtime, now);
        if outcome.crossed_boundary() {
            self.sound.play(SoundKind::End);
        }
        self.sync_scheduler();
        if outcome.crossed_boundary() {
            self.persist_runtime();
        }
        outcome
    }

    fn run_now(&mut self) {
        let now = self.clock.now();
        self.runtime.run_from(now);
        self.scheduler.start();
        self.observe_remaining();
    }

    /// Keep counting if the runtime was counting before, otherwise wait paused.
    fn hold_status(&mut self, was_running: bool) {
        if was_running {
            let now = self.clock.now();
            self.runtime.run_from(now);
        } else {
            self.runtime.freeze();
        }
    }

    fn reset_runtime(&mut self) {
        self.runtime = SequenceRuntime::new(&self.config);
        self.scheduler.stop();
        sound::apply(self.sound.as_ref(), self.remind.silence());
    }

    fn sync_scheduler(&mut self) {
        if self.runtime.is_running {
            self.observe_remaining();
        } else {
            self.scheduler.stop();
            sound::apply(self.sound.as_ref(), self.remind.silence());
        }
    }

    fn observe_remaining(&mut self) {
        let event = self.remind.observe(self.runtime.remaining_sec);
        sound::apply(self.sound.as_ref(), event);
    }

    fn persist_runtime(&self) {
        debug_assert!(self.runtime.satisfies_invariants(&self.config));
        self.persistence.save_runtime(&self.runtime);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::ManualClock;
    use crate::engine::scheduler::IntervalScheduler;
    use crate::persistence::{MemoryStore, StateKey};
    use crate::sequence::{Step, StepType};
    use crate::sound::{RecordingSound, SoundEvent};
    use chrono::{TimeZone, Utc};

    struct Harness {
        clock: ManualClock,
        sound: RecordingSound,
        store: MemoryStore,
        controller: Controller,
    }

    fn config(steps: &[u32], cycles: u32, next: bool, next_cycle: bool) -> SequenceConfig {
        SequenceConfig {
            name: "Drill".into(),
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

    fn harness(config: SequenceConfig) -> Harness {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 2, 2, 7, 0, 0).unwrap());
        let sound = RecordingSound::new();
        let store = MemoryStore::new();
        let controller = Controller::with_config(
            config,
            Arc::new(Persistence::new(store.clone())),
            Arc::new(clock.clone()),
            Arc::new(sound.clone()),
            Box::new(IntervalScheduler::default()),
        );
        Harness {
            clock,
            sound,
            store,
            controller,
        }
    }

    fn rehydrate(h: &Harness) -> Controller {
        Controller::hydrate(
            Arc::new(Persistence::new(h.store.clone())),
            Arc::new(h.clock.clone()),
            Arc::new(h.sound.clone()),
            Box::new(IntervalScheduler::default()),
        )
    }

    #[test]
    fn test_start_runs_and_schedules() {
        let mut h = harness(config(&[30, 30], 1, true, true));
        h.controller.start().unwrap();
        assert_eq!(h.controller.status(), PlaybackStatus::Running);
        assert!(h.controller.is_scheduled());
        assert_eq!(h.controller.runtime().last_tick, Some(h.clock.now()));
        assert!(h.store.get(StateKey::SequenceRuntime).is_some());
    }

    #[test]
    fn test_start_rejects_invalid_config_without_change() {
        let mut bad = config(&[30], 1, true, true);
        bad.steps[0].duration_sec = 0;
        let mut h = harness(bad);
        let before = h.controller.runtime().clone();
        let err = h.controller.start().unwrap_err();
        assert!(matches!(err, TimerError::InvalidConfig(_)));
        assert_eq!(h.controller.runtime(), &before);
        assert!(!h.controller.is_scheduled());
        assert!(h.store.get(StateKey::SequenceRuntime).is_none());
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut h = harness(config(&[30, 30], 1, true, true));
        h.controller.start().unwrap();
        h.clock.advance_secs(4.0);
        h.controller.start().unwrap();
        assert!((h.controller.runtime().remaining_sec - 26.0).abs() < 1e-9);
    }

    #[test]
    fn test_pause_and_resume_preserve_remaining() {
        let mut h = harness(config(&[30, 30], 1, true, true));
        h.controller.start().unwrap();
        h.clock.advance_secs(10.0);
        h.controller.pause();
        assert_eq!(h.controller.status(), PlaybackStatus::Paused);
        assert!(!h.controller.is_scheduled());
        assert!(h.controller.runtime().last_tick.is_none());
        assert!((h.controller.runtime().remaining_sec - 20.0).abs() < 1e-9);

        h.clock.advance_secs(300.0);
        h.controller.resume();
        assert_eq!(h.controller.status(), PlaybackStatus::Running);
        assert!((h.controller.runtime().remaining_sec - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_pause_when_idle_is_noop() {
        let mut h = harness(config(&[30], 1, true, true));
        h.controller.pause();
        assert_eq!(h.controller.status(), PlaybackStatus::Idle);
    }

    #[test]
    fn test_tick_crosses_boundary_with_end_cue() {
        let mut h = harness(config(&[30, 20], 1, true, true));
        h.controller.start().unwrap();
        h.clock.advance_secs(30.2);
        let out = h.controller.tick();
        assert_eq!(out.crossings, 1);
        assert_eq!(h.controller.runtime().step_index, 1);
        assert!((h.controller.runtime().remaining_sec - 19.8).abs() < 1e-9);
        assert_eq!(h.sound.count(SoundEvent::Play(SoundKind::End)), 1);
    }

    #[test]
    fn test_delayed_tick_replays_like_reconciliation() {
        let mut h = harness(config(&[30, 30, 30], 1, true, true));
        h.controller.start().unwrap();
        h.clock.advance_secs(75.0);
        let out = h.controller.tick();
        assert_eq!(out.crossings, 2);
        assert_eq!(h.controller.runtime().step_index, 2);
        assert!((h.controller.runtime().remaining_sec - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_tick_freeze_stops_scheduler() {
        let mut h = harness(config(&[30, 30], 1, false, true));
        h.controller.start().unwrap();
        h.clock.advance_secs(31.0);
        h.controller.tick();
        assert_eq!(h.controller.status(), PlaybackStatus::Paused);
        assert!(!h.controller.is_scheduled());
        assert_eq!(h.controller.runtime().remaining_sec, 30.0);
    }

    #[test]
    fn test_noop_command_persists_crossed_boundary() {
        let mut h = harness(config(&[30, 30], 1, false, true));
        h.controller.start().unwrap();
        h.clock.advance_secs(31.0);
        h.controller.pause();
        assert_eq!(h.controller.status(), PlaybackStatus::Paused);

        let raw = h.store.get(StateKey::SequenceRuntime).unwrap();
        let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored["step_index"], 1);
        assert_eq!(stored["is_paused"], true);
        assert_eq!(stored["is_running"], false);
    }

    #[test]
    fn test_tick_to_completion_then_start_restarts() {
        let mut h = harness(config(&[5, 5], 2, true, true));
        h.controller.start().unwrap();
        h.clock.advance_secs(25.0);
        h.controller.tick();
        assert_eq!(h.controller.status(), PlaybackStatus::Completed);
        assert!(!h.controller.is_scheduled());

        h.controller.start().unwrap();
        let runtime = h.controller.runtime();
        assert_eq!(h.controller.status(), PlaybackStatus::Running);
        assert_eq!((runtime.cycle_index, runtime.step_index), (0, 0));
        assert_eq!(runtime.remaining_sec, 5.0);
    }

    #[test]
    fn test_resume_from_completed_resets_first() {
        let mut h = harness(config(&[5], 1, true, true));
        h.controller.start().unwrap();
        h.clock.advance_secs(6.0);
        h.controller.tick();
        h.controller.resume();
        assert_eq!(h.controller.status(), PlaybackStatus::Running);
        assert_eq!(h.controller.runtime().remaining_sec, 5.0);
    }

    #[test]
    fn test_reset_returns_to_idle_origin() {
        let mut h = harness(config(&[30, 30], 2, true, true));
        h.controller.start().unwrap();
        h.controller.skip();
        h.controller.skip();
        h.controller.reset();
        let runtime = h.controller.runtime();
        assert_eq!(h.controller.status(), PlaybackStatus::Idle);
        assert!(runtime.is_at_origin());
        assert_eq!(runtime.remaining_sec, 30.0);
        assert!(!h.controller.is_scheduled());
    }

    #[test]
    fn test_skip_ignores_auto_advance_flags_and_keeps_running() {
        let mut h = harness(config(&[30, 30], 2, false, false));
        h.controller.start().unwrap();
        h.controller.skip();
        assert_eq!(h.controller.runtime().step_index, 1);
        assert_eq!(h.controller.status(), PlaybackStatus::Running);
        h.controller.skip();
        assert_eq!(
            (h.controller.runtime().cycle_index, h.controller.runtime().step_index),
            (1, 0)
        );
        assert_eq!(h.controller.status(), PlaybackStatus::Running);
        assert!(h.controller.is_scheduled());
    }

    #[test]
    fn test_skip_while_paused_stays_paused() {
        let mut h = harness(config(&[30, 30], 1, true, true));
        h.controller.start().unwrap();
        h.controller.pause();
        h.controller.skip();
        assert_eq!(h.controller.runtime().step_index, 1);
        assert_eq!(h.controller.status(), PlaybackStatus::Paused);
        assert!(!h.controller.is_scheduled());
    }

    #[test]
    fn test_skip_into_terminal_completes() {
        let mut h = harness(config(&[30], 1, true, true));
        h.controller.start().unwrap();
        h.controller.skip();
        assert_eq!(h.controller.status(), PlaybackStatus::Completed);
        assert!(!h.controller.is_scheduled());
        let before = h.controller.runtime().clone();
        h.controller.skip();
        assert_eq!(h.controller.runtime(), &before);
    }

    #[test]
    fn test_back_at_origin_is_noop() {
        let mut h = harness(config(&[30, 30], 1, true, true));
        h.controller.back();
        assert_eq!(h.controller.status(), PlaybackStatus::Idle);
        assert!(h.store.get(StateKey::SequenceRuntime).is_none());
    }

    #[test]
    fn test_back_across_cycle_preserves_running() {
        let mut h = harness(config(&[30, 20], 2, true, true));
        h.controller.start().unwrap();
        h.controller.skip();
        h.controller.skip();
        h.controller.back();
        let runtime = h.controller.runtime();
        assert_eq!((runtime.cycle_index, runtime.step_index), (0, 1));
        assert_eq!(runtime.remaining_sec, 20.0);
        assert_eq!(h.controller.status(), PlaybackStatus::Running);
    }

    #[test]
    fn test_back_from_completed_pauses_on_last_step() {
        let mut h = harness(config(&[30, 20], 1, true, true));
        h.controller.start().unwrap();
        h.controller.skip();
        h.controller.skip();
        assert_eq!(h.controller.status(), PlaybackStatus::Completed);
        h.controller.back();
        assert_eq!(h.controller.runtime().step_index, 0);
        assert_eq!(h.controller.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn test_apply_config_rejects_and_keeps_previous() {
        let mut h = harness(config(&[30], 1, true, true));
        let bad = SequenceConfig {
            steps: Vec::new(),
            ..SequenceConfig::default()
        };
        assert!(h.controller.apply_config(bad).is_err());
        assert_eq!(h.controller.config().steps.len(), 1);
        assert!(h.store.get(StateKey::SequenceConfig).is_none());
    }

    #[test]
    fn test_apply_template_resets_and_persists() {
        let mut h = harness(config(&[30], 1, true, true));
        h.controller.start().unwrap();
        h.controller.apply_template("pomodoro").unwrap();
        assert_eq!(h.controller.config().name, "Pomodoro");
        assert_eq!(h.controller.status(), PlaybackStatus::Idle);
        assert_eq!(h.controller.runtime().remaining_sec, 1500.0);
        assert!(!h.controller.is_scheduled());
        assert!(h.store.get(StateKey::SequenceConfig).is_some());

        let err = h.controller.apply_template("tea").unwrap_err();
        assert!(matches!(err, TimerError::UnknownTemplate { .. }));
    }

    #[test]
    fn test_hydrate_reconciles_gap_since_last_write() {
        let mut h = harness(config(&[30, 30, 30], 1, true, true));
        h.controller.apply_config(config(&[30, 30, 30], 1, true, true)).unwrap();
        h.controller.start().unwrap();

        h.clock.advance_secs(45.0);
        let restored = rehydrate(&h);
        assert_eq!(restored.runtime().step_index, 1);
        assert!((restored.runtime().remaining_sec - 15.0).abs() < 1e-9);
        assert!(restored.is_scheduled());
    }

    #[test]
    fn test_hydrate_immediately_reproduces_runtime() {
        let mut h = harness(config(&[30, 30], 2, true, false));
        h.controller.apply_config(config(&[30, 30], 2, true, false)).unwrap();
        h.controller.start().unwrap();
        h.clock.advance_secs(12.0);
        h.controller.tick();

        let restored = rehydrate(&h);
        assert_eq!(restored.config(), h.controller.config());
        assert_eq!(restored.runtime(), h.controller.runtime());
    }

    #[test]
    fn test_hydrate_freezes_on_disabled_boundary() {
        let mut h = harness(config(&[30, 30, 30], 1, false, true));
        h.controller.apply_config(config(&[30, 30, 30], 1, false, true)).unwrap();
        h.controller.start().unwrap();
        h.clock.advance_secs(3600.0);

        let restored = rehydrate(&h);
        let runtime = restored.runtime();
        assert_eq!(restored.status(), PlaybackStatus::Paused);
        assert_eq!(runtime.step_index, 1);
        assert_eq!(runtime.remaining_sec, 30.0);
        assert!(!restored.is_scheduled());
    }

    #[test]
    fn test_storage_failures_do_not_affect_commands() {
        let mut h = harness(config(&[30, 30], 1, true, true));
        h.store.set_fail_writes(true);
        h.controller.start().unwrap();
        h.controller.skip();
        assert_eq!(h.controller.runtime().step_index, 1);
        assert_eq!(h.controller.status(), PlaybackStatus::Running);
    }

    #[test]
    fn test_remind_cue_during_long_step() {
        let mut h = harness(config(&[90], 1, true, true));
        h.controller.start().unwrap();
        h.clock.advance_secs(31.0);
        h.controller.tick();
        assert_eq!(h.sound.count(SoundEvent::Play(SoundKind::Remind)), 1);
        h.clock.advance_secs(5.0);
        h.controller.tick();
        assert_eq!(h.sound.count(SoundEvent::Stop(SoundKind::Remind)), 1);
        h.clock.advance_secs(1.0);
        h.controller.tick();
        assert_eq!(h.sound.count(SoundEvent::Play(SoundKind::Remind)), 1);
    }
}
