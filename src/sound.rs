//! Sound cues.
//!
//! The engine only names events; a [`SoundPlayer`] decides what they sound
//! like. Playback is fire-and-forget: players swallow their own failures.

use console::Term;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKind {
    /// Low-remaining warning
    Remind,
    /// A step, cycle, or timer finished
    End,
}

pub trait SoundPlayer: Send + Sync {
    fn play(&self, kind: SoundKind);
    fn stop(&self, kind: SoundKind);
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Clone, Default)]
pub struct TerminalBell;

impl SoundPlayer for TerminalBell {
    fn play(&self, kind: SoundKind) {
        debug!(?kind, "bell");
        let rings = match kind {
            SoundKind::Remind => "\x07",
            SoundKind::End => "\x07\x07",
        };
        let _ = Term::stderr().write_str(rings);
    }

    fn stop(&self, _kind: SoundKind) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Muted;

impl SoundPlayer for Muted {
    fn play(&self, _kind: SoundKind) {}
    fn stop(&self, _kind: SoundKind) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    Play(SoundKind),
    Stop(SoundKind),
}

/// Records every cue in order. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSound {
    events: Arc<Mutex<Vec<SoundEvent>>>,
}

impl RecordingSound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SoundEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn count(&self, event: SoundEvent) -> usize {
        self.events().iter().filter(|e| **e == event).count()
    }

    fn record(&self, event: SoundEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

impl SoundPlayer for RecordingSound {
    fn play(&self, kind: SoundKind) {
        self.record(SoundEvent::Play(kind));
    }

    fn stop(&self, kind: SoundKind) {
        self.record(SoundEvent::Stop(kind));
    }
}

/// Default remaining-seconds mark at which the remind cue plays.
pub const DEFAULT_REMIND_THRESHOLD_SEC: u32 = 60;
/// Default remaining-seconds mark at which a playing remind cue is cut off.
pub const DEFAULT_REMIND_STOP_SEC: u32 = 55;

/// Tracks the low-remaining warning for one countdown.
///
/// The cue arms once remaining time is seen above the threshold, plays when it
/// first drops to the threshold or below, and is cut off at the stop mark. If
/// remaining time rises back above the threshold (new step, adjustment) any
/// playing cue is stopped and the cue re-arms.
#[derive(Debug, Clone)]
pub struct RemindCue {
    threshold: f64,
    stop_at: f64,
    armed: bool,
    playing: bool,
}

impl RemindCue {
    pub fn new(threshold_sec: u32, stop_sec: u32) -> Self {
        Self {
            threshold: f64::from(threshold_sec),
            stop_at: f64::from(stop_sec),
            armed: false,
            playing: false,
        }
    }

    /// Feed the current remaining time; returns the cue change to apply, if any.
    pub fn observe(&mut self, remaining: f64) -> Option<SoundEvent> {
        if remaining > self.threshold {
            self.armed = true;
            return self.silence();
        }
        if self.armed {
            self.armed = false;
            if remaining > self.stop_at {
                self.playing = true;
                return Some(SoundEvent::Play(SoundKind::Remind));
            }
            return None;
        }
        if self.playing && remaining <= self.stop_at {
            return self.silence();
        }
        None
    }

    /// Disarm and stop any playing cue (reset, pause, completion).
    pub fn silence(&mut self) -> Option<SoundEvent> {
        if self.playing {
            self.playing = false;
            Some(SoundEvent::Stop(SoundKind::Remind))
        } else {
            None
        }
    }
}

impl Default for RemindCue {
    fn default() -> Self {
        Self::new(DEFAULT_REMIND_THRESHOLD_SEC, DEFAULT_REMIND_STOP_SEC)
    }
}

/// Forward a cue change to a player.
pub fn apply(player: &dyn SoundPlayer, event: Option<SoundEvent>) {
    match event {
        Some(SoundEvent::Play(kind)) => player.play(kind),
        Some(SoundEvent::Stop(kind)) => player.stop(kind),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remind_plays_once_when_crossing_threshold() {
        let mut cue = RemindCue::default();
        assert_eq!(cue.observe(75.0), None);
        assert_eq!(cue.observe(60.0), Some(SoundEvent::Play(SoundKind::Remind)));
        assert_eq!(cue.observe(58.0), None);
        assert_eq!(cue.observe(55.0), Some(SoundEvent::Stop(SoundKind::Remind)));
        assert_eq!(cue.observe(40.0), None);
    }

    #[test]
    fn test_remind_rearms_when_time_rises() {
        let mut cue = RemindCue::default();
        cue.observe(90.0);
        cue.observe(59.0);
        assert_eq!(cue.observe(120.0), Some(SoundEvent::Stop(SoundKind::Remind)));
        assert_eq!(cue.observe(59.5), Some(SoundEvent::Play(SoundKind::Remind)));
    }

    #[test]
    fn test_short_countdown_never_reminds() {
        let mut cue = RemindCue::default();
        assert_eq!(cue.observe(30.0), None);
        assert_eq!(cue.observe(10.0), None);
    }

    #[test]
    fn test_jump_past_window_does_not_play() {
        let mut cue = RemindCue::default();
        cue.observe(100.0);
        assert_eq!(cue.observe(20.0), None);
    }

    #[test]
    fn test_recording_sound_and_apply() {
        let player = RecordingSound::new();
        apply(&player, Some(SoundEvent::Play(SoundKind::End)));
        apply(&player, None);
        apply(&player, Some(SoundEvent::Stop(SoundKind::Remind)));
        assert_eq!(
            player.events(),
            vec![
                SoundEvent::Play(SoundKind::End),
                SoundEvent::Stop(SoundKind::Remind)
            ]
        );
        assert_eq!(player.count(SoundEvent::Play(SoundKind::End)), 1);
    }
}
