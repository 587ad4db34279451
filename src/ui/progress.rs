use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::engine::{PlaybackStatus, Snapshot};
use crate::single::SingleTimer;
use crate::ui::icons::{BELL, CHECK, CLOCK, CROSS, CYCLE};
use crate::ui::view::{format_time, status_label};

/// Terminal UI for foreground runs, rendered via `indicatif`.
///
/// Two bars are stacked vertically:
/// - Step bar: elapsed time within the current step, remaining time as message
/// - Sequence bar: steps played out of cycles × steps (hidden for single timers)
pub struct TimerUI {
    multi: MultiProgress,
    step_bar: ProgressBar,
    sequence_bar: Option<ProgressBar>,
}

impl TimerUI {
    /// UI for a sequence with `total_steps` steps across all cycles.
    pub fn for_sequence(total_steps: u64) -> Self {
        let mut ui = Self::new();
        let sequence_style = ProgressStyle::default_bar()
            .template("{prefix:.bold.dim} [{bar:30.green/white}] {pos}/{len} {msg}")
            .expect("progress bar template is a valid static string")
            .progress_chars("█▓▒░");
        let bar = ui.multi.add(ProgressBar::new(total_steps));
        bar.set_style(sequence_style);
        bar.set_prefix(" Total");
        ui.sequence_bar = Some(bar);
        ui
    }

    pub fn for_single() -> Self {
        Self::new()
    }

    fn new() -> Self {
        let multi = MultiProgress::new();
        let step_style = ProgressStyle::default_bar()
            .template("{prefix:.bold.dim} [{bar:30.cyan/blue}] {msg}")
            .expect("progress bar template is a valid static string")
            .progress_chars("█▓▒░");
        let step_bar = multi.add(ProgressBar::new(1));
        step_bar.set_style(step_style);
        step_bar.set_prefix("  Step");
        Self {
            multi,
            step_bar,
            sequence_bar: None,
        }
    }

    /// Print a line above the bars, or plainly to stdout when the bars are hidden.
    pub fn print_line(&self, msg: impl AsRef<str>) {
        // hidden bars (stderr not a terminal) swallow println
        if self.multi.is_hidden() {
            println!("{}", msg.as_ref());
        } else if self.multi.println(msg.as_ref()).is_err() {
            eprintln!("{}", msg.as_ref());
        }
    }

    pub fn update_sequence(&self, snapshot: &Snapshot<'_>) {
        let config = snapshot.config;
        let runtime = snapshot.runtime;
        let duration = config.step_duration(runtime.step_index);
        let label = config
            .steps
            .get(runtime.step_index)
            .map(|step| step.display_label(runtime.step_index))
            .unwrap_or_default();
        self.set_step(duration, runtime.remaining_sec, &label, snapshot.status);

        if let Some(bar) = &self.sequence_bar {
            let played = if runtime.completed {
                config.total_steps()
            } else {
                (runtime.cycle_index * config.steps.len() + runtime.step_index) as u64
            };
            bar.set_position(played);
            bar.set_message(format!(
                "{}cycle {}/{}",
                CYCLE,
                (runtime.cycle_index + 1).min(config.cycles as usize),
                config.cycles
            ));
        }
    }

    pub fn update_single(&self, timer: &SingleTimer) {
        self.set_step(
            f64::from(timer.duration_sec()),
            timer.remaining_sec(),
            "Timer",
            timer.status(),
        );
    }

    fn set_step(&self, duration: f64, remaining: f64, label: &str, status: PlaybackStatus) {
        let total = duration.max(1.0).ceil() as u64;
        let elapsed = (duration - remaining).clamp(0.0, duration).floor() as u64;
        self.step_bar.set_length(total);
        self.step_bar.set_position(elapsed);
        self.step_bar.set_message(format!(
            "{}{} {} {}",
            CLOCK,
            style(format_time(remaining)).bold(),
            style(label).yellow(),
            status_label(status)
        ));
    }

    pub fn show_boundary(&self, crossings: u32) {
        if crossings > 0 {
            self.print_line(format!("{}{} step(s) finished", BELL, crossings));
        }
    }

    pub fn finish(&self, msg: &str) {
        self.step_bar.finish();
        if let Some(bar) = &self.sequence_bar {
            bar.finish();
        }
        self.print_line(format!("{}{}", CHECK, style(msg).green().bold()));
    }

    /// Leave the bars in place after an interrupt.
    pub fn interrupted(&self, msg: &str) {
        self.step_bar.abandon();
        if let Some(bar) = &self.sequence_bar {
            bar.abandon();
        }
        self.print_line(format!("{}{}", CROSS, style(msg).yellow()));
    }
}
