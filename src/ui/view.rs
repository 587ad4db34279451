//! Text rendering of timer state.
//!
//! Pure functions from snapshots to strings; nothing here mutates state.

use anyhow::{Context, Result, bail};
use console::style;
use std::fmt::Write as _;

use crate::engine::{PlaybackStatus, Snapshot};
use crate::sequence::StepType;
use crate::single::SingleTimer;
use crate::ui::icons::{CHECK, CYCLE, FLAG, IDLE, PAUSED, REST, RUNNING, WORK};

/// `MM:SS`, or `HH:MM:SS` from one hour up. Fractions are floored and negative
/// values render as zero.
pub fn format_time(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Parse a user-entered duration: `90`, `1:30`, `1:02:03`, `5m`, `45s`, `1h30m`.
pub fn parse_duration(input: &str) -> Result<u32> {
    let input = input.trim();
    if input.is_empty() {
        bail!("Duration is empty");
    }

    let total: u64 = if input.contains(':') {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() > 3 {
            bail!("Invalid duration '{}': too many ':' separators", input);
        }
        parts.iter().try_fold(0u64, |acc, part| {
            let value: u64 = part
                .parse()
                .with_context(|| format!("Invalid duration '{}'", input))?;
            Ok::<u64, anyhow::Error>(acc * 60 + value)
        })?
    } else if input.chars().all(|c| c.is_ascii_digit()) {
        input
            .parse()
            .with_context(|| format!("Invalid duration '{}'", input))?
    } else {
        let mut total = 0u64;
        let mut digits = String::new();
        for c in input.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            let unit = match c.to_ascii_lowercase() {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => bail!("Invalid duration '{}': unknown unit '{}'", input, c),
            };
            if digits.is_empty() {
                bail!("Invalid duration '{}': unit '{}' without a number", input, c);
            }
            let value: u64 = digits
                .parse()
                .with_context(|| format!("Invalid duration '{}'", input))?;
            total += value * unit;
            digits.clear();
        }
        if !digits.is_empty() {
            bail!("Invalid duration '{}': trailing number without a unit", input);
        }
        total
    };

    if total == 0 {
        bail!("Duration must be at least one second");
    }
    u32::try_from(total).with_context(|| format!("Duration '{}' is too long", input))
}

pub fn status_label(status: PlaybackStatus) -> String {
    match status {
        PlaybackStatus::Idle => format!("{}{}", IDLE, style("Idle").dim()),
        PlaybackStatus::Running => format!("{}{}", RUNNING, style("Running").green()),
        PlaybackStatus::Paused => format!("{}{}", PAUSED, style("Paused").yellow()),
        PlaybackStatus::Completed => format!("{}{}", FLAG, style("Completed").cyan()),
    }
}

fn type_marker(step_type: StepType) -> String {
    match step_type {
        StepType::Work => WORK.to_string(),
        StepType::Rest => REST.to_string(),
        StepType::Generic => String::new(),
    }
}

/// Header, current position and remaining time for a sequence.
pub fn render_sequence(snapshot: &Snapshot<'_>) -> String {
    let config = snapshot.config;
    let runtime = snapshot.runtime;
    let mut out = String::new();

    let _ = writeln!(out, "{}", style(config.display_name()).bold());
    let _ = writeln!(out, "{}", status_label(snapshot.status));

    if let Some(step) = config.steps.get(runtime.step_index) {
        let _ = writeln!(
            out,
            "{}Cycle {}/{}  {}{}",
            CYCLE,
            runtime.cycle_index + 1,
            config.cycles,
            type_marker(step.step_type),
            style(step.display_label(runtime.step_index)).yellow()
        );
    }
    let _ = writeln!(
        out,
        "Remaining: {}",
        style(format_time(runtime.remaining_sec)).bold()
    );
    out
}

/// Numbered step list with the active step marked.
pub fn render_overview(snapshot: &Snapshot<'_>) -> String {
    let config = snapshot.config;
    let runtime = snapshot.runtime;
    let mut out = String::new();
    for (index, step) in config.steps.iter().enumerate() {
        let active = index == runtime.step_index && !runtime.completed;
        let marker = if active { ">" } else { " " };
        let line = format!(
            "{} {:>2}. {:<24} {}",
            marker,
            index + 1,
            step.display_label(index),
            format_time(step.duration())
        );
        if active {
            let _ = writeln!(out, "{}", style(line).cyan().bold());
        } else {
            let _ = writeln!(out, "{}", line);
        }
    }
    if runtime.completed {
        let _ = writeln!(out, "{}All {} cycles finished", CHECK, config.cycles);
    }
    out
}

pub fn render_single(timer: &SingleTimer) -> String {
    format!(
        "{}  {} / {}\n",
        status_label(timer.status()),
        style(format_time(timer.remaining_sec())).bold(),
        format_time(f64::from(timer.duration_sec()))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SequenceRuntime;
    use crate::sequence::{SequenceConfig, Step};

    fn snapshot_parts() -> (SequenceConfig, SequenceRuntime) {
        let config = SequenceConfig {
            name: "  ".into(),
            steps: vec![
                Step::new("Warm up", 90, StepType::Work),
                Step::new("", 30, StepType::Rest),
            ],
            cycles: 3,
            ..SequenceConfig::default()
        };
        let mut runtime = SequenceRuntime::new(&config);
        runtime.step_index = 1;
        runtime.cycle_index = 2;
        runtime.remaining_sec = 12.7;
        (config, runtime)
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.99), "00:59");
        assert_eq!(format_time(90.0), "01:30");
        assert_eq!(format_time(3599.0), "59:59");
        assert_eq!(format_time(3600.0), "01:00:00");
        assert_eq!(format_time(3723.5), "01:02:03");
        assert_eq!(format_time(-4.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
    }

    #[test]
    fn test_parse_duration_forms() {
        assert_eq!(parse_duration("90").unwrap(), 90);
        assert_eq!(parse_duration("1:30").unwrap(), 90);
        assert_eq!(parse_duration("1:02:03").unwrap(), 3723);
        assert_eq!(parse_duration("5m").unwrap(), 300);
        assert_eq!(parse_duration("45s").unwrap(), 45);
        assert_eq!(parse_duration("1h30m").unwrap(), 5400);
        assert_eq!(parse_duration(" 2M ").unwrap(), 120);
    }

    #[test]
    fn test_parse_duration_rejects() {
        for bad in ["", "0", "0:00", "abc", "5x", "m", "1:2:3:4", "10m5"] {
            assert!(parse_duration(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_render_sequence_uses_fallbacks() {
        let (config, runtime) = snapshot_parts();
        let snapshot = Snapshot {
            config: &config,
            runtime: &runtime,
            status: runtime.status(),
        };
        let out = render_sequence(&snapshot);
        assert!(out.contains("Untitled sequence"));
        assert!(out.contains("Cycle 3/3"));
        assert!(out.contains("Step 2"));
        assert!(out.contains("00:12"));
    }

    #[test]
    fn test_render_overview_marks_active_step() {
        let (config, runtime) = snapshot_parts();
        let snapshot = Snapshot {
            config: &config,
            runtime: &runtime,
            status: runtime.status(),
        };
        let out = render_overview(&snapshot);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("   1. Warm up"));
        assert!(lines[1].contains(">  2. Step 2"));
        assert!(lines[0].contains("01:30"));
    }

    #[test]
    fn test_render_single() {
        let timer = SingleTimer::new(300);
        let out = render_single(&timer);
        assert!(out.contains("05:00 / 05:00") || (out.contains("05:00") && out.contains("/ 05:00")));
        assert!(out.contains("Idle"));
    }
}
