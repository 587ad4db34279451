//! Foreground tick loops: `seqtimer run` and `seqtimer single`.
//!
//! Both loops wake on a tokio interval and fold elapsed wall-clock time into
//! the timer, so a stalled process (suspend, heavy load) catches up on the
//! next wake-up instead of drifting. Ctrl-C ends the loop.

use anyhow::Result;
use chrono::Utc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info};

use seqtimer::engine::PlaybackStatus;
use seqtimer::session::Mode;
use seqtimer::single::SingleTimer;
use seqtimer::sound::{self, SoundKind};
use seqtimer::ui::{TimerUI, parse_duration, render_single};

use super::AppContext;

fn ticker(period: std::time::Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Start the sequence unless it is already running, then follow it until it
/// completes, freezes on a disabled auto-advance, or the user interrupts.
pub async fn run_sequence(ctx: &AppContext) -> Result<()> {
    let mut session = ctx.open_session();
    session.switch_mode(Mode::Sequence);
    let controller = session.controller_mut();
    if controller.status() != PlaybackStatus::Running {
        controller.start()?;
    }

    let ui = TimerUI::for_sequence(controller.config().total_steps());
    ui.print_line(format!("Running {}", controller.config().display_name()));
    ui.update_sequence(&controller.snapshot());

    let mut interval = ticker(controller.tick_interval());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let outcome = controller.tick();
                ui.show_boundary(outcome.crossings);
                ui.update_sequence(&controller.snapshot());
                if !controller.is_scheduled() {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                // state is already persisted; the sequence keeps counting by wall clock
                info!("detached from running sequence");
                ui.interrupted("Detached. The sequence keeps running; use `seqtimer pause` to stop it.");
                return Ok(());
            }
        }
    }

    match controller.status() {
        PlaybackStatus::Completed => ui.finish("Sequence complete"),
        PlaybackStatus::Paused => {
            ui.finish("Waiting at step boundary. Use `seqtimer resume` to continue.")
        }
        status => debug!(%status, "tick loop ended"),
    }
    Ok(())
}

/// Count down one duration in the foreground.
pub async fn run_single(ctx: &AppContext, duration: &str) -> Result<()> {
    let secs = parse_duration(duration)?;

    let mut session = ctx.open_session();
    session.switch_mode(Mode::Single);

    let player = ctx.sound_player();
    let mut timer = SingleTimer::new(secs).with_remind(ctx.settings.remind_cue());
    sound::apply(player.as_ref(), timer.start(Utc::now()));
    info!(duration = secs, "single timer started");

    let ui = TimerUI::for_single();
    ui.print_line(render_single(&timer).trim_end());
    ui.update_single(&timer);

    let mut interval = ticker(ctx.settings.tick_interval());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let tick = timer.tick(Utc::now());
                sound::apply(player.as_ref(), tick.cue);
                ui.update_single(&timer);
                if tick.finished {
                    player.play(SoundKind::End);
                    ui.finish("Time's up");
                    return Ok(());
                }
            }
            _ = &mut ctrl_c => {
                sound::apply(player.as_ref(), timer.reset());
                ui.interrupted("Cancelled");
                return Ok(());
            }
        }
    }
}
