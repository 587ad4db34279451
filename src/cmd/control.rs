//! Sequence status and playback commands: `seqtimer status|start|pause|...`.

use anyhow::Result;
use console::style;

use seqtimer::engine::Controller;
use seqtimer::session::Mode;
use seqtimer::ui::{render_overview, render_sequence};

use super::AppContext;

/// One-shot playback commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Start,
    Pause,
    Resume,
    Reset,
    Skip,
    Back,
}

pub fn cmd_status(ctx: &AppContext) -> Result<()> {
    let session = ctx.open_session();
    println!("Mode: {}", style(session.mode()).bold());
    if session.mode() == Mode::Single {
        println!(
            "{}",
            style("Single timers run in the foreground: seqtimer single <DURATION>").dim()
        );
    }
    println!();
    print_sequence(session.controller());
    Ok(())
}

pub fn cmd_control(ctx: &AppContext, control: Control) -> Result<()> {
    let mut session = ctx.open_session();
    if control == Control::Start {
        session.switch_mode(Mode::Sequence);
    }

    let controller = session.controller_mut();
    match control {
        Control::Start => controller.start()?,
        Control::Pause => controller.pause(),
        Control::Resume => controller.resume(),
        Control::Reset => controller.reset(),
        Control::Skip => controller.skip(),
        Control::Back => controller.back(),
    }

    print_sequence(session.controller());
    Ok(())
}

pub(crate) fn print_sequence(controller: &Controller) {
    let snapshot = controller.snapshot();
    print!("{}", render_sequence(&snapshot));
    println!();
    print!("{}", render_overview(&snapshot));
}
