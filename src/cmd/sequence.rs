//! Sequence setup commands: `seqtimer template|load|mode`.

use anyhow::Result;
use console::style;
use std::path::Path;

use seqtimer::errors::TimerError;
use seqtimer::sequence::{SequenceConfig, TEMPLATE_NAMES, get_template};
use seqtimer::session::Mode;
use seqtimer::ui::format_time;
use seqtimer::ui::icons::{CHECK, CROSS};

use super::AppContext;
use super::control::print_sequence;

pub fn cmd_template(ctx: &AppContext, name: Option<&str>, list: bool) -> Result<()> {
    let name = match name {
        Some(name) if !list => name,
        _ => {
            print_templates();
            return Ok(());
        }
    };

    let mut session = ctx.open_session();
    session.controller_mut().apply_template(name)?;
    println!("{}Applied template {}", CHECK, style(name).cyan());
    println!();
    print_sequence(session.controller());
    Ok(())
}

fn print_templates() {
    println!("Available templates:");
    for name in TEMPLATE_NAMES {
        let Some(template) = get_template(name) else {
            continue;
        };
        let cycle: f64 = template.steps.iter().map(|s| s.duration()).sum();
        println!(
            "  {:<10} {} step(s) x {} cycle(s), {} per cycle",
            style(name).cyan(),
            template.steps.len(),
            template.cycles,
            format_time(cycle)
        );
    }
}

/// Submit a config file. A rejected config leaves the stored one untouched.
pub fn cmd_load(ctx: &AppContext, file: &Path) -> Result<()> {
    let config = SequenceConfig::from_file(file)?;

    let mut session = ctx.open_session();
    match session.controller_mut().apply_config(config) {
        Ok(()) => {
            println!("{}Loaded {}", CHECK, file.display());
            println!();
            print_sequence(session.controller());
            Ok(())
        }
        Err(TimerError::InvalidConfig(errors)) => {
            println!("{}Config rejected:", CROSS);
            for message in errors.messages() {
                println!("  - {}", message);
            }
            Err(TimerError::InvalidConfig(errors).into())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn cmd_mode(ctx: &AppContext, mode: Option<Mode>) -> Result<()> {
    let mut session = ctx.open_session();
    if let Some(mode) = mode {
        session.switch_mode(mode);
    }
    println!("Mode: {}", style(session.mode()).bold());
    Ok(())
}
