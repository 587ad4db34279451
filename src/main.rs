use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use seqtimer::session::Mode;

mod cmd;

#[derive(Parser)]
#[command(name = "seqtimer")]
#[command(version, about = "Countdown timer for single durations and multi-step sequences")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding persisted timer state (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Path to seqtimer.toml. Defaults to <state-dir>/seqtimer.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current mode and sequence progress
    Status,
    /// Start the sequence (restarts a completed one)
    Start,
    /// Pause the running sequence
    Pause,
    /// Resume a paused sequence
    Resume,
    /// Return the sequence to its first step
    Reset,
    /// Jump to the next step
    Skip,
    /// Go back to the previous step
    Back,
    /// Start the sequence if needed and follow it in the foreground
    Run,
    /// Apply a built-in sequence template
    Template {
        /// Template name (pomodoro, cooking)
        name: Option<String>,
        /// List available templates
        #[arg(long)]
        list: bool,
    },
    /// Replace the sequence config with a JSON or TOML file
    Load { file: PathBuf },
    /// Show or switch the active mode
    Mode { mode: Option<Mode> },
    /// Run a single countdown in the foreground
    Single {
        /// Duration: 90, 1:30, 5m, 45s, 1h30m
        duration: String,
    },
    /// View or validate settings
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current settings
    Show,
    /// Validate settings and report any problems
    Validate,
    /// Write a default seqtimer.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = seqtimer::logging::init(cli.verbose);

    // settings commands must work even when seqtimer.toml is invalid
    if let Commands::Config { command } = &cli.command {
        return cmd::cmd_config(&cmd::Paths::resolve(&cli), command.clone());
    }

    let ctx = cmd::AppContext::new(&cli)?;
    match &cli.command {
        Commands::Status => cmd::cmd_status(&ctx)?,
        Commands::Start => cmd::cmd_control(&ctx, cmd::Control::Start)?,
        Commands::Pause => cmd::cmd_control(&ctx, cmd::Control::Pause)?,
        Commands::Resume => cmd::cmd_control(&ctx, cmd::Control::Resume)?,
        Commands::Reset => cmd::cmd_control(&ctx, cmd::Control::Reset)?,
        Commands::Skip => cmd::cmd_control(&ctx, cmd::Control::Skip)?,
        Commands::Back => cmd::cmd_control(&ctx, cmd::Control::Back)?,
        Commands::Run => cmd::run_sequence(&ctx).await?,
        Commands::Template { name, list } => cmd::cmd_template(&ctx, name.as_deref(), *list)?,
        Commands::Load { file } => cmd::cmd_load(&ctx, file)?,
        Commands::Mode { mode } => cmd::cmd_mode(&ctx, *mode)?,
        Commands::Single { duration } => cmd::run_single(&ctx, duration).await?,
        Commands::Config { .. } => {}
    }

    Ok(())
}
