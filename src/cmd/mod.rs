//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled                                       |
//! |------------|--------------------------------------------------------|
//! | `control`  | `Status`, `Start`, `Pause`, `Resume`, `Reset`, `Skip`, `Back` |
//! | `run`      | `Run`, `Single`                                        |
//! | `sequence` | `Template`, `Load`, `Mode`                             |
//! | `config`   | `Config`                                               |

pub mod config;
pub mod control;
pub mod run;
pub mod sequence;

pub use config::cmd_config;
pub use control::{Control, cmd_control, cmd_status};
pub use run::{run_sequence, run_single};
pub use sequence::{cmd_load, cmd_mode, cmd_template};

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use seqtimer::engine::{IntervalScheduler, SystemClock};
use seqtimer::persistence::{FileStore, Persistence};
use seqtimer::session::Session;
use seqtimer::settings::{SETTINGS_FILE, Settings, resolve_state_dir};
use seqtimer::sound::{Muted, SoundPlayer, TerminalBell};

use super::Cli;

/// Where state and settings live for this invocation.
#[derive(Debug, Clone)]
pub struct Paths {
    pub state_dir: PathBuf,
    pub settings_file: PathBuf,
}

impl Paths {
    pub fn resolve(cli: &Cli) -> Self {
        let state_dir = resolve_state_dir(cli.state_dir.as_deref());
        let settings_file = cli
            .config
            .clone()
            .unwrap_or_else(|| state_dir.join(SETTINGS_FILE));
        Self {
            state_dir,
            settings_file,
        }
    }
}

/// Resolved paths plus validated settings.
pub struct AppContext {
    pub paths: Paths,
    pub settings: Settings,
}

impl AppContext {
    pub fn new(cli: &Cli) -> Result<Self> {
        let paths = Paths::resolve(cli);
        let mut settings = Settings::load_or_default(&paths.settings_file)?;
        settings.apply_env();
        settings
            .validate()
            .with_context(|| format!("Invalid settings in {}", paths.settings_file.display()))?;
        debug!(state_dir = %paths.state_dir.display(), ?settings, "context ready");
        Ok(Self { paths, settings })
    }

    pub fn sound_player(&self) -> Arc<dyn SoundPlayer> {
        if self.settings.sound.enabled {
            Arc::new(TerminalBell)
        } else {
            Arc::new(Muted)
        }
    }

    pub fn persistence(&self) -> Arc<Persistence> {
        Arc::new(Persistence::new(FileStore::new(&self.paths.state_dir)))
    }

    /// Hydrate the session from the state directory.
    pub fn open_session(&self) -> Session {
        Session::open(
            self.persistence(),
            Arc::new(SystemClock),
            self.sound_player(),
            Box::new(IntervalScheduler::new(self.settings.tick_interval())),
            self.settings.remind_cue(),
        )
    }
}
