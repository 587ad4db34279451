//! Settings view and validation commands: `seqtimer config`.

use anyhow::Result;

use seqtimer::settings::Settings;

use super::super::ConfigCommands;
use super::Paths;

pub fn cmd_config(paths: &Paths, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = &paths.settings_file;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Seqtimer Settings");
            println!("=================");
            println!();
            println!("State dir: {}", paths.state_dir.display());

            let mut settings = if config_path.exists() {
                println!("Settings file: {}", config_path.display());
                Settings::load(config_path)?
            } else {
                println!("No settings file at {} (using defaults)", config_path.display());
                Settings::default()
            };
            println!();
            print_settings(&settings);

            settings.apply_env();
            println!("Effective values (with env overrides):");
            println!("  tick_interval_ms = {}", settings.timer.tick_interval_ms);
            println!("  sound.enabled = {}", settings.sound.enabled);
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating settings...");
            println!();

            if !config_path.exists() {
                println!("No settings file found. Using defaults (valid).");
                return Ok(());
            }

            let settings = Settings::load(config_path)?;
            match settings.validate() {
                Ok(()) => println!("Settings are valid."),
                Err(e) => {
                    println!("Settings problem:");
                    println!("  - {}", e);
                    return Err(e.into());
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("Settings already exist at {}", config_path.display());
                println!("Delete the file first if you want to recreate it.");
                return Ok(());
            }

            Settings::default().save(config_path)?;
            println!("Created {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [timer] tick_interval_ms");
            println!("  - [sound] enabled, remind_threshold_sec, remind_stop_sec");
            println!();
        }
    }

    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("[timer]");
    println!("  tick_interval_ms = {}", settings.timer.tick_interval_ms);
    println!();
    println!("[sound]");
    println!("  enabled = {}", settings.sound.enabled);
    println!("  remind_threshold_sec = {}", settings.sound.remind_threshold_sec);
    println!("  remind_stop_sec = {}", settings.sound.remind_stop_sec);
    println!();
}
