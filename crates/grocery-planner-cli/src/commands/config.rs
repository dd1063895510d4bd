use clap::Subcommand;
use grocery_planner_core::{Config, ConfigError};

use super::{print_json, CliResult};

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "scheduler.max_suggestions", "stores.travel_minutes")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(ConfigError::UnknownKey(key).into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            print_json(&Config::load()?)?;
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
