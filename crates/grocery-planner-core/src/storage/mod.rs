mod config;
pub mod database;
pub mod migrations;

pub use config::{CalendarConfig, Config, LoggingConfig, StoresConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the data directory, creating it if needed.
///
/// `GROCERY_PLANNER_DATA_DIR` wins when set. Otherwise this is
/// `~/.config/grocery-planner[-dev]/`, with the `-dev` suffix selected by
/// `GROCERY_PLANNER_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("GROCERY_PLANNER_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .ok_or_else(|| ConfigError::DataDir("home directory not found".into()))?
                .join(".config");

            let env = std::env::var("GROCERY_PLANNER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("grocery-planner-dev")
            } else {
                base_dir.join("grocery-planner")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
