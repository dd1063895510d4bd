pub mod calendar;
pub mod config;
pub mod list;
pub mod prefs;
pub mod schedule;
pub mod stores;

use grocery_planner_core::{Config, Database, SchedulePlanner};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Planner over the on-disk database and configured providers.
pub fn open_planner() -> Result<SchedulePlanner, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    Ok(SchedulePlanner::new(db, config.generator()))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
