//! Shopping preference commands.

use clap::Subcommand;
use grocery_planner_core::{PreferredWindow, UserPreferences, Weekday};

use super::{open_planner, print_json, CliResult};

#[derive(Subcommand, Debug)]
pub enum PrefsAction {
    /// Create or replace a user's preferences
    Set {
        /// User ID
        user: String,
        /// Home address used for store lookup
        #[arg(long)]
        address: String,
        /// Minutes needed per shopping trip
        #[arg(long, default_value = "60", allow_hyphen_values = true)]
        duration: i64,
        /// Preferred store ID (repeatable)
        #[arg(long = "store")]
        stores: Vec<String>,
        /// Window as DAYS@HH:MM-HH:MM, e.g. "sat,sun@09:00-11:00" (repeatable)
        #[arg(long = "window", value_parser = parse_window)]
        windows: Vec<PreferredWindow>,
    },
    /// Show a user's preferences
    Show {
        /// User ID
        user: String,
    },
}

/// Parse `DAYS@START-END` into a window. Times are checked on save.
pub fn parse_window(input: &str) -> Result<PreferredWindow, String> {
    let (days, hours) = input
        .split_once('@')
        .ok_or_else(|| format!("expected DAYS@HH:MM-HH:MM, got '{input}'"))?;
    let (start, end) = hours
        .split_once('-')
        .ok_or_else(|| format!("expected HH:MM-HH:MM, got '{hours}'"))?;
    let days = days
        .split(',')
        .map(|day| day.parse::<Weekday>().map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PreferredWindow::new(start.trim(), end.trim(), days))
}

pub fn run(action: PrefsAction) -> CliResult {
    let planner = open_planner()?;

    match action {
        PrefsAction::Set {
            user,
            address,
            duration,
            stores,
            windows,
        } => {
            let mut prefs = UserPreferences::new(user, address).with_duration(duration);
            prefs.preferred_stores = stores;
            prefs.preferred_hours = windows;
            let saved = planner.save_preferences(prefs)?;
            print_json(&saved)?;
        }
        PrefsAction::Show { user } => {
            print_json(&planner.preferences(&user)?)?;
        }
    }
    Ok(())
}
