//! Fixture calendar commands. Events live in the config file until a real
//! calendar provider is wired in.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use grocery_planner_core::{CalendarEvent, Config, CoreError};
use uuid::Uuid;

use super::{print_json, CliResult};

#[derive(Subcommand, Debug)]
pub enum CalendarAction {
    /// Add an event
    Add {
        /// Event title
        #[arg(long)]
        title: String,
        /// Start, RFC 3339 (e.g. 2024-03-09T09:30:00Z)
        #[arg(long)]
        start: DateTime<Utc>,
        /// End, RFC 3339
        #[arg(long)]
        end: DateTime<Utc>,
        /// Location
        #[arg(long)]
        location: Option<String>,
    },
    /// List events
    List,
    /// Remove an event
    Remove {
        /// Event ID
        id: String,
    },
}

pub fn run(action: CalendarAction) -> CliResult {
    let mut config = Config::load()?;

    match action {
        CalendarAction::Add {
            title,
            start,
            end,
            location,
        } => {
            if start >= end {
                return Err(CoreError::InvalidConfiguration(format!(
                    "event must end after it starts ({start} >= {end})"
                ))
                .into());
            }
            let mut event = CalendarEvent::new(Uuid::new_v4().to_string(), title, start, end);
            event.location = location;
            config.calendar.events.push(event.clone());
            config.save()?;
            print_json(&event)?;
        }
        CalendarAction::List => {
            print_json(&config.calendar.events)?;
        }
        CalendarAction::Remove { id } => {
            let before = config.calendar.events.len();
            config.calendar.events.retain(|event| event.id != id);
            if config.calendar.events.len() == before {
                return Err(CoreError::not_found("event", id).into());
            }
            config.save()?;
            println!("ok");
        }
    }
    Ok(())
}
