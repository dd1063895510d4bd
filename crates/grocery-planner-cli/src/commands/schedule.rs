use chrono::Utc;
use clap::Subcommand;

use super::{open_planner, print_json, CliResult};

#[derive(Subcommand, Debug)]
pub enum ScheduleAction {
    /// Generate this week's schedule, replacing any existing one
    Generate {
        /// User ID
        user: String,
    },
    /// Show this week's schedule
    Show {
        /// User ID
        user: String,
    },
    /// Approve a suggestion
    Approve {
        /// Schedule ID
        schedule_id: String,
        /// Suggestion ID
        suggestion_id: String,
    },
}

pub fn run(action: ScheduleAction) -> CliResult {
    let planner = open_planner()?;

    match action {
        ScheduleAction::Generate { user } => {
            let schedule = planner.generate_week(&user, Utc::now())?;
            eprintln!("Schedule generated: {} suggestions", schedule.suggestions.len());
            print_json(&schedule)?;
        }
        ScheduleAction::Show { user } => {
            print_json(&planner.current_schedule(&user, Utc::now())?)?;
        }
        ScheduleAction::Approve {
            schedule_id,
            suggestion_id,
        } => {
            let schedule = planner.approve(&schedule_id, &suggestion_id)?;
            eprintln!("Suggestion approved");
            print_json(&schedule)?;
        }
    }
    Ok(())
}
