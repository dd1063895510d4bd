//! # Grocery Planner Core Library
//!
//! This library proposes grocery-shopping slots for a week. It reconciles a
//! user's recurring shopping windows with fixed calendar commitments,
//! attaches nearby stores and travel estimates, and ranks the result. The
//! CLI binary is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Slot Generator**: pure week scan producing ranked suggestions
//! - **Providers**: pluggable calendar, store and travel-time sources
//! - **Storage**: SQLite records for preferences, grocery lists and weekly
//!   schedules, plus TOML configuration
//! - **Planner**: ties generation to storage (generate, fetch, approve)
//!
//! ## Key Components
//!
//! - [`SlotGenerator`]: the week scan
//! - [`SchedulePlanner`]: orchestration used by front ends
//! - [`Database`]: record persistence
//! - [`Config`]: application configuration

pub mod error;
pub mod planner;
pub mod providers;
pub mod schedule;
pub mod scheduler;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError, ParseError, Result};
pub use planner::SchedulePlanner;
pub use providers::{
    CalendarSource, FixedTravelTime, FixtureCalendar, StoreDirectory, StoreLocator,
    TravelEstimator,
};
pub use schedule::{
    CalendarEvent, GroceryItem, GroceryList, GroceryStore, PreferredWindow, ScheduleStatus,
    ScheduleSuggestion, StoredTimestamp, UserPreferences, Weekday, WeeklySchedule,
};
pub use scheduler::{conflicts_with, week_start, SchedulerConfig, SlotGenerator};
pub use storage::{Config, Database};
