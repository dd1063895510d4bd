//! Pluggable data sources the slot generator calls through.
//!
//! The shipped implementations are placeholders: a calendar backed by a
//! fixed list of events, a static store directory, and a constant travel
//! time. Real calendar sync, geocoding and routing plug in by implementing
//! the traits in [`traits`].

pub mod fixtures;
pub mod traits;

pub use fixtures::{FixedTravelTime, FixtureCalendar, StoreDirectory};
pub use traits::{CalendarSource, StoreLocator, TravelEstimator};
