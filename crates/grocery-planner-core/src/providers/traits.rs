use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::schedule::{CalendarEvent, GroceryStore};

/// Source of the user's fixed-time commitments.
/// Implementations must be read-only: looking events up never changes them.
pub trait CalendarSource: Send + Sync {
    /// Unique identifier used in errors and logs (e.g. "fixture").
    fn name(&self) -> &str;

    /// Events overlapping the half-open range `[start, end)`.
    fn lookup_calendar_events(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>>;
}

/// Finds grocery stores near an address, most relevant first.
pub trait StoreLocator: Send + Sync {
    fn name(&self) -> &str;

    fn find_nearby_stores(&self, home_address: &str) -> Result<Vec<GroceryStore>>;
}

/// Estimates travel time between home and a store.
pub trait TravelEstimator: Send + Sync {
    fn name(&self) -> &str;

    /// Travel time in whole minutes.
    fn estimate_travel_time(&self, home_address: &str, store: &GroceryStore) -> Result<i64>;
}
