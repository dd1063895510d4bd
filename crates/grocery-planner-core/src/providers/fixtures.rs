//! Placeholder providers used until real integrations exist.

use chrono::{DateTime, Utc};

use super::traits::{CalendarSource, StoreLocator, TravelEstimator};
use crate::error::{CoreError, Result};
use crate::schedule::{CalendarEvent, GroceryStore};

/// Calendar backed by a fixed list of events (usually loaded from config).
#[derive(Debug, Clone, Default)]
pub struct FixtureCalendar {
    events: Vec<CalendarEvent>,
}

impl FixtureCalendar {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }
}

impl CalendarSource for FixtureCalendar {
    fn name(&self) -> &str {
        "fixture"
    }

    fn lookup_calendar_events(
        &self,
        _user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|event| event.overlaps(start, end))
            .cloned()
            .collect())
    }
}

/// Static store directory. "Nearby" is simply the first `nearby_limit`
/// entries; the home address is not geocoded.
#[derive(Debug, Clone)]
pub struct StoreDirectory {
    stores: Vec<GroceryStore>,
    nearby_limit: usize,
}

impl StoreDirectory {
    pub fn new(stores: Vec<GroceryStore>, nearby_limit: usize) -> Self {
        Self {
            stores,
            nearby_limit,
        }
    }

    /// The four built-in stores.
    pub fn default_stores() -> Vec<GroceryStore> {
        vec![
            GroceryStore::new("1", "Whole Foods Market", "100 Organic St", 40.7128, -74.0060),
            GroceryStore::new("2", "Trader Joe's", "200 Affordable Ave", 40.7589, -73.9851),
            GroceryStore::new("3", "Safeway", "300 Convenient Blvd", 40.7505, -73.9934),
            GroceryStore::new("4", "Target Grocery", "400 Everything Dr", 40.7282, -73.7949),
        ]
    }

    /// Every store in the directory.
    pub fn stores(&self) -> &[GroceryStore] {
        &self.stores
    }

    pub fn get(&self, id: &str) -> Result<&GroceryStore> {
        self.stores
            .iter()
            .find(|store| store.id == id)
            .ok_or_else(|| CoreError::not_found("store", id))
    }
}

impl Default for StoreDirectory {
    fn default() -> Self {
        Self::new(Self::default_stores(), 2)
    }
}

impl StoreLocator for StoreDirectory {
    fn name(&self) -> &str {
        "directory"
    }

    fn find_nearby_stores(&self, _home_address: &str) -> Result<Vec<GroceryStore>> {
        Ok(self.stores.iter().take(self.nearby_limit).cloned().collect())
    }
}

/// Constant travel estimate, pending a routing integration.
#[derive(Debug, Clone, Copy)]
pub struct FixedTravelTime {
    minutes: i64,
}

impl FixedTravelTime {
    pub fn new(minutes: i64) -> Self {
        Self { minutes }
    }
}

impl Default for FixedTravelTime {
    fn default() -> Self {
        Self::new(15)
    }
}

impl TravelEstimator for FixedTravelTime {
    fn name(&self) -> &str {
        "fixed"
    }

    fn estimate_travel_time(&self, _home_address: &str, _store: &GroceryStore) -> Result<i64> {
        Ok(self.minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixture_calendar_returns_overlapping_events_only() {
        let at = |d, h| Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap();
        let calendar = FixtureCalendar::new(vec![
            CalendarEvent::new("before", "Before", at(3, 22), at(4, 1)),
            CalendarEvent::new("inside", "Inside", at(5, 9), at(5, 10)),
            CalendarEvent::new("after", "After", at(11, 0), at(11, 1)),
        ]);

        let events = calendar
            .lookup_calendar_events("u1", at(4, 0), at(11, 0))
            .unwrap();
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["before", "inside"]);
    }

    #[test]
    fn directory_limits_nearby_stores() {
        let directory = StoreDirectory::default();
        let nearby = directory.find_nearby_stores("anywhere").unwrap();
        assert_eq!(nearby.len(), 2);
        assert_eq!(nearby[0].name, "Whole Foods Market");
        assert_eq!(directory.stores().len(), 4);
        assert!(directory.get("3").is_ok());
        assert!(directory.get("9").unwrap_err().is_not_found());
    }

    #[test]
    fn fixed_travel_time_ignores_inputs() {
        let travel = FixedTravelTime::default();
        let store = StoreDirectory::default_stores().remove(0);
        assert_eq!(travel.estimate_travel_time("home", &store).unwrap(), 15);
    }
}
