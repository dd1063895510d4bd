//! Slot generator for grocery trips.
//!
//! This module turns a user's recurring shopping windows into concrete,
//! ranked suggestions for one week:
//! - Walks each day of the week and every window that applies to it
//! - Steps through candidate start times inside the window
//! - Drops candidates that overlap a calendar event
//! - Pairs every surviving slot with each nearby store and a travel estimate
//! - Scores, ranks and truncates the result

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::providers::{
    CalendarSource, FixedTravelTime, FixtureCalendar, StoreDirectory, StoreLocator,
    TravelEstimator,
};
use crate::schedule::{
    CalendarEvent, PreferredWindow, ScheduleSuggestion, UserPreferences, Weekday, WindowBounds,
};

/// Largest allowed `slot_step_minutes` (one day)
pub const MAX_SLOT_STEP_MINUTES: i64 = 24 * 60;

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum number of suggestions returned
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Distance between candidate start times inside a window (minutes)
    #[serde(default = "default_slot_step")]
    pub slot_step_minutes: i64,
    /// Score for Saturday and Sunday slots
    #[serde(default = "default_weekend_confidence")]
    pub weekend_confidence: f64,
    /// Score for Monday to Friday slots
    #[serde(default = "default_weekday_confidence")]
    pub weekday_confidence: f64,
}

fn default_max_suggestions() -> usize {
    5
}
fn default_slot_step() -> i64 {
    60
}
fn default_weekend_confidence() -> f64 {
    0.8
}
fn default_weekday_confidence() -> f64 {
    0.6
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            slot_step_minutes: default_slot_step(),
            weekend_confidence: default_weekend_confidence(),
            weekday_confidence: default_weekday_confidence(),
        }
    }
}

impl SchedulerConfig {
    /// # Errors
    /// `InvalidConfiguration` for a step outside `1..=1440`, a zero cap, scores
    /// outside `[0, 1]`, or weekend slots not outranking weekday slots.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SLOT_STEP_MINUTES).contains(&self.slot_step_minutes) {
            return Err(CoreError::InvalidConfiguration(format!(
                "slot_step_minutes must be within 1..={MAX_SLOT_STEP_MINUTES}, got {}",
                self.slot_step_minutes
            )));
        }
        if self.max_suggestions == 0 {
            return Err(CoreError::InvalidConfiguration(
                "max_suggestions must be at least 1".into(),
            ));
        }
        for (key, score) in [
            ("weekend_confidence", self.weekend_confidence),
            ("weekday_confidence", self.weekday_confidence),
        ] {
            if !(0.0..=1.0).contains(&score) {
                return Err(CoreError::InvalidConfiguration(format!(
                    "{key} must be within [0, 1], got {score}"
                )));
            }
        }
        if self.weekend_confidence <= self.weekday_confidence {
            return Err(CoreError::InvalidConfiguration(
                "weekend_confidence must be greater than weekday_confidence".into(),
            ));
        }
        Ok(())
    }

    /// Confidence for a slot on `day`.
    pub fn score(&self, day: Weekday) -> f64 {
        if day.is_weekend() {
            self.weekend_confidence
        } else {
            self.weekday_confidence
        }
    }
}

/// Monday 00:00:00 UTC of the week containing `at`.
pub fn week_start(at: DateTime<Utc>) -> DateTime<Utc> {
    let days_since_monday = at.weekday().num_days_from_monday() as i64;
    (at.date_naive() - Duration::days(days_since_monday))
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Whether `event` rules out the slot `[slot_start, slot_end)`.
///
/// The event conflicts when it starts inside the slot, ends inside it, or
/// spans all of it. Touching boundaries do not conflict: an event ending
/// exactly at `slot_start` or starting exactly at `slot_end` leaves the
/// slot free.
pub fn conflicts_with(event: &CalendarEvent, slot_start: DateTime<Utc>, slot_end: DateTime<Utc>) -> bool {
    let starts_inside = slot_start <= event.start_time && event.start_time < slot_end;
    let ends_inside = slot_start < event.end_time && event.end_time <= slot_end;
    let spans_slot = event.start_time <= slot_start && event.end_time >= slot_end;
    starts_inside || ends_inside || spans_slot
}

/// Generates ranked shopping suggestions from preferences and providers.
pub struct SlotGenerator {
    config: SchedulerConfig,
    calendar: Box<dyn CalendarSource>,
    stores: Box<dyn StoreLocator>,
    travel: Box<dyn TravelEstimator>,
}

impl SlotGenerator {
    /// Create a generator with the default config
    pub fn new(
        calendar: impl CalendarSource + 'static,
        stores: impl StoreLocator + 'static,
        travel: impl TravelEstimator + 'static,
    ) -> Self {
        Self {
            config: SchedulerConfig::default(),
            calendar: Box::new(calendar),
            stores: Box::new(stores),
            travel: Box::new(travel),
        }
    }

    /// Replace the scheduler config
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Generate suggestions for the week beginning at `week_start`.
    ///
    /// `week_start` is expected to be a Monday midnight; it is not checked.
    /// The result holds at most `max_suggestions` entries, highest
    /// confidence first. Equal scores keep discovery order: earlier day,
    /// earlier window, earlier start, earlier-listed store.
    ///
    /// # Errors
    /// `InvalidConfiguration` for a non-positive shopping duration or a bad
    /// scheduler config, `Parse` for a malformed window, and any provider
    /// error unchanged.
    pub fn generate(
        &self,
        preferences: &UserPreferences,
        week_start: DateTime<Utc>,
    ) -> Result<Vec<ScheduleSuggestion>> {
        self.config.validate()?;
        preferences.check_duration()?;

        let windows = preferences
            .preferred_hours
            .iter()
            .map(|window| window.parse().map(|bounds| (window, bounds)))
            .collect::<Result<Vec<(&PreferredWindow, WindowBounds)>>>()?;

        if windows.is_empty() {
            tracing::debug!(user_id = %preferences.user_id, "no preferred windows, nothing to suggest");
            return Ok(Vec::new());
        }

        // A window shorter than the trip can never hold a slot
        let windows: Vec<_> = windows
            .into_iter()
            .filter(|(_, bounds)| preferences.shopping_duration_minutes <= bounds.span_minutes())
            .collect();
        if windows.is_empty() {
            tracing::debug!(
                user_id = %preferences.user_id,
                duration = preferences.shopping_duration_minutes,
                "shopping duration exceeds every preferred window"
            );
            return Ok(Vec::new());
        }

        let week_end = week_start + Duration::days(7);
        let events = self.calendar.lookup_calendar_events(
            &preferences.user_id,
            week_start,
            week_end,
        )?;

        let duration = Duration::minutes(preferences.shopping_duration_minutes);
        let step = Duration::minutes(self.config.slot_step_minutes);
        let mut suggestions = Vec::new();

        for day_offset in 0..7 {
            let day = week_start + Duration::days(day_offset);
            let weekday = Weekday::from(day.weekday());
            let date = day.date_naive();

            for (_, bounds) in windows.iter().filter(|(window, _)| window.applies_to(weekday)) {
                let window_end = date.and_time(bounds.end).and_utc();
                let mut slot_start = date.and_time(bounds.start).and_utc();

                loop {
                    let Some(slot_end) = slot_start.checked_add_signed(duration) else {
                        break;
                    };
                    if slot_end > window_end {
                        break;
                    }

                    match events.iter().find(|e| conflicts_with(e, slot_start, slot_end)) {
                        Some(event) => {
                            tracing::debug!(
                                %slot_start,
                                event_id = %event.id,
                                "slot conflicts with calendar event"
                            );
                        }
                        None => {
                            self.push_slot(&mut suggestions, preferences, weekday, slot_start)?;
                        }
                    }

                    match slot_start.checked_add_signed(step) {
                        Some(next) => slot_start = next,
                        None => break,
                    }
                }
            }
        }

        let candidates = suggestions.len();
        // sort_by is stable, so equal scores keep discovery order
        suggestions.sort_by(|a, b| b.confidence_score.total_cmp(&a.confidence_score));
        suggestions.truncate(self.config.max_suggestions);

        tracing::info!(
            user_id = %preferences.user_id,
            %week_start,
            candidates,
            returned = suggestions.len(),
            "generated shopping suggestions"
        );

        Ok(suggestions)
    }

    /// Emit one suggestion per nearby store for a free slot
    fn push_slot(
        &self,
        suggestions: &mut Vec<ScheduleSuggestion>,
        preferences: &UserPreferences,
        weekday: Weekday,
        slot_start: DateTime<Utc>,
    ) -> Result<()> {
        let stores = self.stores.find_nearby_stores(&preferences.home_address)?;
        let confidence = self.config.score(weekday);

        for store in stores {
            let travel_time = self
                .travel
                .estimate_travel_time(&preferences.home_address, &store)?;

            suggestions.push(ScheduleSuggestion {
                id: Uuid::new_v4().to_string(),
                suggested_time: slot_start,
                duration_minutes: preferences.shopping_duration_minutes,
                store,
                reason: format!("Free time on {weekday} during your preferred hours"),
                travel_time_minutes: travel_time,
                confidence_score: confidence,
            });
        }
        Ok(())
    }
}

impl Default for SlotGenerator {
    fn default() -> Self {
        Self::new(
            FixtureCalendar::default(),
            StoreDirectory::default(),
            FixedTravelTime::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // 2024-03-04 is a Monday
    fn monday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()
    }

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
    }

    fn prefs(duration: i64, windows: Vec<PreferredWindow>) -> UserPreferences {
        let mut prefs = UserPreferences::new("user-1", "1 Main St").with_duration(duration);
        prefs.preferred_hours = windows;
        prefs
    }

    fn generator(events: Vec<CalendarEvent>) -> SlotGenerator {
        SlotGenerator::new(
            FixtureCalendar::new(events),
            StoreDirectory::default(),
            FixedTravelTime::default(),
        )
    }

    struct CountingCalendar {
        calls: Arc<AtomicUsize>,
    }

    impl CalendarSource for CountingCalendar {
        fn name(&self) -> &str {
            "counting"
        }

        fn lookup_calendar_events(
            &self,
            _user_id: &str,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<CalendarEvent>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    struct BrokenLocator;

    impl StoreLocator for BrokenLocator {
        fn name(&self) -> &str {
            "broken"
        }

        fn find_nearby_stores(&self, _home_address: &str) -> Result<Vec<crate::schedule::GroceryStore>> {
            Err(CoreError::provider("broken", "lookup service unavailable"))
        }
    }

    #[test]
    fn test_empty_preferred_hours_yield_nothing() {
        let result = generator(vec![]).generate(&prefs(60, vec![]), monday()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_saturday_conflict_drops_first_slot() {
        let event = CalendarEvent::new("e1", "Coffee", at(9, 9, 30), at(9, 10, 0));
        let window = PreferredWindow::new("09:00", "11:00", [Weekday::Saturday]);

        let result = generator(vec![event])
            .generate(&prefs(60, vec![window]), monday())
            .unwrap();

        assert_eq!(result.len(), 2);
        for suggestion in &result {
            assert_eq!(suggestion.suggested_time, at(9, 10, 0));
            assert_eq!(suggestion.confidence_score, 0.8);
            assert_eq!(suggestion.travel_time_minutes, 15);
            assert_eq!(suggestion.duration_minutes, 60);
            assert_eq!(suggestion.reason, "Free time on Saturday during your preferred hours");
        }
        assert_eq!(result[0].store.id, "1");
        assert_eq!(result[1].store.id, "2");
    }

    #[test]
    fn test_duration_longer_than_window() {
        let window = PreferredWindow::new("09:00", "10:00", [Weekday::Monday, Weekday::Sunday]);
        let result = generator(vec![]).generate(&prefs(90, vec![window]), monday()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_oversized_duration_yields_nothing() {
        let window = PreferredWindow::new("09:00", "11:00", [Weekday::Saturday]);
        for duration in [121, 200_000_000_000, i64::MAX] {
            let result = generator(vec![])
                .generate(&prefs(duration, vec![window.clone()]), monday())
                .unwrap();
            assert!(result.is_empty(), "duration {duration}");
        }
    }

    #[test]
    fn test_oversized_window_skipped_others_kept() {
        let windows = vec![
            PreferredWindow::new("09:00", "09:30", [Weekday::Saturday]),
            PreferredWindow::new("13:00", "14:00", [Weekday::Saturday]),
        ];
        let result = generator(vec![]).generate(&prefs(60, windows), monday()).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|s| s.suggested_time == at(9, 13, 0)));
    }

    #[test]
    fn test_full_day_step_gives_one_slot_per_window() {
        let window = PreferredWindow::new("00:00", "23:59", [Weekday::Sunday]);
        let config = SchedulerConfig {
            slot_step_minutes: MAX_SLOT_STEP_MINUTES,
            ..SchedulerConfig::default()
        };
        let result = generator(vec![])
            .with_config(config)
            .generate(&prefs(60, vec![window]), monday())
            .unwrap();
        let times: Vec<_> = result.iter().map(|s| s.suggested_time).collect();
        assert_eq!(times, vec![at(10, 0, 0), at(10, 0, 0)]);
    }

    #[test]
    fn test_two_windows_same_day_both_contribute() {
        let windows = vec![
            PreferredWindow::new("09:00", "10:00", [Weekday::Tuesday]),
            PreferredWindow::new("14:00", "15:00", [Weekday::Tuesday]),
        ];
        let result = generator(vec![]).generate(&prefs(60, windows), monday()).unwrap();

        let times: Vec<_> = result.iter().map(|s| (s.suggested_time, s.store.id.as_str())).collect();
        assert_eq!(
            times,
            vec![
                (at(5, 9, 0), "1"),
                (at(5, 9, 0), "2"),
                (at(5, 14, 0), "1"),
                (at(5, 14, 0), "2"),
            ]
        );
        assert!(result.iter().all(|s| s.confidence_score == 0.6));
    }

    #[test]
    fn test_weekend_outranks_weekday_and_result_is_capped() {
        let window = PreferredWindow::new("09:00", "11:00", [Weekday::Monday, Weekday::Saturday]);
        let result = generator(vec![]).generate(&prefs(60, vec![window]), monday()).unwrap();

        assert_eq!(result.len(), 5);
        let order: Vec<_> = result
            .iter()
            .map(|s| (s.suggested_time, s.store.id.as_str(), s.confidence_score))
            .collect();
        assert_eq!(
            order,
            vec![
                (at(9, 9, 0), "1", 0.8),
                (at(9, 9, 0), "2", 0.8),
                (at(9, 10, 0), "1", 0.8),
                (at(9, 10, 0), "2", 0.8),
                (at(4, 9, 0), "1", 0.6),
            ]
        );
    }

    #[test]
    fn test_step_walks_until_slot_leaves_window() {
        let window = PreferredWindow::new("09:00", "10:30", [Weekday::Wednesday]);
        let result = SlotGenerator::new(
            FixtureCalendar::default(),
            StoreDirectory::new(StoreDirectory::default_stores(), 1),
            FixedTravelTime::new(5),
        )
        .generate(&prefs(30, vec![window]), monday())
        .unwrap();

        let times: Vec<_> = result.iter().map(|s| s.suggested_time).collect();
        assert_eq!(times, vec![at(6, 9, 0), at(6, 10, 0)]);
        assert!(result.iter().all(|s| s.travel_time_minutes == 5));
    }

    #[test]
    fn test_touching_events_do_not_conflict() {
        let events = vec![
            CalendarEvent::new("early", "Early", at(9, 8, 0), at(9, 9, 0)),
            CalendarEvent::new("late", "Late", at(9, 11, 0), at(9, 12, 0)),
        ];
        let window = PreferredWindow::new("09:00", "11:00", [Weekday::Saturday]);
        let result = generator(events).generate(&prefs(60, vec![window]), monday()).unwrap();
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_conflicts_with_clauses() {
        let (start, end) = (at(9, 10, 0), at(9, 11, 0));
        let event = |s, e| CalendarEvent::new("e", "E", s, e);

        // starts inside
        assert!(conflicts_with(&event(at(9, 10, 30), at(9, 12, 0)), start, end));
        // ends inside
        assert!(conflicts_with(&event(at(9, 9, 0), at(9, 10, 15)), start, end));
        // contained
        assert!(conflicts_with(&event(at(9, 10, 15), at(9, 10, 45)), start, end));
        // spans
        assert!(conflicts_with(&event(at(9, 8, 0), at(9, 12, 0)), start, end));
        // exact match
        assert!(conflicts_with(&event(start, end), start, end));
        // touching
        assert!(!conflicts_with(&event(at(9, 9, 0), start), start, end));
        assert!(!conflicts_with(&event(end, at(9, 12, 0)), start, end));
    }

    #[test]
    fn test_non_positive_duration_fails_before_provider_calls() {
        let calls = Arc::new(AtomicUsize::new(0));
        let generator = SlotGenerator::new(
            CountingCalendar { calls: calls.clone() },
            StoreDirectory::default(),
            FixedTravelTime::default(),
        );
        let window = PreferredWindow::new("09:00", "11:00", [Weekday::Saturday]);

        for duration in [0, -15] {
            let err = generator
                .generate(&prefs(duration, vec![window.clone()]), monday())
                .unwrap_err();
            assert!(matches!(err, CoreError::InvalidConfiguration(_)));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        generator.generate(&prefs(60, vec![window]), monday()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_malformed_window_aborts_generation() {
        let windows = vec![
            PreferredWindow::new("09:00", "11:00", [Weekday::Saturday]),
            PreferredWindow::new("9 o'clock", "11:00", [Weekday::Sunday]),
        ];
        let err = generator(vec![]).generate(&prefs(60, windows), monday()).unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }

    #[test]
    fn test_provider_failure_propagates() {
        let generator = SlotGenerator::new(
            FixtureCalendar::default(),
            BrokenLocator,
            FixedTravelTime::default(),
        );
        let window = PreferredWindow::new("09:00", "10:00", [Weekday::Friday]);
        let err = generator.generate(&prefs(60, vec![window]), monday()).unwrap_err();
        assert!(matches!(err, CoreError::Provider { ref provider, .. } if provider == "broken"));
    }

    #[test]
    fn test_invalid_scheduler_config_rejected() {
        let window = PreferredWindow::new("09:00", "10:00", [Weekday::Friday]);
        let config = SchedulerConfig {
            slot_step_minutes: 0,
            ..SchedulerConfig::default()
        };
        let err = generator(vec![])
            .with_config(config)
            .generate(&prefs(60, vec![window.clone()]), monday())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));

        for step in [MAX_SLOT_STEP_MINUTES + 1, 200_000_000_000, i64::MAX] {
            let huge_step = SchedulerConfig {
                slot_step_minutes: step,
                ..SchedulerConfig::default()
            };
            let err = generator(vec![])
                .with_config(huge_step)
                .generate(&prefs(60, vec![window.clone()]), monday())
                .unwrap_err();
            assert!(matches!(err, CoreError::InvalidConfiguration(_)), "step {step}");
        }

        let inverted = SchedulerConfig {
            weekend_confidence: 0.5,
            weekday_confidence: 0.7,
            ..SchedulerConfig::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_week_start_normalizes_to_monday_midnight() {
        assert_eq!(week_start(at(6, 15, 42)), monday());
        assert_eq!(week_start(monday()), monday());
        assert_eq!(week_start(at(10, 23, 59)), monday());
        assert_eq!(week_start(at(11, 0, 0)), at(11, 0, 0));
    }
}
