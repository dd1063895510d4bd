//! Orchestration over the slot generator and storage.
//!
//! `SchedulePlanner` is what the CLI (or any other front end) talks to:
//! it loads preferences, runs generation for the current week, persists the
//! resulting schedule and handles approval.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, Result};
use crate::scheduler::{week_start, SlotGenerator};
use crate::schedule::{GroceryList, ScheduleStatus, StoredTimestamp, UserPreferences, WeeklySchedule};
use crate::storage::Database;

pub struct SchedulePlanner {
    db: Database,
    generator: SlotGenerator,
}

impl SchedulePlanner {
    pub fn new(db: Database, generator: SlotGenerator) -> Self {
        Self { db, generator }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Save preferences, replacing any earlier record for the same user.
    ///
    /// The first `created_at` is kept across updates.
    ///
    /// # Errors
    /// `InvalidConfiguration` or `Parse` when the preferences are invalid.
    pub fn save_preferences(&self, mut preferences: UserPreferences) -> Result<UserPreferences> {
        preferences.validate()?;

        if let Some(existing) = self.db.get_preferences(&preferences.user_id)? {
            preferences.created_at = existing.created_at;
        }
        preferences.updated_at = StoredTimestamp::now();

        self.db.upsert_preferences(&preferences)?;
        tracing::info!(user_id = %preferences.user_id, "saved preferences");
        Ok(preferences)
    }

    /// # Errors
    /// `NotFound` when the user has no preferences.
    pub fn preferences(&self, user_id: &str) -> Result<UserPreferences> {
        self.db
            .get_preferences(user_id)?
            .ok_or_else(|| CoreError::not_found("preferences", user_id))
    }

    /// Save a grocery list, replacing the user's previous list.
    pub fn save_grocery_list(&self, mut list: GroceryList) -> Result<GroceryList> {
        if let Some(existing) = self.db.get_grocery_list(&list.user_id)? {
            list.created_at = existing.created_at;
        }
        list.updated_at = StoredTimestamp::now();

        self.db.upsert_grocery_list(&list)?;
        tracing::info!(user_id = %list.user_id, items = list.items.len(), "saved grocery list");
        Ok(list)
    }

    /// The user's grocery list, or an empty one if none was saved.
    pub fn grocery_list(&self, user_id: &str) -> Result<GroceryList> {
        Ok(self
            .db
            .get_grocery_list(user_id)?
            .unwrap_or_else(|| GroceryList::empty(user_id)))
    }

    /// Generate and store the schedule for the week containing `now`.
    ///
    /// Any schedule already stored for that user and week is replaced.
    ///
    /// # Errors
    /// `NotFound` when the user has no preferences; generation errors
    /// otherwise.
    pub fn generate_week(&self, user_id: &str, now: DateTime<Utc>) -> Result<WeeklySchedule> {
        let preferences = self.preferences(user_id)?;
        let week = week_start(now);

        let suggestions = self.generator.generate(&preferences, week)?;
        let schedule = WeeklySchedule::new(user_id, week, suggestions);
        self.db.replace_schedule(&schedule)?;
        Ok(schedule)
    }

    /// The stored schedule for the week containing `now`.
    ///
    /// # Errors
    /// `NotFound` when no schedule was generated for that week.
    pub fn current_schedule(&self, user_id: &str, now: DateTime<Utc>) -> Result<WeeklySchedule> {
        let week = week_start(now);
        self.db
            .get_schedule_for_week(user_id, week)?
            .ok_or_else(|| CoreError::not_found("schedule", format!("{user_id} week of {}", week.date_naive())))
    }

    /// Approve one suggestion of a stored schedule.
    ///
    /// # Errors
    /// `NotFound` when the schedule does not exist or does not contain
    /// `suggestion_id`.
    pub fn approve(&self, schedule_id: &str, suggestion_id: &str) -> Result<WeeklySchedule> {
        let mut schedule = self
            .db
            .get_schedule(schedule_id)?
            .ok_or_else(|| CoreError::not_found("schedule", schedule_id))?;

        if schedule.suggestion(suggestion_id).is_none() {
            return Err(CoreError::not_found("suggestion", suggestion_id));
        }

        if !self
            .db
            .set_schedule_approval(schedule_id, suggestion_id, ScheduleStatus::Approved)?
        {
            return Err(CoreError::not_found("schedule", schedule_id));
        }

        schedule.approved_suggestion_id = Some(suggestion_id.to_string());
        schedule.status = ScheduleStatus::Approved;
        tracing::info!(schedule_id, suggestion_id, "approved suggestion");
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{FixedTravelTime, FixtureCalendar, StoreDirectory};
    use crate::schedule::{GroceryItem, PreferredWindow, Weekday};
    use chrono::TimeZone;

    fn planner() -> SchedulePlanner {
        SchedulePlanner::new(
            Database::open_memory().unwrap(),
            SlotGenerator::new(
                FixtureCalendar::default(),
                StoreDirectory::default(),
                FixedTravelTime::default(),
            ),
        )
    }

    fn wednesday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 6, 12, 30, 0).unwrap()
    }

    fn weekend_prefs(user_id: &str) -> UserPreferences {
        UserPreferences::new(user_id, "1 Main St")
            .with_window(PreferredWindow::new("09:00", "11:00", [Weekday::Saturday]))
    }

    #[test]
    fn preferences_missing_is_not_found() {
        let err = planner().preferences("nobody").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn save_preferences_keeps_created_at() {
        let planner = planner();
        let first = planner.save_preferences(weekend_prefs("u1")).unwrap();
        let second = planner
            .save_preferences(weekend_prefs("u1").with_duration(30))
            .unwrap();

        assert_eq!(second.created_at, first.created_at);
        assert_eq!(planner.preferences("u1").unwrap().shopping_duration_minutes, 30);
    }

    #[test]
    fn save_preferences_rejects_invalid_profile() {
        let err = planner()
            .save_preferences(weekend_prefs("u1").with_duration(0))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));
    }

    #[test]
    fn grocery_list_defaults_to_empty() {
        let planner = planner();
        let list = planner.grocery_list("u1").unwrap();
        assert!(list.items.is_empty());
        assert_eq!(list.user_id, "u1");

        let mut list = list;
        list.items.push(GroceryItem::new("bread"));
        planner.save_grocery_list(list).unwrap();
        assert_eq!(planner.grocery_list("u1").unwrap().items.len(), 1);
    }

    #[test]
    fn generate_week_requires_preferences() {
        let err = planner().generate_week("u1", wednesday()).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "preferences", .. }));
    }

    #[test]
    fn generate_week_stores_schedule_for_monday() {
        let planner = planner();
        planner.save_preferences(weekend_prefs("u1")).unwrap();

        let schedule = planner.generate_week("u1", wednesday()).unwrap();
        assert_eq!(
            schedule.week_start,
            Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()
        );
        assert_eq!(schedule.suggestions.len(), 4);
        assert_eq!(schedule.status, ScheduleStatus::Pending);

        let current = planner.current_schedule("u1", wednesday()).unwrap();
        assert_eq!(current.id, schedule.id);
        assert_eq!(current.suggestions, schedule.suggestions);
    }

    #[test]
    fn regenerating_replaces_the_week() {
        let planner = planner();
        planner.save_preferences(weekend_prefs("u1")).unwrap();
        let first = planner.generate_week("u1", wednesday()).unwrap();
        let second = planner.generate_week("u1", wednesday()).unwrap();

        assert_ne!(first.id, second.id);
        assert!(planner.db().get_schedule(&first.id).unwrap().is_none());
        assert_eq!(planner.current_schedule("u1", wednesday()).unwrap().id, second.id);
    }

    #[test]
    fn current_schedule_missing_is_not_found() {
        let err = planner().current_schedule("u1", wednesday()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn approve_sets_status_and_suggestion() {
        let planner = planner();
        planner.save_preferences(weekend_prefs("u1")).unwrap();
        let schedule = planner.generate_week("u1", wednesday()).unwrap();
        let chosen = schedule.suggestions[1].id.clone();

        let approved = planner.approve(&schedule.id, &chosen).unwrap();
        assert_eq!(approved.status, ScheduleStatus::Approved);

        let stored = planner.current_schedule("u1", wednesday()).unwrap();
        assert_eq!(stored.status, ScheduleStatus::Approved);
        assert_eq!(stored.approved_suggestion_id.as_deref(), Some(chosen.as_str()));
    }

    #[test]
    fn approve_unknown_ids_fail() {
        let planner = planner();
        let err = planner.approve("missing", "whatever").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "schedule", .. }));

        planner.save_preferences(weekend_prefs("u1")).unwrap();
        let schedule = planner.generate_week("u1", wednesday()).unwrap();
        let err = planner.approve(&schedule.id, "not-a-suggestion").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "suggestion", .. }));
        assert_eq!(
            planner.current_schedule("u1", wednesday()).unwrap().status,
            ScheduleStatus::Pending
        );
    }
}
