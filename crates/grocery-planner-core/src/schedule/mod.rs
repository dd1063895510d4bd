//! Domain types: shopping preferences, calendar events, stores and the
//! weekly schedules built from them.

mod grocery_list;
mod timestamp;
mod weekday;
mod window;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

pub use grocery_list::{GroceryItem, GroceryList};
pub use timestamp::StoredTimestamp;
pub use weekday::Weekday;
pub use window::{PreferredWindow, WindowBounds};

fn default_shopping_duration() -> i64 {
    60
}

/// A user's shopping profile. One active record per `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub id: String,
    pub user_id: String,
    pub home_address: String,
    #[serde(default)]
    pub preferred_stores: Vec<String>,
    #[serde(default = "default_shopping_duration")]
    pub shopping_duration_minutes: i64,
    #[serde(default)]
    pub preferred_hours: Vec<PreferredWindow>,
    #[serde(default)]
    pub created_at: StoredTimestamp,
    #[serde(default)]
    pub updated_at: StoredTimestamp,
}

impl UserPreferences {
    pub fn new(user_id: impl Into<String>, home_address: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            home_address: home_address.into(),
            preferred_stores: Vec::new(),
            shopping_duration_minutes: default_shopping_duration(),
            preferred_hours: Vec::new(),
            created_at: StoredTimestamp::now(),
            updated_at: StoredTimestamp::now(),
        }
    }

    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.shopping_duration_minutes = minutes;
        self
    }

    pub fn with_window(mut self, window: PreferredWindow) -> Self {
        self.preferred_hours.push(window);
        self
    }

    /// Check the shopping duration.
    ///
    /// # Errors
    /// `InvalidConfiguration` when the duration is zero or negative.
    pub fn check_duration(&self) -> Result<()> {
        if self.shopping_duration_minutes <= 0 {
            return Err(CoreError::InvalidConfiguration(format!(
                "shopping_duration_minutes must be positive, got {}",
                self.shopping_duration_minutes
            )));
        }
        Ok(())
    }

    /// Check the duration and every preferred window.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(CoreError::InvalidConfiguration("user_id is empty".into()));
        }
        self.check_duration()?;
        for window in &self.preferred_hours {
            window.parse()?;
        }
        Ok(())
    }
}

/// A fixed-time commitment from the user's calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
}

impl CalendarEvent {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_time,
            end_time,
            location: None,
        }
    }

    /// Whether the event overlaps the half-open range `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryStore {
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub distance_km: Option<f64>,
}

impl GroceryStore {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        lat: f64,
        lng: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            lat,
            lng,
            distance_km: None,
        }
    }
}

/// One proposed shopping trip. The store is a snapshot taken at
/// generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSuggestion {
    pub id: String,
    pub suggested_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub store: GroceryStore,
    pub reason: String,
    pub travel_time_minutes: i64,
    pub confidence_score: f64,
}

impl ScheduleSuggestion {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.suggested_time + chrono::Duration::minutes(self.duration_minutes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    Pending,
    Approved,
    Scheduled,
}

impl ScheduleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ScheduleStatus::Pending => "pending",
            ScheduleStatus::Approved => "approved",
            ScheduleStatus::Scheduled => "scheduled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ScheduleStatus::Pending),
            "approved" => Some(ScheduleStatus::Approved),
            "scheduled" => Some(ScheduleStatus::Scheduled),
            _ => None,
        }
    }
}

/// Ranked suggestions for one user and one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub id: String,
    pub user_id: String,
    pub week_start: DateTime<Utc>,
    pub suggestions: Vec<ScheduleSuggestion>,
    #[serde(default)]
    pub approved_suggestion_id: Option<String>,
    #[serde(default)]
    pub status: ScheduleStatus,
    #[serde(default)]
    pub created_at: StoredTimestamp,
}

impl WeeklySchedule {
    pub fn new(
        user_id: impl Into<String>,
        week_start: DateTime<Utc>,
        suggestions: Vec<ScheduleSuggestion>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            week_start,
            suggestions,
            approved_suggestion_id: None,
            status: ScheduleStatus::Pending,
            created_at: StoredTimestamp::now(),
        }
    }

    pub fn suggestion(&self, suggestion_id: &str) -> Option<&ScheduleSuggestion> {
        self.suggestions.iter().find(|s| s.id == suggestion_id)
    }

    pub fn approved_suggestion(&self) -> Option<&ScheduleSuggestion> {
        self.approved_suggestion_id
            .as_deref()
            .and_then(|id| self.suggestion(id))
    }
}
