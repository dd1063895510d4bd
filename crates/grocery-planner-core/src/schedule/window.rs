//! Recurring weekly shopping windows.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::Weekday;
use crate::error::{CoreError, ParseError, Result};

/// A time-of-day range, repeated on each of `days`, during which the user
/// is willing to shop. Times are stored as entered ("HH:MM").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredWindow {
    pub start_time: String, // HH:MM
    pub end_time: String,   // HH:MM
    pub days: BTreeSet<Weekday>,
}

/// Checked bounds of a [`PreferredWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WindowBounds {
    pub fn span_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

fn parse_time_of_day(value: &str) -> Result<NaiveTime, ParseError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ParseError::InvalidTimeOfDay {
        value: value.to_string(),
    })
}

impl PreferredWindow {
    pub fn new(
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        days: impl IntoIterator<Item = Weekday>,
    ) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
            days: days.into_iter().collect(),
        }
    }

    /// Parse and check the window.
    ///
    /// # Errors
    /// `CoreError::Parse` when either time is not `HH:MM`;
    /// `CoreError::InvalidConfiguration` when the window is empty, wraps
    /// past midnight, or names no days.
    pub fn parse(&self) -> Result<WindowBounds> {
        let start = parse_time_of_day(&self.start_time)?;
        let end = parse_time_of_day(&self.end_time)?;

        if start >= end {
            return Err(CoreError::InvalidConfiguration(format!(
                "window {}-{} must end after it starts",
                self.start_time, self.end_time
            )));
        }
        if self.days.is_empty() {
            return Err(CoreError::InvalidConfiguration(format!(
                "window {}-{} has no days",
                self.start_time, self.end_time
            )));
        }

        Ok(WindowBounds { start, end })
    }

    pub fn applies_to(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }
}
