//! SQLite-based storage for preferences, grocery lists and weekly schedules.
//!
//! Preferences and grocery lists are keyed by `user_id`; saving one replaces
//! the previous record. Schedules are keyed by id and unique per
//! `(user_id, week_start)`.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, migrations};
use crate::error::{DatabaseError, ParseError, Result};
use crate::schedule::{
    GroceryList, ScheduleStatus, ScheduleSuggestion, StoredTimestamp, UserPreferences,
    WeeklySchedule,
};

/// Canonical storage form of a week start, e.g. `2024-03-04T00:00:00Z`.
pub fn week_key(week_start: DateTime<Utc>) -> String {
    week_start.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_week_key(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            ParseError::InvalidTimestamp {
                field: "week_start",
                value: value.to_string(),
            }
            .into()
        })
}

/// Raw `weekly_schedules` row, converted outside the rusqlite closure.
struct ScheduleRow {
    id: String,
    user_id: String,
    week_start: String,
    suggestions: String,
    approved_suggestion_id: Option<String>,
    status: String,
    created_at: String,
}

impl ScheduleRow {
    const COLUMNS: &'static str =
        "id, user_id, week_start, suggestions, approved_suggestion_id, status, created_at";

    fn from_row(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            week_start: row.get(2)?,
            suggestions: row.get(3)?,
            approved_suggestion_id: row.get(4)?,
            status: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_schedule(self) -> Result<WeeklySchedule> {
        let suggestions: Vec<ScheduleSuggestion> = serde_json::from_str(&self.suggestions)?;
        let status = ScheduleStatus::parse(&self.status).unwrap_or_else(|| {
            tracing::warn!(schedule_id = %self.id, status = %self.status, "unknown schedule status, treating as pending");
            ScheduleStatus::Pending
        });

        Ok(WeeklySchedule {
            week_start: parse_week_key(&self.week_start)?,
            id: self.id,
            user_id: self.user_id,
            suggestions,
            approved_suggestion_id: self.approved_suggestion_id,
            status,
            created_at: StoredTimestamp::from_stored("created_at", &self.created_at),
        })
    }
}

/// SQLite database for grocery planner records.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/grocery-planner.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("grocery-planner.db"))
    }

    /// Open (or create) the database at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Preferences ===

    /// Insert or replace the preferences for `prefs.user_id`.
    pub fn upsert_preferences(&self, prefs: &UserPreferences) -> Result<()> {
        let payload = serde_json::to_string(prefs)?;
        self.conn.execute(
            "INSERT INTO preferences (user_id, id, payload, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                id = excluded.id,
                payload = excluded.payload,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at",
            params![
                prefs.user_id,
                prefs.id,
                payload,
                prefs.created_at.to_stored(),
                prefs.updated_at.to_stored(),
            ],
        )?;
        Ok(())
    }

    pub fn get_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        let row = self
            .conn
            .query_row(
                "SELECT payload, created_at, updated_at FROM preferences WHERE user_id = ?1",
                params![user_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)),
            )
            .optional()?;

        let Some((payload, created_at, updated_at)) = row else {
            return Ok(None);
        };
        let mut prefs: UserPreferences = serde_json::from_str(&payload)?;
        prefs.created_at = StoredTimestamp::from_stored("created_at", &created_at);
        prefs.updated_at = StoredTimestamp::from_stored("updated_at", &updated_at);
        Ok(Some(prefs))
    }

    // === Grocery lists ===

    /// Insert or replace the grocery list for `list.user_id`.
    pub fn upsert_grocery_list(&self, list: &GroceryList) -> Result<()> {
        let payload = serde_json::to_string(list)?;
        self.conn.execute(
            "INSERT INTO grocery_lists (user_id, id, payload, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                id = excluded.id,
                payload = excluded.payload,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at",
            params![
                list.user_id,
                list.id,
                payload,
                list.created_at.to_stored(),
                list.updated_at.to_stored(),
            ],
        )?;
        Ok(())
    }

    pub fn get_grocery_list(&self, user_id: &str) -> Result<Option<GroceryList>> {
        let row = self
            .conn
            .query_row(
                "SELECT payload, created_at, updated_at FROM grocery_lists WHERE user_id = ?1",
                params![user_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)),
            )
            .optional()?;

        let Some((payload, created_at, updated_at)) = row else {
            return Ok(None);
        };
        let mut list: GroceryList = serde_json::from_str(&payload)?;
        list.created_at = StoredTimestamp::from_stored("created_at", &created_at);
        list.updated_at = StoredTimestamp::from_stored("updated_at", &updated_at);
        Ok(Some(list))
    }

    // === Weekly schedules ===

    /// Store `schedule`, removing any earlier schedule for the same user and week.
    pub fn replace_schedule(&self, schedule: &WeeklySchedule) -> Result<()> {
        let week = week_key(schedule.week_start);
        let suggestions = serde_json::to_string(&schedule.suggestions)?;

        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute(
            "DELETE FROM weekly_schedules WHERE user_id = ?1 AND week_start = ?2",
            params![schedule.user_id, week],
        )?;
        tx.execute(
            "INSERT INTO weekly_schedules
                (id, user_id, week_start, suggestions, approved_suggestion_id, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                schedule.id,
                schedule.user_id,
                week,
                suggestions,
                schedule.approved_suggestion_id,
                schedule.status.as_str(),
                schedule.created_at.to_stored(),
            ],
        )?;
        tx.commit()?;

        tracing::info!(
            schedule_id = %schedule.id,
            user_id = %schedule.user_id,
            week_start = %week,
            replaced = removed,
            "stored weekly schedule"
        );
        Ok(())
    }

    pub fn get_schedule(&self, schedule_id: &str) -> Result<Option<WeeklySchedule>> {
        let sql = format!(
            "SELECT {} FROM weekly_schedules WHERE id = ?1",
            ScheduleRow::COLUMNS
        );
        self.conn
            .query_row(&sql, params![schedule_id], ScheduleRow::from_row)
            .optional()?
            .map(ScheduleRow::into_schedule)
            .transpose()
    }

    pub fn get_schedule_for_week(
        &self,
        user_id: &str,
        week_start: DateTime<Utc>,
    ) -> Result<Option<WeeklySchedule>> {
        let sql = format!(
            "SELECT {} FROM weekly_schedules WHERE user_id = ?1 AND week_start = ?2",
            ScheduleRow::COLUMNS
        );
        self.conn
            .query_row(&sql, params![user_id, week_key(week_start)], ScheduleRow::from_row)
            .optional()?
            .map(ScheduleRow::into_schedule)
            .transpose()
    }

    /// Record the approved suggestion and status.
    ///
    /// Returns false when no schedule has that id.
    pub fn set_schedule_approval(
        &self,
        schedule_id: &str,
        suggestion_id: &str,
        status: ScheduleStatus,
    ) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE weekly_schedules SET approved_suggestion_id = ?1, status = ?2 WHERE id = ?3",
            params![suggestion_id, status.as_str(), schedule_id],
        )?;
        Ok(changed > 0)
    }
}
