//! Database schema migrations for grocery-planner.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn)?;
    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist.
fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> SqliteResult<i32> {
    let version = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0)
        })
        .optional()?
        .flatten();
    Ok(version.unwrap_or(0))
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: preferences, grocery lists and weekly schedules.
///
/// Preferences and grocery lists hold one JSON payload per user. Schedules
/// keep their suggestions as JSON and are unique per user and week.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS preferences (
            user_id     TEXT PRIMARY KEY,
            id          TEXT NOT NULL,
            payload     TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS grocery_lists (
            user_id     TEXT PRIMARY KEY,
            id          TEXT NOT NULL,
            payload     TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS weekly_schedules (
            id                      TEXT PRIMARY KEY,
            user_id                 TEXT NOT NULL,
            week_start              TEXT NOT NULL,
            suggestions             TEXT NOT NULL,
            approved_suggestion_id  TEXT,
            status                  TEXT NOT NULL DEFAULT 'pending',
            created_at              TEXT NOT NULL,
            UNIQUE (user_id, week_start)
        );

        CREATE INDEX IF NOT EXISTS idx_weekly_schedules_user ON weekly_schedules(user_id);",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()
}
