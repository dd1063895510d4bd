//! Metadata timestamps that survive partially-migrated rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A `created_at`/`updated_at` value as read back from storage.
///
/// Rows written by older builds may carry timestamps in formats this build
/// cannot parse. Those are kept verbatim instead of failing the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredTimestamp {
    Parsed(DateTime<Utc>),
    Raw(String),
}

impl StoredTimestamp {
    pub fn now() -> Self {
        StoredTimestamp::Parsed(Utc::now())
    }

    /// Parse a persisted RFC 3339 string, keeping it raw on failure.
    pub fn from_stored(field: &'static str, value: &str) -> Self {
        match DateTime::parse_from_rfc3339(value) {
            Ok(dt) => StoredTimestamp::Parsed(dt.with_timezone(&Utc)),
            Err(err) => {
                tracing::warn!(field, value, error = %err, "keeping unparseable timestamp as raw string");
                StoredTimestamp::Raw(value.to_string())
            }
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredTimestamp::Parsed(dt) => Some(*dt),
            StoredTimestamp::Raw(_) => None,
        }
    }

    /// String form used when writing the value back to storage.
    pub fn to_stored(&self) -> String {
        match self {
            StoredTimestamp::Parsed(dt) => dt.to_rfc3339(),
            StoredTimestamp::Raw(raw) => raw.clone(),
        }
    }
}

impl Default for StoredTimestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for StoredTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        StoredTimestamp::Parsed(dt)
    }
}
