//! TOML-based application configuration.
//!
//! Holds:
//! - Slot generator tuning (step, cap, confidence scores)
//! - The store directory and placeholder travel estimate
//! - Fixture calendar events
//! - Log filter used by the CLI
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::providers::{FixedTravelTime, FixtureCalendar, StoreDirectory};
use crate::scheduler::{SchedulerConfig, SlotGenerator};
use crate::schedule::{CalendarEvent, GroceryStore};

/// Store lookup and travel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoresConfig {
    /// How many directory entries count as "nearby"
    #[serde(default = "default_nearby_limit")]
    pub nearby_limit: usize,
    /// Placeholder travel estimate for every store (minutes)
    #[serde(default = "default_travel_minutes")]
    pub travel_minutes: i64,
    #[serde(default = "StoreDirectory::default_stores")]
    pub directory: Vec<GroceryStore>,
}

/// Events served by the fixture calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` overrides it.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub stores: StoresConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_nearby_limit() -> usize {
    2
}
fn default_travel_minutes() -> i64 {
    15
}
fn default_log_filter() -> String {
    "warn".into()
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            nearby_limit: default_nearby_limit(),
            travel_minutes: default_travel_minutes(),
            directory: StoreDirectory::default_stores(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Default config file location.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result is not a valid configuration.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.scheduler.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and save to the default location.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }

    pub fn store_directory(&self) -> StoreDirectory {
        StoreDirectory::new(self.stores.directory.clone(), self.stores.nearby_limit)
    }

    /// Slot generator wired to the configured placeholder providers.
    pub fn generator(&self) -> SlotGenerator {
        SlotGenerator::new(
            FixtureCalendar::new(self.calendar.events.clone()),
            self.store_directory(),
            FixedTravelTime::new(self.stores.travel_minutes),
        )
        .with_config(self.scheduler.clone())
    }
}
