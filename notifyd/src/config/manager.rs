//! SettingsManager: DB-backed settings with defaults, env migration and status.

use std::collections::HashMap;

use notify_db::Database;

use super::defaults::DEFAULT_SETTINGS;
use super::validation::validate_setting;
use super::{ConfigStatus, SettingInfo};

/// Wraps [`Database`] to provide high-level settings operations.
#[derive(Clone)]
pub struct SettingsManager {
    db: Database,
}

impl SettingsManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get a setting value. Falls back to default if not in DB.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        if let Some(val) = self.db.get_setting(key)? {
            return Ok(val);
        }
        if let Some(def) = DEFAULT_SETTINGS.get(key) {
            return Ok(def.default.to_string());
        }
        anyhow::bail!("setting not found: {key}");
    }

    /// Set a setting value with validation.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        let def = DEFAULT_SETTINGS
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("unknown setting key: {key}"))?;

        validate_setting(key, value)
            .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;

        self.db.put_setting(&def.row(value))?;
        Ok(())
    }

    /// Validate every entry first, then write them in one transaction.
    pub fn set_settings(&self, values: &HashMap<String, String>) -> Result<(), anyhow::Error> {
        let mut rows = Vec::with_capacity(values.len());
        for (key, value) in values {
            let def = DEFAULT_SETTINGS
                .get(key.as_str())
                .ok_or_else(|| anyhow::anyhow!("unknown setting key: {key}"))?;
            validate_setting(key, value)
                .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
            rows.push(def.row(value));
        }
        self.db.put_settings(&rows)?;
        Ok(())
    }

    /// Get all known settings, filling in defaults for missing keys.
    pub fn get_all_settings(&self) -> Result<HashMap<String, SettingInfo>, anyhow::Error> {
        let db_settings: HashMap<String, String> = self
            .db
            .list_settings()?
            .into_iter()
            .map(|s| (s.key, s.value))
            .collect();
        let result = DEFAULT_SETTINGS
            .iter()
            .map(|(key, def)| {
                let value = db_settings
                    .get(*key)
                    .cloned()
                    .unwrap_or_else(|| def.default.to_string());
                let info = SettingInfo {
                    key: key.to_string(),
                    is_default: value == def.default,
                    value,
                    setting_type: def.setting_type,
                    default: def.default.to_string(),
                    description: def.description.to_string(),
                };
                (key.to_string(), info)
            })
            .collect();
        Ok(result)
    }

    /// Initialize default settings in DB (skip existing).
    pub fn initialize_defaults(&self) -> Result<(), anyhow::Error> {
        let rows: Vec<_> = DEFAULT_SETTINGS.values().map(|d| d.default_row()).collect();
        let added = self.db.insert_missing_settings(&rows)?;
        if added > 0 {
            tracing::debug!(added, "Stored default settings");
        }
        Ok(())
    }

    /// Overwrite the given keys (all keys when empty) with their defaults.
    pub fn reset_settings(&self, keys: &[String]) -> Result<u32, anyhow::Error> {
        let targets: Vec<&str> = if keys.is_empty() {
            DEFAULT_SETTINGS.keys().copied().collect()
        } else {
            keys.iter().map(String::as_str).collect()
        };

        let mut rows = Vec::new();
        for key in targets {
            let Some(def) = DEFAULT_SETTINGS.get(key) else {
                tracing::warn!("Ignoring reset of unknown setting: {key}");
                continue;
            };
            rows.push(def.default_row());
        }
        self.db.put_settings(&rows)?;
        Ok(rows.len() as u32)
    }

    /// Migrate settings from environment variables to DB (one-time).
    pub fn migrate_from_env(&self) -> Result<u32, anyhow::Error> {
        let mut migrated = 0u32;
        for (key, def) in DEFAULT_SETTINGS.iter() {
            if self.db.get_setting(key)?.is_some() {
                continue;
            }
            let Ok(env_val) = std::env::var(key) else {
                continue;
            };
            if env_val.is_empty() {
                continue;
            }
            if let Err(e) = validate_setting(key, &env_val) {
                tracing::warn!("Skipping invalid env setting {key}: {e}");
                continue;
            }
            self.db.put_setting(&def.row(&env_val))?;
            tracing::info!("Migrated setting from env: {key}");
            migrated += 1;
        }
        if migrated > 0 {
            tracing::info!("Migration completed: {migrated} settings migrated");
        }
        Ok(migrated)
    }

    /// Check which delivery features are active.
    pub fn check_status(&self) -> Result<ConfigStatus, anyhow::Error> {
        let is_true = |key: &str| self.get_setting(key).is_ok_and(|v| v == "true");

        let builtin_bubbles = self.get_setting("BUBBLE_MODE")? == "builtin";
        let dnd_active = is_true("DND_MODE");

        let mut warnings = Vec::new();
        if dnd_active {
            warnings.push("DND_MODE is enabled - notifications are stored silently".into());
        }
        if builtin_bubbles && !is_true("DISPLAY_AVAILABLE") {
            warnings
                .push("DISPLAY_AVAILABLE is false - builtin bubbles are suppressed".into());
        }

        Ok(ConfigStatus {
            builtin_bubbles,
            dnd_active,
            warnings,
        })
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}
