//! Registered applications and their notification settings.

use std::collections::HashMap;

use crate::optional_ext::OptionalExt;
use crate::{Database, DbError};

impl Database {
    /// Register an application with its initial settings. Existing settings
    /// of an already known application are left untouched.
    pub fn add_app(&self, app_id: &str, items: &[(&str, String)]) -> Result<bool, DbError> {
        let now = chrono::Utc::now().timestamp();
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO apps (app_id, created_at) VALUES (?1, ?2)",
                rusqlite::params![app_id, now],
            )? > 0;
            if inserted {
                let mut stmt = tx.prepare(
                    "INSERT OR REPLACE INTO app_settings (app_id, item, value, updated_at)
                     VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)",
                )?;
                for (item, value) in items {
                    stmt.execute(rusqlite::params![app_id, item, value])?;
                }
            }
            tx.commit()?;
            Ok(inserted)
        })
    }

    /// Remove an application; its settings go with it.
    pub fn remove_app(&self, app_id: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM apps WHERE app_id = ?1", [app_id])?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("app {app_id}")));
            }
            Ok(())
        })
    }

    pub fn app_exists(&self, app_id: &str) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let found = conn
                .query_row("SELECT 1 FROM apps WHERE app_id = ?1", [app_id], |_| Ok(()))
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn list_apps(&self) -> Result<Vec<String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT app_id FROM apps ORDER BY app_id")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            let mut apps = Vec::new();
            for row in rows {
                apps.push(row?);
            }
            Ok(apps)
        })
    }

    pub fn get_app_setting(&self, app_id: &str, item: &str) -> Result<Option<String>, DbError> {
        self.with_conn(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM app_settings WHERE app_id = ?1 AND item = ?2",
                    [app_id, item],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    /// Store one item, registering the application on first use.
    pub fn set_app_setting(&self, app_id: &str, item: &str, value: &str) -> Result<(), DbError> {
        let now = chrono::Utc::now().timestamp();
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT OR IGNORE INTO apps (app_id, created_at) VALUES (?1, ?2)",
                rusqlite::params![app_id, now],
            )?;
            tx.execute(
                "INSERT INTO app_settings (app_id, item, value, updated_at) VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
                 ON CONFLICT(app_id, item) DO UPDATE SET value = ?3, updated_at = CURRENT_TIMESTAMP",
                rusqlite::params![app_id, item, value],
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    pub fn get_app_settings(&self, app_id: &str) -> Result<HashMap<String, String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT item, value FROM app_settings WHERE app_id = ?1")?;
            let rows = stmt.query_map([app_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            let mut map = HashMap::new();
            for row in rows {
                let (k, v) = row?;
                map.insert(k, v);
            }
            Ok(map)
        })
    }
}
