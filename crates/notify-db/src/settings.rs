//! Typed daemon settings rows.
//!
//! Each row carries the value kind next to the raw text so readers can tell a
//! flag from a number without consulting the defaults table.

use serde::{Deserialize, Serialize};

use crate::optional_ext::OptionalExt;
use crate::{Database, DbError};

/// Value kind stored in `settings.setting_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    Bool,
    Int,
    Text,
}

impl SettingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Text => "text",
        }
    }

    /// Unknown kinds read back as text.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "bool" => Self::Bool,
            "int" => Self::Int,
            _ => Self::Text,
        }
    }
}

/// One row of the `settings` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSetting {
    pub key: String,
    pub value: String,
    pub kind: SettingKind,
}

impl StoredSetting {
    pub fn new(key: impl Into<String>, value: impl Into<String>, kind: SettingKind) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind,
        }
    }
}

const UPSERT: &str = "INSERT INTO settings (key, value, setting_type, updated_at)
     VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
     ON CONFLICT(key) DO UPDATE SET value = ?2, setting_type = ?3, updated_at = CURRENT_TIMESTAMP";

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, DbError> {
        self.with_conn(|conn| {
            let value = conn
                .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                    row.get::<_, String>(0)
                })
                .optional()?;
            Ok(value)
        })
    }

    pub fn put_setting(&self, setting: &StoredSetting) -> Result<(), DbError> {
        self.put_settings(std::slice::from_ref(setting))
    }

    /// Upsert every row in one transaction; either all land or none.
    pub fn put_settings(&self, settings: &[StoredSetting]) -> Result<(), DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(UPSERT)?;
                for s in settings {
                    stmt.execute(rusqlite::params![s.key, s.value, s.kind.as_str()])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// Insert rows whose key is not stored yet. Returns how many were added.
    pub fn insert_missing_settings(&self, settings: &[StoredSetting]) -> Result<usize, DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut added = 0;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR IGNORE INTO settings (key, value, setting_type, updated_at)
                     VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)",
                )?;
                for s in settings {
                    added += stmt.execute(rusqlite::params![s.key, s.value, s.kind.as_str()])?;
                }
            }
            tx.commit()?;
            Ok(added)
        })
    }

    /// All stored rows, ordered by key.
    pub fn list_settings(&self) -> Result<Vec<StoredSetting>, DbError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT key, value, setting_type FROM settings ORDER BY key")?;
            let rows = stmt.query_map([], |row| {
                Ok(StoredSetting {
                    key: row.get(0)?,
                    value: row.get(1)?,
                    kind: SettingKind::parse(&row.get::<_, String>(2)?),
                })
            })?;
            let mut settings = Vec::new();
            for row in rows {
                settings.push(row?);
            }
            Ok(settings)
        })
    }
}
