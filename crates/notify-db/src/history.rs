//! Durable notification history.
//!
//! The row id doubles as the storage id handed back to clients. Listings are
//! newest first.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::optional_ext::OptionalExt;
use crate::{Database, DbError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Storage id; ignored on insert.
    pub id: i64,
    pub notify_id: u32,
    pub replaces_id: u32,
    pub app_name: String,
    pub app_icon: String,
    pub summary: String,
    pub body: String,
    pub actions: Vec<String>,
    pub hints: Value,
    pub created_at: i64,
    pub expire_timeout: i32,
    pub show_preview: bool,
    pub show_in_history: bool,
}

const COLUMNS: &str = "id, notify_id, replaces_id, app_name, app_icon, summary, body,
     actions_json, hints_json, created_at, expire_timeout, show_preview, show_in_history";

fn map_row(row: &rusqlite::Row<'_>) -> Result<NotificationRecord, rusqlite::Error> {
    Ok(NotificationRecord {
        id: row.get(0)?,
        notify_id: row.get(1)?,
        replaces_id: row.get(2)?,
        app_name: row.get(3)?,
        app_icon: row.get(4)?,
        summary: row.get(5)?,
        body: row.get(6)?,
        actions: parse_actions_json(row.get(7)?),
        hints: parse_hints_json(row.get(8)?),
        created_at: row.get(9)?,
        expire_timeout: row.get(10)?,
        show_preview: row.get(11)?,
        show_in_history: row.get(12)?,
    })
}

fn parse_actions_json(raw: String) -> Vec<String> {
    let parsed = serde_json::from_str::<Value>(&raw).unwrap_or(Value::Array(vec![]));
    let Some(items) = parsed.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|value| value.as_str().map(ToOwned::to_owned))
        .collect()
}

fn parse_hints_json(raw: String) -> Value {
    match serde_json::from_str::<Value>(&raw) {
        Ok(value @ Value::Object(_)) => value,
        _ => Value::Object(Default::default()),
    }
}

impl Database {
    /// Store a record and return its storage id.
    pub fn add_notification(&self, record: &NotificationRecord) -> Result<i64, DbError> {
        let actions_json = serde_json::to_string(&record.actions)
            .map_err(|e| DbError::InvalidData(format!("invalid actions: {e}")))?;
        let hints_json = serde_json::to_string(&record.hints)
            .map_err(|e| DbError::InvalidData(format!("invalid hints: {e}")))?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notifications
                    (notify_id, replaces_id, app_name, app_icon, summary, body,
                     actions_json, hints_json, created_at, expire_timeout, show_preview, show_in_history)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                rusqlite::params![
                    record.notify_id,
                    record.replaces_id,
                    record.app_name,
                    record.app_icon,
                    record.summary,
                    record.body,
                    actions_json,
                    hints_json,
                    record.created_at,
                    record.expire_timeout,
                    record.show_preview,
                    record.show_in_history,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Returns false when no such record existed.
    pub fn remove_notification(&self, id: i64) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM notifications WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    pub fn clear_notifications(&self) -> Result<usize, DbError> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM notifications", [])?;
            tracing::debug!(removed, "notification history cleared");
            Ok(removed)
        })
    }

    pub fn get_notification(&self, id: i64) -> Result<Option<NotificationRecord>, DbError> {
        self.with_conn(|conn| {
            let record = conn
                .query_row(
                    &format!("SELECT {COLUMNS} FROM notifications WHERE id = ?1"),
                    [id],
                    map_row,
                )
                .optional()?;
            Ok(record)
        })
    }

    pub fn get_notifications(&self) -> Result<Vec<NotificationRecord>, DbError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM notifications ORDER BY id DESC"))?;
            let rows = stmt.query_map([], map_row)?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
    }

    /// Up to `count` records older than `before`, or the newest ones when
    /// `before` is `None`.
    pub fn get_notifications_before(
        &self,
        count: usize,
        before: Option<i64>,
    ) -> Result<Vec<NotificationRecord>, DbError> {
        let limit = i64::try_from(count).unwrap_or(i64::MAX);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM notifications
                 WHERE ?1 IS NULL OR id < ?1
                 ORDER BY id DESC
                 LIMIT ?2"
            ))?;
            let rows = stmt.query_map(rusqlite::params![before, limit], map_row)?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
    }

    pub fn count_notifications(&self) -> Result<u32, DbError> {
        self.with_conn(|conn| {
            let count: u32 =
                conn.query_row("SELECT COUNT(*) FROM notifications", [], |row| row.get(0))?;
            Ok(count)
        })
    }
}
