//! Database schema definitions and migrations.

use rusqlite::Connection;

use crate::DbError;

pub fn run_migrations(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;
    migrate_notifications_table(conn)?;
    Ok(())
}

/// Early history databases predate the preview and timeout columns.
fn migrate_notifications_table(conn: &Connection) -> Result<(), DbError> {
    if !column_exists(conn, "notifications", "show_preview")? {
        tracing::info!("Adding show_preview column to notifications");
        conn.execute_batch(
            "ALTER TABLE notifications ADD COLUMN show_preview BOOLEAN NOT NULL DEFAULT true;",
        )?;
    }
    if !column_exists(conn, "notifications", "expire_timeout")? {
        tracing::info!("Adding expire_timeout column to notifications");
        conn.execute_batch(
            "ALTER TABLE notifications ADD COLUMN expire_timeout INTEGER NOT NULL DEFAULT -1;",
        )?;
    }
    Ok(())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool, DbError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let exists = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .any(|name| name.as_deref() == Ok(column));
    Ok(exists)
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    setting_type TEXT NOT NULL DEFAULT 'text',
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS apps (
    app_id TEXT PRIMARY KEY,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS app_settings (
    app_id TEXT NOT NULL REFERENCES apps(app_id) ON DELETE CASCADE,
    item TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (app_id, item)
);

CREATE TABLE IF NOT EXISTS notifications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    notify_id INTEGER NOT NULL,
    replaces_id INTEGER NOT NULL DEFAULT 0,
    app_name TEXT NOT NULL,
    app_icon TEXT NOT NULL DEFAULT '',
    summary TEXT NOT NULL DEFAULT '',
    body TEXT NOT NULL DEFAULT '',
    actions_json TEXT NOT NULL DEFAULT '[]',
    hints_json TEXT NOT NULL DEFAULT '{}',
    created_at INTEGER NOT NULL,
    expire_timeout INTEGER NOT NULL DEFAULT -1,
    show_preview BOOLEAN NOT NULL DEFAULT true,
    show_in_history BOOLEAN NOT NULL DEFAULT true
);

CREATE INDEX IF NOT EXISTS idx_notifications_app ON notifications(app_name);
"#;
