
use notify_core::NotificationRequest;
use notify_db::Database;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::app::SharedState;
use crate::config::{AppConfig, SettingsManager};

pub(crate) fn test_db() -> Database {
    Database::open_in_memory().expect("open in-memory db")
}

/// Shared state over an in-memory database with default settings.
pub(crate) fn test_state() -> SharedState {
    let db = test_db();
    let sm = SettingsManager::new(db.clone());
    sm.initialize_defaults().unwrap();
    let dir = std::env::temp_dir().join(format!("notifyd-test-{}", uuid::Uuid::new_v4()));
    let config = AppConfig::load(&sm, &dir).unwrap();
    SharedState::new(db, config, dir)
}

pub(crate) fn request(app: &str) -> NotificationRequest {
    NotificationRequest {
        app_name: app.into(),
        summary: format!("{app} says hi"),
        body: "body".into(),
        expire_timeout: -1,
        ..Default::default()
    }
}

/// Every message broadcast so far, decoded.
pub(crate) fn drain(rx: &mut broadcast::Receiver<String>) -> Vec<Value> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(serde_json::from_str(&msg).unwrap());
    }
    out
}

/// Messages of one type, payload only.
pub(crate) fn of_type(messages: &[Value], kind: &str) -> Vec<Value> {
    messages
        .iter()
        .filter(|m| m["type"] == kind)
        .map(|m| m["data"].clone())
        .collect()
}
