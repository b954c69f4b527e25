//! Implementations of the core collaborator traits for the daemon.
//!
//! Storage goes to SQLite through [`notify_db`]; everything visual or audible
//! is broadcast to WebSocket clients, which render bubbles and play sounds.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use notify_core::bubble::{DockDisplayMode, DockPosition, ScreenState};
use notify_core::ports::{
    DisplayQuery, EventSink, HistorySink, Move, Presentation, SettingsStore, SoundEffects,
    ViewHandle,
};
use notify_core::settings::{AppConfigItem, AppInfo, AppSettings, SettingValue, SystemConfigItem};
use notify_core::{CenterCommand, Notification, NotifyError, Rect, Result, ServiceEvent};
use notify_db::{Database, DbError, NotificationRecord};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::config::SettingsManager;
use crate::config::validation::{parse_rect, parse_rect_list};
use crate::events;

// -- History --

/// History backed by the `notifications` table. Storage ids are row ids.
pub struct DbHistory {
    db: Database,
    icon_cache_dir: PathBuf,
}

impl DbHistory {
    pub fn new(db: Database, icon_cache_dir: PathBuf) -> Self {
        Self { db, icon_cache_dir }
    }

    fn parse_id(storage_id: &str) -> Result<i64> {
        storage_id
            .trim()
            .parse()
            .map_err(|_| NotifyError::RecordNotFound(storage_id.to_string()))
    }

    fn remove_cached_icon(&self, storage_id: &str) {
        let path = self.icon_cache_dir.join(format!("{storage_id}.png"));
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed cached icon"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), "Failed to remove cached icon: {e}"),
        }
    }

    fn clear_icon_cache(&self) {
        match std::fs::remove_dir_all(&self.icon_cache_dir) {
            Ok(()) => tracing::debug!("Icon cache cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to clear icon cache: {e}"),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(NotifyError::storage)
}

pub fn record_from_notification(n: &Notification) -> NotificationRecord {
    NotificationRecord {
        id: 0,
        notify_id: n.id,
        replaces_id: n.replaces_id,
        app_name: n.app_name.clone(),
        app_icon: n.app_icon.clone(),
        summary: n.summary.clone(),
        body: n.body.clone(),
        actions: n.actions.clone(),
        hints: Value::Object(n.hints.clone().into_iter().collect()),
        created_at: n.created_at,
        expire_timeout: n.expire_timeout_ms,
        show_preview: n.show_preview,
        show_in_history: n.show_in_history,
    }
}

pub fn notification_from_record(record: NotificationRecord) -> Notification {
    let hints: BTreeMap<String, Value> = match record.hints {
        Value::Object(map) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    };
    Notification {
        id: record.notify_id,
        replaces_id: record.replaces_id,
        app_name: record.app_name,
        app_icon: record.app_icon,
        summary: record.summary,
        body: record.body,
        actions: record.actions,
        hints,
        created_at: record.created_at,
        expire_timeout_ms: record.expire_timeout,
        show_preview: record.show_preview,
        show_in_history: record.show_in_history,
        storage_id: Some(record.id.to_string()),
    }
}

impl HistorySink for DbHistory {
    fn add_one(&self, notification: &Notification) -> Result<String> {
        let id = self
            .db
            .add_notification(&record_from_notification(notification))
            .map_err(NotifyError::storage)?;
        Ok(id.to_string())
    }

    fn remove_one(&self, storage_id: &str) -> Result<()> {
        let removed = self
            .db
            .remove_notification(Self::parse_id(storage_id)?)
            .map_err(NotifyError::storage)?;
        if !removed {
            return Err(NotifyError::RecordNotFound(storage_id.to_string()));
        }
        self.remove_cached_icon(storage_id);
        Ok(())
    }

    fn remove_all(&self) -> Result<()> {
        let removed = self.db.clear_notifications().map_err(NotifyError::storage)?;
        tracing::info!(removed, "Notification history cleared");
        self.clear_icon_cache();
        Ok(())
    }

    fn get_all(&self) -> Result<String> {
        to_json(&self.db.get_notifications().map_err(NotifyError::storage)?)
    }

    fn get_by_id(&self, storage_id: &str) -> Result<String> {
        let record = self
            .db
            .get_notification(Self::parse_id(storage_id)?)
            .map_err(NotifyError::storage)?
            .ok_or_else(|| NotifyError::RecordNotFound(storage_id.to_string()))?;
        to_json(&record)
    }

    fn get_from(&self, count: usize, offset_id: &str) -> Result<String> {
        let before = match offset_id.trim() {
            "" | "-1" => None,
            raw => Some(raw.parse::<i64>().map_err(|_| {
                NotifyError::invalid_value("offset", format!("'{raw}' is not a storage id"))
            })?),
        };
        let records = self
            .db
            .get_notifications_before(count, before)
            .map_err(NotifyError::storage)?;
        to_json(&records)
    }

    fn get_count(&self) -> Result<u32> {
        self.db.count_notifications().map_err(NotifyError::storage)
    }

    fn get_by_storage_id(&self, storage_id: &str) -> Result<Option<Notification>> {
        let Ok(id) = Self::parse_id(storage_id) else {
            return Ok(None);
        };
        let record = self.db.get_notification(id).map_err(NotifyError::storage)?;
        Ok(record.map(notification_from_record))
    }
}

// -- Settings --

/// Per-app settings from the `app_settings` table, system items from the
/// daemon settings table.
pub struct DbSettings {
    sm: SettingsManager,
}

impl DbSettings {
    pub fn new(sm: SettingsManager) -> Self {
        Self { sm }
    }
}

fn decode(key: &str, raw: &str, is_bool: bool) -> Result<SettingValue> {
    SettingValue::from_storage(raw, is_bool).ok_or_else(|| {
        NotifyError::invalid_value(key, format!("stored value '{raw}' has the wrong type"))
    })
}

impl SettingsStore for DbSettings {
    fn app_setting(&self, app_id: &str, item: AppConfigItem) -> Result<SettingValue> {
        let raw = self
            .sm
            .db()
            .get_app_setting(app_id, item.key())
            .map_err(NotifyError::storage)?
            .ok_or_else(|| {
                NotifyError::invalid_value(item.key(), format!("no value for {app_id}"))
            })?;
        decode(item.key(), &raw, item.is_bool())
    }

    fn set_app_setting(
        &self,
        app_id: &str,
        item: AppConfigItem,
        value: &SettingValue,
    ) -> Result<()> {
        self.sm
            .db()
            .set_app_setting(app_id, item.key(), &value.to_storage())
            .map_err(NotifyError::storage)
    }

    fn system_setting(&self, item: SystemConfigItem) -> Result<SettingValue> {
        let raw = self
            .sm
            .get_setting(item.key())
            .map_err(NotifyError::storage)?;
        decode(item.key(), &raw, item.is_bool())
    }

    fn set_system_setting(&self, item: SystemConfigItem, value: &SettingValue) -> Result<()> {
        self.sm
            .set_setting(item.key(), &value.to_storage())
            .map_err(|e| NotifyError::invalid_value(item.key(), e.to_string()))
    }

    /// One query for the whole view.
    fn app_settings(&self, app_id: &str) -> Result<AppSettings> {
        let db = self.sm.db();
        if !db.app_exists(app_id).map_err(NotifyError::storage)? {
            return Err(NotifyError::invalid_value(
                AppConfigItem::AppName.key(),
                format!("unknown app {app_id}"),
            ));
        }
        let stored = db.get_app_settings(app_id).map_err(NotifyError::storage)?;
        AppSettings::from_lookup(|item| {
            let raw = stored.get(item.key()).ok_or_else(|| {
                NotifyError::invalid_value(item.key(), format!("no value for {app_id}"))
            })?;
            decode(item.key(), raw, item.is_bool())
        })
    }

    fn app_list(&self) -> Result<Vec<String>> {
        self.sm.db().list_apps().map_err(NotifyError::storage)
    }

    fn add_app(&self, info: &AppInfo) -> Result<()> {
        let items: Vec<(&str, String)> = AppSettings::for_new_app(info)
            .entries()
            .into_iter()
            .map(|(item, value)| (item.key(), value.to_storage()))
            .collect();
        let inserted = self
            .sm
            .db()
            .add_app(&info.id, &items)
            .map_err(NotifyError::storage)?;
        if !inserted {
            tracing::debug!(app = %info.id, "App already registered, settings kept");
        }
        Ok(())
    }

    fn remove_app(&self, app_id: &str) -> Result<()> {
        match self.sm.db().remove_app(app_id) {
            Ok(()) => Ok(()),
            Err(DbError::NotFound(_)) => Err(NotifyError::RecordNotFound(app_id.to_string())),
            Err(e) => Err(NotifyError::storage(e)),
        }
    }
}

// -- Display --

/// Display and dock geometry taken from the daemon settings, re-read on
/// every query so updates apply on the next refresh.
pub struct SettingsDisplay {
    sm: SettingsManager,
}

impl SettingsDisplay {
    pub fn new(sm: SettingsManager) -> Self {
        Self { sm }
    }

    fn get(&self, key: &str) -> Option<String> {
        match self.sm.get_setting(key) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Display query failed for {key}: {e}");
                None
            }
        }
    }
}

impl DisplayQuery for SettingsDisplay {
    fn is_available(&self) -> bool {
        self.get("DISPLAY_AVAILABLE").is_some_and(|v| v == "true")
    }

    fn primary_display_rect(&self) -> Option<Rect> {
        parse_rect(&self.get("DISPLAY_RECT")?)
    }

    fn monitors(&self) -> Vec<Rect> {
        self.get("MONITORS")
            .and_then(|v| parse_rect_list(&v))
            .unwrap_or_default()
    }

    fn dock_rect(&self) -> Option<Rect> {
        parse_rect(&self.get("DOCK_RECT")?)
    }

    fn dock_position(&self) -> Option<DockPosition> {
        match self.get("DOCK_POSITION")?.as_str() {
            "top" => Some(DockPosition::Top),
            "right" => Some(DockPosition::Right),
            "bottom" => Some(DockPosition::Bottom),
            "left" => Some(DockPosition::Left),
            _ => None,
        }
    }

    fn dock_display_mode(&self) -> Option<DockDisplayMode> {
        match self.get("DOCK_MODE")?.as_str() {
            "fashion" => Some(DockDisplayMode::Fashion),
            "efficient" => Some(DockDisplayMode::Efficient),
            _ => None,
        }
    }
}

// -- Presentation --

/// Commands for the bubble renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BubbleCommand<'a> {
    Create {
        handle: ViewHandle,
        notification: &'a Notification,
    },
    Update {
        handle: ViewHandle,
        notification: &'a Notification,
    },
    Move {
        handle: ViewHandle,
        #[serde(flatten)]
        mv: Move,
    },
    Geometry {
        handle: ViewHandle,
        rect: Rect,
    },
    Index {
        handle: ViewHandle,
        index: usize,
    },
    Raise {
        handle: ViewHandle,
    },
    Hide {
        handle: ViewHandle,
    },
    Close {
        handle: ViewHandle,
    },
    External {
        notification: &'a Notification,
    },
}

#[derive(Debug, Clone, Serialize)]
struct CenterPayload<'a> {
    command: CenterCommand,
    screen: &'a ScreenState,
}

/// Renders bubbles by broadcasting view commands over the WebSocket.
pub struct BroadcastPresentation {
    tx: broadcast::Sender<String>,
    next_handle: AtomicU64,
}

impl BroadcastPresentation {
    pub fn new(tx: broadcast::Sender<String>) -> Self {
        Self {
            tx,
            next_handle: AtomicU64::new(0),
        }
    }

    fn send(&self, command: BubbleCommand<'_>) {
        events::broadcast(&self.tx, events::BUBBLE_COMMAND, command);
    }
}

impl Presentation for BroadcastPresentation {
    fn create_bubble(&self, notification: &Notification) -> ViewHandle {
        let handle = ViewHandle(self.next_handle.fetch_add(1, Ordering::Relaxed) + 1);
        self.send(BubbleCommand::Create {
            handle,
            notification,
        });
        handle
    }

    fn update_content(&self, handle: ViewHandle, notification: &Notification) {
        self.send(BubbleCommand::Update {
            handle,
            notification,
        });
    }

    fn animate_move(&self, handle: ViewHandle, mv: Move) {
        self.send(BubbleCommand::Move { handle, mv });
    }

    fn set_geometry(&self, handle: ViewHandle, rect: Rect) {
        self.send(BubbleCommand::Geometry { handle, rect });
    }

    fn set_index(&self, handle: ViewHandle, index: usize) {
        self.send(BubbleCommand::Index { handle, index });
    }

    fn raise(&self, handle: ViewHandle) {
        self.send(BubbleCommand::Raise { handle });
    }

    fn hide(&self, handle: ViewHandle) {
        self.send(BubbleCommand::Hide { handle });
    }

    fn close(&self, handle: ViewHandle) {
        self.send(BubbleCommand::Close { handle });
    }

    fn show_external(&self, notification: &Notification) {
        self.send(BubbleCommand::External { notification });
    }

    fn center(&self, command: CenterCommand, screen: &ScreenState) {
        events::broadcast(
            &self.tx,
            events::CENTER_COMMAND,
            CenterPayload { command, screen },
        );
    }
}

// -- Sound & events --

pub struct BroadcastSound {
    tx: broadcast::Sender<String>,
}

impl BroadcastSound {
    pub fn new(tx: broadcast::Sender<String>) -> Self {
        Self { tx }
    }
}

impl SoundEffects for BroadcastSound {
    fn play_notification(&self) {
        events::broadcast(
            &self.tx,
            events::PLAY_SOUND,
            serde_json::json!({ "sound": "message" }),
        );
    }
}

pub struct BroadcastEvents {
    tx: broadcast::Sender<String>,
}

impl BroadcastEvents {
    pub fn new(tx: broadcast::Sender<String>) -> Self {
        Self { tx }
    }
}

impl EventSink for BroadcastEvents {
    fn emit(&self, event: ServiceEvent) {
        tracing::debug!(?event, "Service event");
        events::broadcast(&self.tx, events::NOTIFICATION_EVENT, event);
    }
}
