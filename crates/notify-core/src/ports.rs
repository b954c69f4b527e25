//! Interfaces the core needs from its collaborators.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::bubble::geometry::{DockDisplayMode, DockPosition, ScreenState};
use crate::error::{NotifyError, Result};
use crate::events::{CenterCommand, ServiceEvent};
use crate::settings::{
    AppConfigItem, AppInfo, AppSettings, SettingValue, SystemConfigItem, SystemSettings,
};
use crate::types::{Notification, Rect};

/// Durable notification record storage.
///
/// Serialized results are JSON documents.
pub trait HistorySink: Send + Sync {
    /// Store a notification, returning its storage id.
    fn add_one(&self, notification: &Notification) -> Result<String>;
    fn remove_one(&self, storage_id: &str) -> Result<()>;
    fn remove_all(&self) -> Result<()>;
    fn get_all(&self) -> Result<String>;
    fn get_by_id(&self, storage_id: &str) -> Result<String>;
    /// Up to `count` records older than `offset_id` (newest first when empty).
    fn get_from(&self, count: usize, offset_id: &str) -> Result<String>;
    fn get_count(&self) -> Result<u32>;
    fn get_by_storage_id(&self, storage_id: &str) -> Result<Option<Notification>>;
}

/// Typed access to notification settings.
pub trait SettingsStore: Send + Sync {
    /// Fails when the app is unknown or the stored value has the wrong type.
    fn app_setting(&self, app_id: &str, item: AppConfigItem) -> Result<SettingValue>;
    fn set_app_setting(&self, app_id: &str, item: AppConfigItem, value: &SettingValue)
        -> Result<()>;
    fn system_setting(&self, item: SystemConfigItem) -> Result<SettingValue>;
    fn set_system_setting(&self, item: SystemConfigItem, value: &SettingValue) -> Result<()>;
    fn app_list(&self) -> Result<Vec<String>>;
    fn add_app(&self, info: &AppInfo) -> Result<()>;
    fn remove_app(&self, app_id: &str) -> Result<()>;

    fn app_settings(&self, app_id: &str) -> Result<AppSettings> {
        AppSettings::from_lookup(|item| self.app_setting(app_id, item))
    }

    fn system_settings(&self) -> Result<SystemSettings> {
        let text = |item: SystemConfigItem| -> Result<String> {
            self.system_setting(item)?
                .as_text()
                .map(str::to_string)
                .ok_or_else(|| NotifyError::invalid_value(item.key(), "expected a string"))
        };
        let flag = |item: SystemConfigItem| -> Result<bool> {
            self.system_setting(item)?
                .as_bool()
                .ok_or_else(|| NotifyError::invalid_value(item.key(), "expected a boolean"))
        };
        Ok(SystemSettings {
            dnd_mode: flag(SystemConfigItem::DndMode)?,
            lockscreen_open_dnd: flag(SystemConfigItem::LockscreenOpenDnd)?,
            open_by_time_interval: flag(SystemConfigItem::OpenByTimeInterval)?,
            start_time: text(SystemConfigItem::StartTime)?,
            end_time: text(SystemConfigItem::EndTime)?,
            show_icon: flag(SystemConfigItem::ShowIcon)?,
        })
    }
}

/// Display and dock geometry provider.
///
/// `None` means the value could not be queried right now.
pub trait DisplayQuery: Send + Sync {
    fn is_available(&self) -> bool;
    fn primary_display_rect(&self) -> Option<Rect>;
    /// Enabled monitors, in logical pixels.
    fn monitors(&self) -> Vec<Rect> {
        Vec::new()
    }
    fn dock_rect(&self) -> Option<Rect>;
    fn dock_position(&self) -> Option<DockPosition>;
    fn dock_display_mode(&self) -> Option<DockDisplayMode>;
}

/// Opaque id of a bubble view owned by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewHandle(pub u64);

impl std::fmt::Display for ViewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One animated geometry transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Move {
    pub from: Rect,
    pub to: Rect,
    pub duration_ms: u64,
    /// Destroy the view once the move completes.
    pub delete_on_finish: bool,
}

/// Visual layer rendering bubbles and the notification center.
///
/// Calls never block; completion is reported back as
/// [`BubbleEvent::MoveFinished`](crate::events::BubbleEvent::MoveFinished).
pub trait Presentation: Send + Sync {
    fn create_bubble(&self, notification: &Notification) -> ViewHandle;
    fn update_content(&self, handle: ViewHandle, notification: &Notification);
    fn animate_move(&self, handle: ViewHandle, mv: Move);
    /// Place without animation.
    fn set_geometry(&self, handle: ViewHandle, rect: Rect);
    fn set_index(&self, handle: ViewHandle, index: usize);
    fn raise(&self, handle: ViewHandle);
    fn hide(&self, handle: ViewHandle);
    fn close(&self, handle: ViewHandle);
    /// Hand a notification to an external bubble renderer.
    fn show_external(&self, notification: &Notification);
    fn center(&self, command: CenterCommand, screen: &ScreenState);
}

pub trait SoundEffects: Send + Sync {
    fn play_notification(&self);
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ServiceEvent);
}

pub trait Clock: Send + Sync {
    /// Local wall-clock time of day.
    fn local_time(&self) -> NaiveTime;
    fn epoch_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_time(&self) -> NaiveTime {
        let now = chrono::Local::now().time();
        NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now)
    }

    fn epoch_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Whether bubbles are drawn by the built-in queue or an external renderer.
pub trait RuntimeMode: Send + Sync {
    fn builtin_bubbles(&self) -> bool;
    fn set_builtin_bubbles(&self, builtin: bool);
}

/// [`RuntimeMode`] backed by an atomic flag.
#[derive(Debug)]
pub struct ModeFlag(AtomicBool);

impl ModeFlag {
    pub fn new(builtin: bool) -> Self {
        Self(AtomicBool::new(builtin))
    }
}

impl RuntimeMode for ModeFlag {
    fn builtin_bubbles(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn set_builtin_bubbles(&self, builtin: bool) {
        self.0.store(builtin, Ordering::Release);
    }
}
