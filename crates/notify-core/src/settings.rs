//! Per-application and system-wide notification settings.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{NotifyError, Result};

/// Wall-clock format used by the DND window settings.
pub const TIME_FORMAT: &str = "%H:%M";

/// Per-application configuration items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppConfigItem {
    AppName,
    AppIcon,
    EnableNotification,
    EnablePreview,
    EnableSound,
    ShowInHistory,
    LockScreenShow,
    ShowOnTop,
}

impl AppConfigItem {
    pub const ALL: [Self; 8] = [
        Self::AppName,
        Self::AppIcon,
        Self::EnableNotification,
        Self::EnablePreview,
        Self::EnableSound,
        Self::ShowInHistory,
        Self::LockScreenShow,
        Self::ShowOnTop,
    ];

    /// Storage key.
    pub fn key(self) -> &'static str {
        match self {
            Self::AppName => "app-name",
            Self::AppIcon => "app-icon",
            Self::EnableNotification => "enable-notification",
            Self::EnablePreview => "enable-preview",
            Self::EnableSound => "enable-sound",
            Self::ShowInHistory => "show-in-notification-center",
            Self::LockScreenShow => "lockscreen-show-notification",
            Self::ShowOnTop => "show-on-top",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.key() == key)
    }

    pub fn is_bool(self) -> bool {
        !matches!(self, Self::AppName | Self::AppIcon)
    }

    pub fn validate(self, value: &SettingValue) -> Result<()> {
        check_kind(self.key(), self.is_bool(), value)
    }
}

impl TryFrom<u32> for AppConfigItem {
    type Error = NotifyError;

    fn try_from(value: u32) -> Result<Self> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(NotifyError::InvalidConfigItem(value))
    }
}

/// System-wide configuration items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemConfigItem {
    DndMode,
    LockscreenOpenDnd,
    OpenByTimeInterval,
    StartTime,
    EndTime,
    ShowIcon,
}

impl SystemConfigItem {
    pub const ALL: [Self; 6] = [
        Self::DndMode,
        Self::LockscreenOpenDnd,
        Self::OpenByTimeInterval,
        Self::StartTime,
        Self::EndTime,
        Self::ShowIcon,
    ];

    /// Key in the daemon settings table.
    pub fn key(self) -> &'static str {
        match self {
            Self::DndMode => "DND_MODE",
            Self::LockscreenOpenDnd => "LOCKSCREEN_OPEN_DND",
            Self::OpenByTimeInterval => "OPEN_BY_TIME_INTERVAL",
            Self::StartTime => "DND_START_TIME",
            Self::EndTime => "DND_END_TIME",
            Self::ShowIcon => "SHOW_ICON",
        }
    }

    pub fn is_bool(self) -> bool {
        !matches!(self, Self::StartTime | Self::EndTime)
    }

    pub fn validate(self, value: &SettingValue) -> Result<()> {
        check_kind(self.key(), self.is_bool(), value)?;
        if let SettingValue::Text(text) = value {
            parse_time(text).map_err(|reason| NotifyError::invalid_value(self.key(), reason))?;
        }
        Ok(())
    }
}

impl TryFrom<u32> for SystemConfigItem {
    type Error = NotifyError;

    fn try_from(value: u32) -> Result<Self> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(NotifyError::InvalidConfigItem(value))
    }
}

/// A typed setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Text(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Bool(_) => None,
        }
    }

    /// Encode for string storage.
    pub fn to_storage(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Decode from string storage for an item of the given kind.
    pub fn from_storage(raw: &str, is_bool: bool) -> Option<Self> {
        if !is_bool {
            return Some(Self::Text(raw.to_string()));
        }
        match raw {
            "true" => Some(Self::Bool(true)),
            "false" => Some(Self::Bool(false)),
            _ => None,
        }
    }
}

fn check_kind(key: &str, want_bool: bool, value: &SettingValue) -> Result<()> {
    match (want_bool, value) {
        (true, SettingValue::Bool(_)) | (false, SettingValue::Text(_)) => Ok(()),
        (true, _) => Err(NotifyError::invalid_value(key, "expected a boolean")),
        (false, _) => Err(NotifyError::invalid_value(key, "expected a string")),
    }
}

/// Parse an `HH:MM` wall-clock time.
pub fn parse_time(text: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(text.trim(), TIME_FORMAT)
        .map_err(|e| format!("'{text}' is not a HH:MM time ({e})"))
}

/// An application known to the settings store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

/// All settings of one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub app_name: String,
    pub app_icon: String,
    pub enable_notification: bool,
    pub enable_preview: bool,
    pub enable_sound: bool,
    pub show_in_history: bool,
    pub lock_screen_show: bool,
    pub show_on_top: bool,
}

impl AppSettings {
    /// Settings assigned to a newly registered application.
    pub fn for_new_app(info: &AppInfo) -> Self {
        Self {
            app_name: info.name.clone(),
            app_icon: info.icon.clone(),
            enable_notification: true,
            enable_preview: true,
            enable_sound: true,
            show_in_history: true,
            lock_screen_show: true,
            show_on_top: false,
        }
    }

    pub fn get(&self, item: AppConfigItem) -> SettingValue {
        match item {
            AppConfigItem::AppName => SettingValue::Text(self.app_name.clone()),
            AppConfigItem::AppIcon => SettingValue::Text(self.app_icon.clone()),
            AppConfigItem::EnableNotification => SettingValue::Bool(self.enable_notification),
            AppConfigItem::EnablePreview => SettingValue::Bool(self.enable_preview),
            AppConfigItem::EnableSound => SettingValue::Bool(self.enable_sound),
            AppConfigItem::ShowInHistory => SettingValue::Bool(self.show_in_history),
            AppConfigItem::LockScreenShow => SettingValue::Bool(self.lock_screen_show),
            AppConfigItem::ShowOnTop => SettingValue::Bool(self.show_on_top),
        }
    }

    /// Build from a per-item lookup. Each value must have its item's kind.
    pub fn from_lookup(
        mut lookup: impl FnMut(AppConfigItem) -> Result<SettingValue>,
    ) -> Result<Self> {
        let mut settings = Self::for_new_app(&AppInfo {
            id: String::new(),
            name: String::new(),
            icon: String::new(),
        });
        for item in AppConfigItem::ALL {
            settings.set(item, lookup(item)?)?;
        }
        Ok(settings)
    }

    fn set(&mut self, item: AppConfigItem, value: SettingValue) -> Result<()> {
        check_kind(item.key(), item.is_bool(), &value)?;
        match (item, value) {
            (AppConfigItem::AppName, SettingValue::Text(v)) => self.app_name = v,
            (AppConfigItem::AppIcon, SettingValue::Text(v)) => self.app_icon = v,
            (AppConfigItem::EnableNotification, SettingValue::Bool(v)) => {
                self.enable_notification = v
            }
            (AppConfigItem::EnablePreview, SettingValue::Bool(v)) => self.enable_preview = v,
            (AppConfigItem::EnableSound, SettingValue::Bool(v)) => self.enable_sound = v,
            (AppConfigItem::ShowInHistory, SettingValue::Bool(v)) => self.show_in_history = v,
            (AppConfigItem::LockScreenShow, SettingValue::Bool(v)) => self.lock_screen_show = v,
            (AppConfigItem::ShowOnTop, SettingValue::Bool(v)) => self.show_on_top = v,
            (item, _) => return Err(NotifyError::invalid_value(item.key(), "wrong value kind")),
        }
        Ok(())
    }

    /// Flatten into `(item, value)` pairs.
    pub fn entries(&self) -> Vec<(AppConfigItem, SettingValue)> {
        AppConfigItem::ALL
            .into_iter()
            .map(|item| (item, self.get(item)))
            .collect()
    }
}

/// System-wide notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub dnd_mode: bool,
    pub lockscreen_open_dnd: bool,
    pub open_by_time_interval: bool,
    pub start_time: String,
    pub end_time: String,
    pub show_icon: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            dnd_mode: false,
            lockscreen_open_dnd: false,
            open_by_time_interval: false,
            start_time: "22:00".into(),
            end_time: "07:00".into(),
            show_icon: true,
        }
    }
}

impl SystemSettings {
    pub fn get(&self, item: SystemConfigItem) -> SettingValue {
        match item {
            SystemConfigItem::DndMode => SettingValue::Bool(self.dnd_mode),
            SystemConfigItem::LockscreenOpenDnd => SettingValue::Bool(self.lockscreen_open_dnd),
            SystemConfigItem::OpenByTimeInterval => {
                SettingValue::Bool(self.open_by_time_interval)
            }
            SystemConfigItem::StartTime => SettingValue::Text(self.start_time.clone()),
            SystemConfigItem::EndTime => SettingValue::Text(self.end_time.clone()),
            SystemConfigItem::ShowIcon => SettingValue::Bool(self.show_icon),
        }
    }

    pub fn entries(&self) -> Vec<(SystemConfigItem, SettingValue)> {
        SystemConfigItem::ALL
            .into_iter()
            .map(|item| (item, self.get(item)))
            .collect()
    }
}
