//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

use notify_db::StoredSetting;

use super::SettingKind;

type DefTuple = (&'static str, &'static str, SettingKind, &'static str);

const DEFS: &[DefTuple] = &[
    ("SERVER_PORT", "8080", SettingKind::Int, "HTTP/WebSocket listen port"),
    ("BUBBLE_MODE", "builtin", SettingKind::Text, "Bubble renderer: builtin queue or external"),
    ("BUBBLE_VISIBLE", "3", SettingKind::Int, "Fully visible bubble slots"),
    ("BUBBLE_OVERLAP", "2", SettingKind::Int, "Stacked slots behind the visible bubbles"),
    ("BUBBLE_WIDTH", "600", SettingKind::Int, "Bubble width in logical pixels"),
    ("BUBBLE_HEIGHT", "90", SettingKind::Int, "Bubble height in logical pixels"),
    ("SCREEN_PADDING", "20", SettingKind::Int, "Gap between the screen edge and the first bubble"),
    ("BUBBLE_MARGIN", "12", SettingKind::Int, "Gap between stacked bubbles"),
    ("ANIMATION_MS", "300", SettingKind::Int, "Base bubble animation time"),
    ("CENTER_DEBOUNCE_MS", "300", SettingKind::Int, "Ignore center toggles closer than this"),
    ("DISPLAY_AVAILABLE", "true", SettingKind::Bool, "Whether a display is attached"),
    ("DISPLAY_RECT", "0,0,1920,1080", SettingKind::Text, "Primary display as x,y,width,height"),
    ("MONITORS", "", SettingKind::Text, "Enabled monitors as x,y,w,h separated by ';'"),
    ("DOCK_RECT", "0,1040,1920,40", SettingKind::Text, "Dock frame as x,y,width,height"),
    ("DOCK_POSITION", "bottom", SettingKind::Text, "Dock edge: top, right, bottom or left"),
    ("DOCK_MODE", "fashion", SettingKind::Text, "Dock display mode: fashion or efficient"),
    (
        "SYSTEM_APPS",
        "dde-control-center,dde-osd,dde-session-daemon,dde-session-ui,dde-daemon,deepin-system-monitor,notify-send",
        SettingKind::Text,
        "Comma separated senders that bypass per-app switches",
    ),
    ("ICON_CACHE_DIR", "", SettingKind::Text, "Cached notification icons (empty: <data dir>/icons)"),
    ("DND_MODE", "false", SettingKind::Bool, "Do not disturb"),
    ("LOCKSCREEN_OPEN_DND", "false", SettingKind::Bool, "Do not disturb while the screen is locked"),
    ("OPEN_BY_TIME_INTERVAL", "false", SettingKind::Bool, "Do not disturb only inside the time window"),
    ("DND_START_TIME", "22:00", SettingKind::Text, "Do not disturb window start (HH:MM)"),
    ("DND_END_TIME", "07:00", SettingKind::Text, "Do not disturb window end (HH:MM)"),
    ("SHOW_ICON", "true", SettingKind::Bool, "Show the tray icon"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub setting_type: SettingKind,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, setting_type, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    setting_type,
                    description,
                },
            )
        })
        .collect()
});

impl SettingDef {
    /// The default as a storable row.
    pub fn default_row(&self) -> StoredSetting {
        StoredSetting::new(self.key, self.default, self.setting_type)
    }

    pub fn row(&self, value: &str) -> StoredSetting {
        StoredSetting::new(self.key, value, self.setting_type)
    }
}

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_setting;

    #[test]
    fn every_default_passes_validation() {
        for def in DEFAULT_SETTINGS.values() {
            assert!(
                validate_setting(def.key, def.default).is_ok(),
                "default for {} is invalid",
                def.key
            );
        }
    }

    #[test]
    fn system_items_have_defaults() {
        for item in notify_core::settings::SystemConfigItem::ALL {
            assert!(get_default(item.key()).is_some(), "{} missing", item.key());
        }
    }
}
