//! Resolves settings into a per-notification decision.

use std::collections::BTreeMap;

use chrono::{NaiveTime, Timelike};
use serde_json::Value;
use tracing::debug;

use crate::ports::SettingsStore;
use crate::settings::{AppConfigItem, SystemSettings, parse_time};

/// Senders originating from the desktop shell itself.
pub const DEFAULT_SYSTEM_APPS: &[&str] = &[
    "dde-control-center",
    "dde-osd",
    "dde-session-daemon",
    "dde-session-ui",
    "dde-daemon",
    "deepin-system-monitor",
    "notify-send",
];

/// Action id marking an in-progress transfer.
const CANCEL_ACTION: &str = "cancel";
const VIEW_ACTION_HINT: &str = "x-deepin-action-_view";
const FINALIZE_BEHAVIOR: &str = "xdg-open";

/// What to do with a notification once it has been accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Display { persist: bool },
    StoreOnly,
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyDecision {
    pub enable_notification: bool,
    pub enable_preview: bool,
    pub show_in_history: bool,
    pub play_sound: bool,
    pub lock_screen_show: bool,
    pub do_not_disturb: bool,
    pub is_system_notification: bool,
}

impl PolicyDecision {
    /// Disabled apps are dropped unless they are system senders.
    pub fn accepts(&self) -> bool {
        self.enable_notification || self.is_system_notification
    }

    pub fn disposition(&self, locked: bool) -> Disposition {
        let keep = if self.show_in_history {
            Disposition::StoreOnly
        } else {
            Disposition::Discard
        };
        if self.is_system_notification {
            return Disposition::Display {
                persist: self.show_in_history,
            };
        }
        if locked && !self.lock_screen_show {
            return keep;
        }
        if !self.do_not_disturb && self.enable_notification {
            return Disposition::Display {
                persist: self.show_in_history,
            };
        }
        keep
    }
}

/// Runtime inputs that are not settings.
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext {
    pub locked: bool,
    pub now: NaiveTime,
}

#[derive(Debug, Clone)]
pub struct PolicyEvaluator {
    system_apps: Vec<String>,
}

impl Default for PolicyEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_APPS.iter().map(|s| s.to_string()).collect())
    }
}

impl PolicyEvaluator {
    pub fn new(system_apps: Vec<String>) -> Self {
        Self { system_apps }
    }

    pub fn is_system_app(&self, app_name: &str) -> bool {
        self.system_apps.iter().any(|a| a == app_name)
    }

    pub fn evaluate(
        &self,
        settings: &dyn SettingsStore,
        app_name: &str,
        hints: &BTreeMap<String, Value>,
        actions: &[String],
        ctx: PolicyContext,
    ) -> PolicyDecision {
        let is_system_notification = self.is_system_app(app_name);
        let flag = |item: AppConfigItem| {
            if is_system_notification {
                return true;
            }
            match settings.app_setting(app_name, item).map(|v| v.as_bool()) {
                Ok(Some(value)) => value,
                Ok(None) | Err(_) => {
                    debug!(app = app_name, item = item.key(), "app setting unreadable, assuming true");
                    true
                }
            }
        };

        let enable_notification = flag(AppConfigItem::EnableNotification);
        let enable_preview = flag(AppConfigItem::EnablePreview);
        let show_in_history = flag(AppConfigItem::ShowInHistory);
        let lock_screen_show = flag(AppConfigItem::LockScreenShow);
        let enable_sound = flag(AppConfigItem::EnableSound);

        let system = settings.system_settings().unwrap_or_else(|e| {
            debug!(error = %e, "system settings unreadable, using defaults");
            SystemSettings::default()
        });
        let do_not_disturb = is_do_not_disturb(&system, ctx.locked, ctx.now);

        PolicyDecision {
            enable_notification,
            enable_preview,
            show_in_history,
            play_sound: should_play_sound(
                enable_sound,
                do_not_disturb,
                is_system_notification,
                hints,
                actions,
            ),
            lock_screen_show,
            do_not_disturb,
            is_system_notification,
        }
    }
}

/// Whether do-not-disturb is in effect.
pub fn is_do_not_disturb(system: &SystemSettings, locked: bool, now: NaiveTime) -> bool {
    if !system.dnd_mode {
        return false;
    }
    // master switch without any condition means always on
    if !system.open_by_time_interval && !system.lockscreen_open_dnd {
        return true;
    }
    if system.lockscreen_open_dnd && locked {
        return true;
    }
    system.open_by_time_interval && in_dnd_window(&system.start_time, &system.end_time, now)
}

/// Wall-clock window test; unparsable bounds never match.
pub fn in_dnd_window(start: &str, end: &str, now: NaiveTime) -> bool {
    let (Ok(start), Ok(end)) = (parse_time(start), parse_time(end)) else {
        debug!(start, end, "unparsable dnd window");
        return false;
    };
    let now = truncate_to_minute(now);
    if start < end {
        start <= now && now <= end
    } else if start > end {
        now >= start || now <= end
    } else {
        true
    }
}

/// Windows are compared at minute granularity.
fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

pub fn should_play_sound(
    enable_sound: bool,
    do_not_disturb: bool,
    is_system: bool,
    hints: &BTreeMap<String, Value>,
    actions: &[String],
) -> bool {
    if is_system && do_not_disturb {
        return true;
    }
    if !enable_sound || do_not_disturb {
        return false;
    }
    if actions.iter().any(|a| a == CANCEL_ACTION) {
        return hints
            .get(VIEW_ACTION_HINT)
            .and_then(Value::as_str)
            .is_some_and(|v| v.contains(FINALIZE_BEHAVIOR));
    }
    true
}
