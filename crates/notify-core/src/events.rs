//! Messages flowing in and out of the notification center.

use serde::{Deserialize, Serialize};

use crate::settings::{AppConfigItem, SettingValue, SystemConfigItem};
use crate::types::CloseReason;

/// Lifecycle events emitted to service clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServiceEvent {
    BubbleShown {
        id: u32,
        app_name: String,
        storage_id: Option<String>,
    },
    NotificationClosed {
        id: u32,
        reason: CloseReason,
    },
    ActionInvoked {
        id: u32,
        action_id: String,
    },
    RecordAdded {
        storage_id: String,
    },
    AppConfigChanged {
        app_id: String,
        item: AppConfigItem,
        value: SettingValue,
    },
    SystemConfigChanged {
        item: SystemConfigItem,
        value: SettingValue,
    },
    AppAdded {
        app_id: String,
    },
    AppRemoved {
        app_id: String,
    },
}

/// Desktop-shell state changes that affect presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellEvent {
    DisplayChanged,
    DockChanged,
    SleepStateChanged { sleeping: bool },
    LockChanged { locked: bool },
    SettingChanged { item: SystemConfigItem },
}

/// Reports from the presentation layer about one bubble view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BubbleEvent {
    Expired,
    Dismissed,
    ActionInvoked {
        action_id: String,
    },
    /// The user handled the notification from the bubble.
    Processed {
        #[serde(default)]
        storage_id: Option<String>,
    },
    /// The bubble went away without the user handling it.
    NotProcessedYet {
        #[serde(default)]
        storage_id: Option<String>,
    },
    MoveFinished,
}

/// Outcome reported by an external bubble renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleEndKind {
    Expired,
    Dismissed,
    Unknown,
    Action,
    Processed,
    NotProcessedYet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BubbleEnd {
    pub kind: BubbleEndKind,
    pub id: u32,
    #[serde(default)]
    pub storage_id: Option<String>,
    #[serde(default)]
    pub show_in_history: bool,
    #[serde(default)]
    pub action_id: Option<String>,
}

/// Notification center visibility requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterCommand {
    Toggle,
    Show,
    Hide,
}
