//! Notification data model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Replaces id meaning "this is a new notification".
pub const NO_REPLACE_ID: u32 = 0;

/// An inbound notification request as received from a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationRequest {
    pub app_name: String,
    pub replaces_id: u32,
    pub app_icon: String,
    pub summary: String,
    pub body: String,
    pub actions: Vec<String>,
    pub hints: BTreeMap<String, Value>,
    pub expire_timeout: i32,
}

/// A notification tracked by the daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u32,
    pub replaces_id: u32,
    pub app_name: String,
    pub app_icon: String,
    pub summary: String,
    pub body: String,
    pub actions: Vec<String>,
    pub hints: BTreeMap<String, Value>,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub expire_timeout_ms: i32,
    pub show_preview: bool,
    pub show_in_history: bool,
    /// Set once the notification has been written to history.
    pub storage_id: Option<String>,
}

impl Notification {
    /// Build a notification from a request. Identity is assigned later by the registry.
    pub fn from_request(req: NotificationRequest, created_at: i64) -> Self {
        Self {
            id: 0,
            replaces_id: req.replaces_id,
            app_name: req.app_name,
            app_icon: req.app_icon,
            summary: req.summary,
            body: req.body.replace("\\\\", "\\"),
            actions: req.actions,
            hints: req.hints,
            created_at,
            expire_timeout_ms: req.expire_timeout,
            show_preview: true,
            show_in_history: true,
            storage_id: None,
        }
    }

    /// Whether this entry is the target of a replace request from `app_name`.
    pub fn matches(&self, replaces_id: u32, app_name: &str) -> bool {
        self.replaces_id == replaces_id && self.app_name == app_name
    }

    /// Id reported to clients in `ActionInvoked`.
    pub fn client_id(&self) -> u32 {
        if self.replaces_id == NO_REPLACE_ID {
            self.id
        } else {
            self.replaces_id
        }
    }
}

/// Axis-aligned screen rectangle in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// First row below the rectangle.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, (px, py): (i32, i32)) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Why a notification left the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    Expired,
    Dismissed,
    ActionTaken,
    SupersededByReplace,
    Unknown,
}

impl CloseReason {
    /// Numeric reason code used on the wire.
    pub fn code(self) -> u32 {
        match self {
            Self::Expired => 1,
            Self::Dismissed => 2,
            Self::ActionTaken => 3,
            Self::Unknown => 4,
            Self::SupersededByReplace => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_request_collapses_escaped_backslashes() {
        let req = NotificationRequest {
            app_name: "mail".into(),
            body: r"C:\\Users\\me".into(),
            ..Default::default()
        };
        let n = Notification::from_request(req, 42);
        assert_eq!(n.body, r"C:\Users\me");
        assert_eq!(n.created_at, 42);
        assert!(n.storage_id.is_none());
    }

    #[test]
    fn client_id_prefers_replaces_id() {
        let mut n = Notification::from_request(NotificationRequest::default(), 0);
        n.id = 7;
        assert_eq!(n.client_id(), 7);
        n.replaces_id = 3;
        assert_eq!(n.client_id(), 3);
    }

    #[test]
    fn rect_contains_center() {
        let r = Rect::new(0, 0, 1920, 1080);
        assert!(r.contains(r.center()));
        assert!(!r.contains((1920, 0)));
        assert_eq!(r.bottom(), 1080);
    }
}
