//! WebSocket message types broadcast to connected clients.
//!
//! Every message is a JSON object `{"type": <name>, "data": <payload>}`.

use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast;

// -- Message type constants --

pub const CONNECTED: &str = "connected";
pub const PONG: &str = "pong";
/// A [`notify_core::ServiceEvent`] for notification clients.
pub const NOTIFICATION_EVENT: &str = "notification_event";
/// A bubble view command for the renderer.
pub const BUBBLE_COMMAND: &str = "bubble_command";
pub const CENTER_COMMAND: &str = "center_command";
pub const PLAY_SOUND: &str = "play_sound";
pub const SETTINGS_UPDATED: &str = "settings_updated";

/// Encode a message envelope.
pub fn envelope(kind: &str, data: impl Serialize) -> String {
    json!({ "type": kind, "data": data }).to_string()
}

/// Broadcast to every connected client. Having no listeners is not an error.
pub fn broadcast(tx: &broadcast::Sender<String>, kind: &str, data: impl Serialize) {
    if tx.send(envelope(kind, data)).is_err() {
        tracing::trace!(kind, "no websocket listeners");
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsUpdatedPayload {
    pub keys: Vec<String>,
}
