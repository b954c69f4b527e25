//! WebSocket endpoint.
//!
//! Clients receive every broadcast message. Renderers also report bubble
//! events back over the same socket:
//! `{"type": "bubble_event", "data": {"handle": 3, "event": {...}}}`,
//! `{"type": "bubble_end", "data": {...}}` and
//! `{"type": "shell_event", "data": {...}}`.

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use notify_core::ports::ViewHandle;
use notify_core::{BubbleEnd, BubbleEvent, ShellEvent};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::{broadcast, mpsc};

use crate::app::SharedState;
use crate::events;
use crate::service::ServiceHandle;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.subscribe_ws();
    // Replies meant for this client only
    let (direct_tx, mut direct_rx) = mpsc::channel::<String>(16);

    let client_id = uuid::Uuid::new_v4().to_string();
    let welcome = events::envelope(events::CONNECTED, json!({ "clientId": client_id }));
    if sender.send(Message::Text(welcome.into())).await.is_err() {
        return;
    }

    tracing::info!("WebSocket client connected: {}", client_id);

    let cid = client_id.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                msg = rx.recv() => match msg {
                    Ok(msg) => msg,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("WebSocket client {cid} lagged, {skipped} message(s) dropped");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                Some(msg) = direct_rx.recv() => msg,
            };
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    let service = state.service().clone();
    let cid = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if let Some(reply) = handle_client_message(&text, &service).await {
                        let _ = direct_tx.send(reply).await;
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        tracing::info!("WebSocket client disconnected: {}", cid);
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

#[derive(Debug, Deserialize)]
struct BubbleEventMessage {
    handle: u64,
    event: BubbleEvent,
}

/// Route one client message. Returns a reply for this client, if any.
async fn handle_client_message(text: &str, service: &ServiceHandle) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<Value>(text) else {
        tracing::debug!("Ignoring non-JSON WebSocket message");
        return None;
    };
    let msg_type = msg.get("type").and_then(|t| t.as_str()).unwrap_or("");
    let data = msg.get("data").cloned().unwrap_or(Value::Null);

    let result = match msg_type {
        "ping" => return Some(events::envelope(events::PONG, Value::Null)),
        "bubble_event" => match serde_json::from_value::<BubbleEventMessage>(data) {
            Ok(m) => service.bubble_event(ViewHandle(m.handle), m.event).await,
            Err(e) => return Some(invalid(msg_type, e)),
        },
        "bubble_end" => match serde_json::from_value::<BubbleEnd>(data) {
            Ok(end) => service.bubble_end(end).await,
            Err(e) => return Some(invalid(msg_type, e)),
        },
        "shell_event" => match serde_json::from_value::<ShellEvent>(data) {
            Ok(event) => service.shell_event(event).await,
            Err(e) => return Some(invalid(msg_type, e)),
        },
        other => {
            tracing::debug!("Ignoring WebSocket message of type '{other}'");
            return None;
        }
    };

    if let Err(e) = result {
        tracing::warn!("WebSocket {msg_type} not delivered: {e}");
    }
    None
}

fn invalid(msg_type: &str, e: serde_json::Error) -> String {
    json!({ "type": "error", "error": format!("invalid {msg_type}: {e}") }).to_string()
}
