//! Presentation and desktop-shell callbacks:
//!   POST /api/center/{toggle|show|hide}
//!   POST /api/bubbles/{handle}/event   – report from a bubble view
//!   POST /api/bubbles/end              – report from an external renderer
//!   POST /api/shell/event              – display, dock, sleep, lock changes
//!   PUT  /api/bubble-mode              – switch builtin/external rendering

use axum::Json;
use axum::extract::{Path, State};
use notify_core::ports::ViewHandle;
use notify_core::{BubbleEnd, BubbleEvent, CenterCommand, ShellEvent};
use serde::Deserialize;
use serde_json::json;

use super::{ApiResult, err_json, service_err};
use crate::app::SharedState;
use crate::config::SettingsManager;

#[derive(Debug, Deserialize)]
pub struct BubbleModeBody {
    pub builtin: bool,
}

/// POST /api/center/{command}
pub async fn center_command(
    State(state): State<SharedState>,
    Path(command): Path<CenterCommand>,
) -> ApiResult {
    let accepted = state.service().center(command).await.map_err(service_err)?;
    Ok(Json(json!({ "accepted": accepted })))
}

/// POST /api/bubbles/{handle}/event
pub async fn bubble_event(
    State(state): State<SharedState>,
    Path(handle): Path<u64>,
    Json(event): Json<BubbleEvent>,
) -> ApiResult {
    state
        .service()
        .bubble_event(ViewHandle(handle), event)
        .await
        .map_err(service_err)?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/bubbles/end
pub async fn bubble_end(State(state): State<SharedState>, Json(end): Json<BubbleEnd>) -> ApiResult {
    state.service().bubble_end(end).await.map_err(service_err)?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/shell/event
pub async fn shell_event(
    State(state): State<SharedState>,
    Json(event): Json<ShellEvent>,
) -> ApiResult {
    tracing::debug!(?event, "Shell event");
    state.service().shell_event(event).await.map_err(service_err)?;
    Ok(Json(json!({ "success": true })))
}

/// PUT /api/bubble-mode
pub async fn set_bubble_mode(
    State(state): State<SharedState>,
    Json(body): Json<BubbleModeBody>,
) -> ApiResult {
    let mode = if body.builtin { "builtin" } else { "external" };
    SettingsManager::new(state.db().clone())
        .set_setting("BUBBLE_MODE", mode)
        .map_err(|e| err_json(500, &format!("Failed to store bubble mode: {e}")))?;
    state
        .reload_config()
        .await
        .map_err(|e| err_json(500, &format!("Failed to reload config: {e}")))?;

    state
        .service()
        .set_bubble_mode(body.builtin)
        .await
        .map_err(service_err)?;
    tracing::info!(mode, "Bubble mode changed");
    Ok(Json(json!({ "success": true, "mode": mode })))
}
