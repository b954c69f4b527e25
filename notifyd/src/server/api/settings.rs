//! Daemon settings API:
//!   GET  /api/settings         – all settings + status
//!   PUT  /api/settings         – update settings
//!   POST /api/settings/reset   – reset settings to defaults

use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use notify_core::ShellEvent;
use notify_core::settings::SystemConfigItem;
use serde_json::{Value, json};

use super::{ApiResult, err_json, service_err};
use crate::app::SharedState;
use crate::config::SettingsManager;
use crate::events::{self, SettingsUpdatedPayload};

const DISPLAY_KEYS: &[&str] = &[
    "DISPLAY_AVAILABLE",
    "DISPLAY_RECT",
    "MONITORS",
    "DOCK_RECT",
    "DOCK_POSITION",
    "DOCK_MODE",
];

fn settings_json(sm: &SettingsManager) -> ApiResult {
    let all = sm
        .get_all_settings()
        .map_err(|e| err_json(500, &format!("Failed to get settings: {e}")))?;
    let status = sm
        .check_status()
        .map_err(|e| err_json(500, &format!("Failed to check status: {e}")))?;
    Ok(Json(json!({
        "settings": all,
        "status": status,
    })))
}

/// Push changed keys to the running service and to clients.
async fn apply_changes(state: &SharedState, keys: Vec<String>) -> Result<(), super::ApiError> {
    let was_builtin = state.config().await.builtin_bubbles;
    state
        .reload_config()
        .await
        .map_err(|e| err_json(500, &format!("Failed to reload config: {e}")))?;
    let builtin = state.config().await.builtin_bubbles;

    let service = state.service();
    if builtin != was_builtin {
        service.set_bubble_mode(builtin).await.map_err(service_err)?;
    }
    if keys.iter().any(|k| DISPLAY_KEYS.contains(&k.as_str())) {
        service
            .shell_event(ShellEvent::DisplayChanged)
            .await
            .map_err(service_err)?;
    }
    for item in SystemConfigItem::ALL {
        if keys.iter().any(|k| k == item.key()) {
            service
                .shell_event(ShellEvent::SettingChanged { item })
                .await
                .map_err(service_err)?;
        }
    }

    events::broadcast(
        state.ws_sender(),
        events::SETTINGS_UPDATED,
        SettingsUpdatedPayload { keys },
    );
    Ok(())
}

/// GET /api/settings
pub async fn get_settings(State(state): State<SharedState>) -> ApiResult {
    settings_json(&SettingsManager::new(state.db().clone()))
}

/// PUT /api/settings
pub async fn update_settings(
    State(state): State<SharedState>,
    Json(body): Json<HashMap<String, String>>,
) -> ApiResult {
    let sm = SettingsManager::new(state.db().clone());
    sm.set_settings(&body)
        .map_err(|e| err_json(400, &e.to_string()))?;

    let updated = body.len();
    let mut keys: Vec<String> = body.into_keys().collect();
    keys.sort();
    apply_changes(&state, keys).await?;

    let Json(mut response) = settings_json(&sm)?;
    response["success"] = json!(true);
    response["message"] = json!(format!("Updated {updated} setting(s) successfully"));
    Ok(Json(response))
}

/// POST /api/settings/reset
pub async fn reset_settings(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> ApiResult {
    use crate::config::defaults::DEFAULT_SETTINGS;

    let keys: Vec<String> = body
        .get("keys")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default();

    let sm = SettingsManager::new(state.db().clone());
    let reset_count = sm
        .reset_settings(&keys)
        .map_err(|e| err_json(500, &format!("Failed to reset settings: {e}")))?;

    let changed = if keys.is_empty() {
        DEFAULT_SETTINGS.keys().map(|k| k.to_string()).collect()
    } else {
        keys
    };
    apply_changes(&state, changed).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Reset {reset_count} setting(s) to default values"),
    })))
}
