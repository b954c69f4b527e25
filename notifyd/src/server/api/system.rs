//! System-wide notification settings API:
//!   GET /api/system                  – all system items
//!   PUT /api/system                  – replace all system items
//!   GET /api/system/config/{item}    – one item by number
//!   PUT /api/system/config/{item}

use axum::Json;
use axum::extract::{Path, State};
use notify_core::settings::SystemSettings;
use serde_json::json;

use super::apps::ValueBody;
use super::{ApiResult, service_err};
use crate::app::SharedState;

/// GET /api/system
pub async fn get_system_settings(State(state): State<SharedState>) -> ApiResult {
    let settings = state
        .service()
        .call(|center| center.system_settings())
        .await
        .map_err(service_err)?;
    Ok(Json(json!(settings)))
}

/// PUT /api/system
pub async fn update_system_settings(
    State(state): State<SharedState>,
    Json(settings): Json<SystemSettings>,
) -> ApiResult {
    state
        .service()
        .call(move |center| center.set_system_settings(&settings))
        .await
        .map_err(service_err)?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/system/config/{item}
pub async fn get_system_config(
    State(state): State<SharedState>,
    Path(item): Path<u32>,
) -> ApiResult {
    let value = state
        .service()
        .call(move |center| center.system_config(item))
        .await
        .map_err(service_err)?;
    Ok(Json(json!({ "item": item, "value": value })))
}

/// PUT /api/system/config/{item}
pub async fn set_system_config(
    State(state): State<SharedState>,
    Path(item): Path<u32>,
    Json(body): Json<ValueBody>,
) -> ApiResult {
    state
        .service()
        .call(move |center| center.set_system_config(item, body.value))
        .await
        .map_err(service_err)?;
    Ok(Json(json!({ "success": true })))
}
