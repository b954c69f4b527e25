//! Per-application notification settings API:
//!   GET    /api/apps                          – registered application ids
//!   POST   /api/apps                          – register an application
//!   GET    /api/apps/{app}                    – all settings of one app
//!   PUT    /api/apps/{app}                    – replace all settings
//!   DELETE /api/apps/{app}
//!   GET    /api/apps/{app}/config/{item}      – one item by number
//!   PUT    /api/apps/{app}/config/{item}

use axum::Json;
use axum::extract::{Path, State};
use notify_core::settings::{AppInfo, AppSettings, SettingValue};
use serde::Deserialize;
use serde_json::json;

use super::{ApiResult, service_err};
use crate::app::SharedState;

#[derive(Debug, Deserialize)]
pub struct ValueBody {
    pub value: SettingValue,
}

/// GET /api/apps
pub async fn list_apps(State(state): State<SharedState>) -> ApiResult {
    let apps = state
        .service()
        .call(|center| center.app_list())
        .await
        .map_err(service_err)?;
    Ok(Json(json!({ "apps": apps })))
}

/// POST /api/apps
pub async fn add_app(State(state): State<SharedState>, Json(info): Json<AppInfo>) -> ApiResult {
    let app_id = info.id.clone();
    state
        .service()
        .call(move |center| center.add_app(&info))
        .await
        .map_err(service_err)?;
    tracing::info!(app = %app_id, "App registered");
    Ok(Json(json!({ "success": true, "app": app_id })))
}

/// GET /api/apps/{app}
pub async fn get_app_settings(
    State(state): State<SharedState>,
    Path(app): Path<String>,
) -> ApiResult {
    let settings = state
        .service()
        .call(move |center| center.app_settings(&app))
        .await
        .map_err(service_err)?;
    Ok(Json(json!(settings)))
}

/// PUT /api/apps/{app}
pub async fn update_app_settings(
    State(state): State<SharedState>,
    Path(app): Path<String>,
    Json(settings): Json<AppSettings>,
) -> ApiResult {
    state
        .service()
        .call(move |center| center.set_app_settings(&app, &settings))
        .await
        .map_err(service_err)?;
    Ok(Json(json!({ "success": true })))
}

/// DELETE /api/apps/{app}
pub async fn remove_app(State(state): State<SharedState>, Path(app): Path<String>) -> ApiResult {
    let app_id = app.clone();
    state
        .service()
        .call(move |center| center.remove_app(&app))
        .await
        .map_err(service_err)?;
    tracing::info!(app = %app_id, "App removed");
    Ok(Json(json!({ "success": true })))
}

/// GET /api/apps/{app}/config/{item}
pub async fn get_app_config(
    State(state): State<SharedState>,
    Path((app, item)): Path<(String, u32)>,
) -> ApiResult {
    let value = state
        .service()
        .call(move |center| center.app_config(&app, item))
        .await
        .map_err(service_err)?;
    Ok(Json(json!({ "item": item, "value": value })))
}

/// PUT /api/apps/{app}/config/{item}
pub async fn set_app_config(
    State(state): State<SharedState>,
    Path((app, item)): Path<(String, u32)>,
    Json(body): Json<ValueBody>,
) -> ApiResult {
    state
        .service()
        .call(move |center| center.set_app_config(&app, item, body.value))
        .await
        .map_err(service_err)?;
    Ok(Json(json!({ "success": true })))
}
