//! Notification submission API:
//!   POST /api/notify                      – show a notification
//!   POST /api/notifications/{id}/close    – close by id
//!   GET  /api/capabilities
//!   GET  /api/server-info

use axum::Json;
use axum::extract::{Path, State};
use notify_core::NotificationRequest;
use serde_json::json;

use super::{ApiResult, service_err};
use crate::app::SharedState;

/// POST /api/notify
pub async fn notify(
    State(state): State<SharedState>,
    Json(request): Json<NotificationRequest>,
) -> ApiResult {
    let app = request.app_name.clone();
    let id = state.service().submit(request).await.map_err(service_err)?;
    tracing::debug!(id, app = %app, "Notify request handled");
    Ok(Json(json!({ "id": id })))
}

/// POST /api/notifications/{id}/close
pub async fn close_notification(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> ApiResult {
    let closed = state.service().close(id).await.map_err(service_err)?;
    Ok(Json(json!({ "closed": closed })))
}

/// GET /api/capabilities
pub async fn capabilities(State(state): State<SharedState>) -> ApiResult {
    let caps = state
        .service()
        .call(|center| Ok(center.capabilities()))
        .await
        .map_err(service_err)?;
    Ok(Json(json!({ "capabilities": caps })))
}

/// GET /api/server-info
pub async fn server_info(State(state): State<SharedState>) -> ApiResult {
    let info = state
        .service()
        .call(|center| Ok(center.server_information()))
        .await
        .map_err(service_err)?;
    Ok(Json(json!(info)))
}
