//! Notification history API:
//!   GET    /api/records                       – all records, newest first
//!   GET    /api/records/page?count=&offset=   – records older than `offset`
//!   GET    /api/records/count
//!   GET    /api/records/{storage_id}
//!   DELETE /api/records/{storage_id}
//!   DELETE /api/records                       – clear history

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;

use super::{ApiResult, parse_stored, service_err};
use crate::app::SharedState;

const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    count: Option<usize>,
    #[serde(default)]
    offset: String,
}

/// GET /api/records
pub async fn get_records(State(state): State<SharedState>) -> ApiResult {
    let raw = state
        .service()
        .call(|center| center.records())
        .await
        .map_err(service_err)?;
    Ok(Json(json!({ "records": parse_stored(&raw)? })))
}

/// GET /api/records/page
pub async fn get_page(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> ApiResult {
    let count = query.count.unwrap_or(DEFAULT_PAGE_SIZE);
    let offset = query.offset;
    let raw = state
        .service()
        .call(move |center| center.records_from(count, &offset))
        .await
        .map_err(service_err)?;
    Ok(Json(json!({ "records": parse_stored(&raw)? })))
}

/// GET /api/records/count
pub async fn get_count(State(state): State<SharedState>) -> ApiResult {
    let count = state
        .service()
        .call(|center| center.record_count())
        .await
        .map_err(service_err)?;
    Ok(Json(json!({ "count": count })))
}

/// GET /api/records/{storage_id}
pub async fn get_record(
    State(state): State<SharedState>,
    Path(storage_id): Path<String>,
) -> ApiResult {
    let raw = state
        .service()
        .call(move |center| center.record(&storage_id))
        .await
        .map_err(service_err)?;
    Ok(Json(parse_stored(&raw)?))
}

/// DELETE /api/records/{storage_id}
pub async fn delete_record(
    State(state): State<SharedState>,
    Path(storage_id): Path<String>,
) -> ApiResult {
    let id = storage_id.clone();
    state
        .service()
        .call(move |center| center.remove_record(&id))
        .await
        .map_err(service_err)?;
    tracing::info!(storage_id = %storage_id, "Record removed");
    Ok(Json(json!({ "success": true })))
}

/// DELETE /api/records
pub async fn clear_records(State(state): State<SharedState>) -> ApiResult {
    state
        .service()
        .call(|center| center.clear_records())
        .await
        .map_err(service_err)?;
    Ok(Json(json!({ "success": true })))
}
