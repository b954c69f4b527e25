//! REST API handlers grouped by domain.

pub mod apps;
pub mod notify;
pub mod records;
pub mod settings;
pub mod shell;
pub mod system;

use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};

use notify_core::NotifyError;

use crate::service::ServiceError;

pub type ApiError = (StatusCode, Json<Value>);
pub type ApiResult = Result<Json<Value>, ApiError>;

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> ApiError {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "error": message })),
    )
}

/// Map a service failure to an HTTP error.
pub fn service_err(e: ServiceError) -> ApiError {
    let status = match &e {
        ServiceError::Stopped => 503,
        ServiceError::Notify(inner) => match inner {
            NotifyError::InvalidConfigItem(_) | NotifyError::InvalidValue { .. } => 400,
            NotifyError::RecordNotFound(_) => 404,
            NotifyError::MissingDisplayService => 503,
            NotifyError::Storage(_) => 500,
        },
    };
    if status >= 500 {
        tracing::error!("Request failed: {e}");
    }
    err_json(status, &e.to_string())
}

/// Parse a JSON document produced by the history store.
pub fn parse_stored(raw: &str) -> Result<Value, ApiError> {
    serde_json::from_str(raw).map_err(|e| err_json(500, &format!("Corrupt history data: {e}")))
}
