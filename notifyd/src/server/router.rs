use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use super::{api, websocket};
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        .route("/ws", get(websocket::ws_handler))
        // --- Notifications ---
        .route("/api/notify", post(api::notify::notify))
        .route(
            "/api/notifications/{id}/close",
            post(api::notify::close_notification),
        )
        .route("/api/capabilities", get(api::notify::capabilities))
        .route("/api/server-info", get(api::notify::server_info))
        // --- History ---
        .route(
            "/api/records",
            get(api::records::get_records).delete(api::records::clear_records),
        )
        .route("/api/records/page", get(api::records::get_page))
        .route("/api/records/count", get(api::records::get_count))
        .route(
            "/api/records/{storage_id}",
            get(api::records::get_record).delete(api::records::delete_record),
        )
        // --- Applications ---
        .route(
            "/api/apps",
            get(api::apps::list_apps).post(api::apps::add_app),
        )
        .route(
            "/api/apps/{app}",
            get(api::apps::get_app_settings)
                .put(api::apps::update_app_settings)
                .delete(api::apps::remove_app),
        )
        .route(
            "/api/apps/{app}/config/{item}",
            get(api::apps::get_app_config).put(api::apps::set_app_config),
        )
        // --- System notification settings ---
        .route(
            "/api/system",
            get(api::system::get_system_settings).put(api::system::update_system_settings),
        )
        .route(
            "/api/system/config/{item}",
            get(api::system::get_system_config).put(api::system::set_system_config),
        )
        // --- Presentation / shell ---
        .route("/api/center/{command}", post(api::shell::center_command))
        .route("/api/bubbles/{handle}/event", post(api::shell::bubble_event))
        .route("/api/bubbles/end", post(api::shell::bubble_end))
        .route("/api/shell/event", post(api::shell::shell_event))
        .route("/api/bubble-mode", put(api::shell::set_bubble_mode))
        // --- Daemon settings ---
        .route(
            "/api/settings",
            get(api::settings::get_settings).put(api::settings::update_settings),
        )
        .route("/api/settings/reset", post(api::settings::reset_settings))
        // --- Middleware ---
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn status_handler(State(state): State<SharedState>) -> Json<Value> {
    let builtin_bubbles = state.config().await.builtin_bubbles;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "builtin_bubbles": builtin_bubbles,
    }))
}
