use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::{api, assets};
use crate::app::SharedState;

/// Multipart overhead allowed on top of the logo size limit.
const UPLOAD_SLACK_BYTES: usize = 64 * 1024;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    let upload_limit = state.config().max_logo_bytes + UPLOAD_SLACK_BYTES;

    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        .route("/api/settings", get(api::settings::get_settings))
        // --- Generation ---
        .route("/api/generate", post(api::qr::generate))
        .route("/api/download", get(api::qr::download))
        // --- Logo ---
        .route(
            "/api/logo",
            post(api::logo::upload_logo)
                .get(api::logo::get_logo)
                .delete(api::logo::delete_logo)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        // --- Page ---
        .route("/", get(assets::index))
        .fallback(assets::fallback)
        // --- Middleware ---
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn status_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
