//! Effective settings API.

use axum::Json;
use axum::extract::State;
use serde_json::json;

use crate::app::SharedState;

use super::ApiResult;

/// GET /api/settings – Effective rendering configuration
pub async fn get_settings(State(state): State<SharedState>) -> ApiResult {
    let config = state.config();
    Ok(Json(json!({
        "settings": config.setting_infos(),
        "display_size": config.render.display_size,
        "preview_size": config.preview_size,
        "error_correction": config.error_correction,
        "dark_color": config.dark_color,
        "light_color": config.light_color,
        "max_logo_bytes": config.max_logo_bytes,
    })))
}
