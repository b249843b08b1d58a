//! Logo selection API.

use axum::Json;
use axum::body::Body;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};

use crate::app::SharedState;
use crate::services::logo::{self, LogoError, upload_logo as select_logo};

use super::{ApiResult, err_json, qr_err_json};

/// POST /api/logo – Upload and select a PNG logo
pub async fn upload_logo(State(state): State<SharedState>, mut multipart: Multipart) -> ApiResult {
    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        if field.name() != Some("logo") {
            continue;
        }
        let filename = field.file_name().unwrap_or("logo.png").to_string();
        let mime = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_err)?;

        return match select_logo(&state, filename, mime, data.to_vec()).await {
            Ok(logo) => Ok(Json(json!({
                "success": true,
                "logo": {
                    "name": logo.name,
                    "width": logo.image.width(),
                    "height": logo.image.height(),
                },
            }))),
            Err(LogoError::Rejected(e)) => Err(qr_err_json(&e)),
            Err(e @ LogoError::Superseded(_)) => Err(err_json(409, &e.to_string())),
            Err(e @ LogoError::Worker(_)) => Err(err_json(500, &e.to_string())),
        };
    }

    Err(err_json(400, "No logo file provided"))
}

/// Oversized bodies keep their 413; malformed ones are 400.
fn multipart_err(e: MultipartError) -> (StatusCode, Json<Value>) {
    tracing::warn!("Logo upload body rejected: {e}");
    err_json(e.status().as_u16(), &e.body_text())
}

/// GET /api/logo – Serve the selected logo for the preview
pub async fn get_logo(State(state): State<SharedState>) -> Result<Response, (StatusCode, Json<Value>)> {
    let bytes = state
        .session()
        .await
        .logo()
        .map(|l| l.bytes.clone())
        .ok_or_else(|| err_json(404, "No logo selected"))?;

    Response::builder()
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from((*bytes).clone()))
        .map_err(|e| err_json(500, &e.to_string()))
}

/// DELETE /api/logo – Clear the logo selection
pub async fn delete_logo(State(state): State<SharedState>) -> ApiResult {
    let removed = logo::clear_logo(&state).await;
    Ok(Json(json!({ "success": true, "removed": removed })))
}
