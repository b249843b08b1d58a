//! QR generation and download API.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::Response;
use qr_compositor::{Color, ErrorCorrection, QrContent, QrError};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::app::SharedState;
use crate::services::generation::{self, GenerationError};

use super::{ApiResult, err_json, qr_err_json};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    pub error_correction: Option<String>,
    pub dark_color: Option<String>,
    pub light_color: Option<String>,
}

impl GenerateRequest {
    /// Resolve optional fields against the configured defaults.
    fn into_content(self, state: &SharedState) -> Result<QrContent, QrError> {
        let config = state.config();
        let pick = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        Ok(QrContent {
            text: self.text,
            error_correction: match pick(self.error_correction) {
                Some(s) => s.parse::<ErrorCorrection>()?,
                None => config.error_correction,
            },
            dark: match pick(self.dark_color) {
                Some(s) => s.parse::<Color>()?,
                None => config.dark_color,
            },
            light: match pick(self.light_color) {
                Some(s) => s.parse::<Color>()?,
                None => config.light_color,
            },
        })
    }
}

/// POST /api/generate – Render a QR code with the selected logo
pub async fn generate(State(state): State<SharedState>, Json(req): Json<GenerateRequest>) -> ApiResult {
    let content = req.into_content(&state).map_err(|e| qr_err_json(&e))?;

    match generation::generate(&state, content).await {
        Ok(summary) => Ok(Json(json!({ "success": true, "artifact": summary }))),
        Err(GenerationError::Render(e)) => {
            tracing::warn!(kind = e.kind(), "Generation failed: {e}");
            Err(qr_err_json(&e))
        }
        Err(e @ GenerationError::Superseded(_)) => Err(err_json(409, &e.to_string())),
        Err(e @ GenerationError::Worker(_)) => {
            tracing::error!("Generation failed: {e}");
            Err(err_json(500, &e.to_string()))
        }
    }
}

/// GET /api/download – Last generated PNG as an attachment
pub async fn download(State(state): State<SharedState>) -> Result<Response, (StatusCode, Json<Value>)> {
    let artifact = state
        .session()
        .await
        .artifact()
        .cloned()
        .ok_or_else(|| err_json(404, "Nothing generated yet"))?;

    Response::builder()
        .header(header::CONTENT_TYPE, "image/png")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.filename),
        )
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from((*artifact.png).clone()))
        .map_err(|e| err_json(500, &e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::to_bytes;

    fn request(text: &str) -> GenerateRequest {
        GenerateRequest {
            text: text.into(),
            error_correction: None,
            dark_color: None,
            light_color: None,
        }
    }

    #[tokio::test]
    async fn generate_then_download() {
        let state = SharedState::new(AppConfig::default());
        let Json(body) = generate(State(state.clone()), Json(request("https://example.com")))
            .await
            .unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["artifact"]["width"], 400);
        let filename = body["artifact"]["filename"].as_str().unwrap().to_string();

        let response = download(State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
        let disposition = response.headers().get(header::CONTENT_DISPOSITION).unwrap();
        assert!(disposition.to_str().unwrap().contains(&filename));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }

    #[tokio::test]
    async fn empty_text_is_bad_request() {
        let state = SharedState::new(AppConfig::default());
        let (code, Json(body)) = generate(State(state), Json(request(""))).await.unwrap_err();
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please enter a URL or text to encode.");
    }

    #[tokio::test]
    async fn bad_color_is_rejected_before_rendering() {
        let state = SharedState::new(AppConfig::default());
        let mut req = request("hello");
        req.dark_color = Some("black".into());
        let (code, _) = generate(State(state.clone()), Json(req)).await.unwrap_err();
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert_eq!(state.generations().latest(), 0);
    }

    #[tokio::test]
    async fn text_over_capacity_is_unprocessable() {
        let state = SharedState::new(AppConfig::default());
        let (code, Json(body)) = generate(State(state), Json(request(&"z".repeat(4000))))
            .await
            .unwrap_err();
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "encoding");
    }

    #[tokio::test]
    async fn download_before_generate_is_not_found() {
        let state = SharedState::new(AppConfig::default());
        let (code, _) = download(State(state)).await.unwrap_err();
        assert_eq!(code, StatusCode::NOT_FOUND);
    }
}
