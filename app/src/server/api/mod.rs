//! REST API handlers grouped by domain.

pub mod logo;
pub mod qr;
pub mod settings;

use axum::Json;
use axum::http::StatusCode;
use qr_compositor::QrError;
use serde_json::{Value, json};

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "error": message })),
    )
}

/// Map a rendering error onto an HTTP status with its user-facing message.
pub fn qr_err_json(err: &QrError) -> (StatusCode, Json<Value>) {
    let status = match err {
        QrError::InvalidInput(_) | QrError::InvalidDimension(_) => 400,
        QrError::UnsupportedFormat(_) => 415,
        QrError::Decode(_) | QrError::Encoding(_) => 422,
        QrError::Export(_) => 500,
    };
    let (code, Json(mut body)) = err_json(status, &err.to_string());
    body["kind"] = json!(err.kind());
    (code, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_errors_map_to_statuses() {
        let (code, Json(body)) = qr_err_json(&QrError::UnsupportedFormat("png only".into()));
        assert_eq!(code, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "png only");
        assert_eq!(body["kind"], "unsupported_format");

        let (code, _) = qr_err_json(&QrError::Encoding("too long".into()));
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
        let (code, _) = qr_err_json(&QrError::InvalidInput("empty".into()));
        assert_eq!(code, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn err_json_falls_back_to_500() {
        let (code, Json(body)) = err_json(1, "weird");
        assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
    }
}
