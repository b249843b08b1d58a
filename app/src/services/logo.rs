//! Logo upload handling.

use std::sync::Arc;

use qr_compositor::{QrError, load_logo};

use crate::app::SharedState;
use crate::services::session::SelectedLogo;

#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    #[error(transparent)]
    Rejected(#[from] QrError),
    #[error("Logo upload {0} was superseded by a newer one")]
    Superseded(u64),
    #[error("Logo decoder failed: {0}")]
    Worker(String),
}

/// Validate and decode an uploaded logo, then make it the current selection.
///
/// A rejected upload clears the previous selection, like resetting a file
/// input, but never touches the last generated artifact. Uploads are
/// sequenced like generations: once a newer upload (or a delete) starts,
/// this one returns [`LogoError::Superseded`] and leaves the session alone.
pub async fn upload_logo(
    state: &SharedState,
    name: String,
    mime: Option<String>,
    bytes: Vec<u8>,
) -> Result<SelectedLogo, LogoError> {
    let ticket = state.logo_uploads().begin();
    let id = ticket.id();
    let max_bytes = state.config().max_logo_bytes;
    let bytes = Arc::new(bytes);

    tracing::debug!(upload = id, name = %name, size = bytes.len(), "Decoding logo");

    let decode_bytes = Arc::clone(&bytes);
    let decode_name = name.clone();
    let work = tokio::task::spawn_blocking(move || {
        load_logo(Some(&decode_name), mime.as_deref(), &decode_bytes, max_bytes)
    });

    let decoded = tokio::select! {
        _ = ticket.token().cancelled() => {
            tracing::info!(upload = id, name = %name, "Logo upload superseded while decoding");
            return Err(LogoError::Superseded(id));
        }
        res = work => res
            .map_err(|e| LogoError::Worker(e.to_string()))
            .and_then(|res| res.map_err(LogoError::from)),
    };

    let mut session = state.session_mut().await;
    if !state.logo_uploads().is_current(&ticket) {
        tracing::info!(upload = id, name = %name, "Discarding stale logo upload");
        return Err(LogoError::Superseded(id));
    }
    match decoded {
        Ok(image) => {
            let logo = SelectedLogo {
                name,
                image: Arc::new(image),
                bytes,
            };
            session.select_logo(logo.clone());
            Ok(logo)
        }
        Err(e) => {
            session.clear_logo();
            tracing::warn!(name = %name, "Logo rejected: {e}");
            Err(e)
        }
    }
}

/// Drop the selected logo and abandon any upload still decoding.
pub async fn clear_logo(state: &SharedState) -> bool {
    let mut session = state.session_mut().await;
    state.logo_uploads().cancel_all();
    session.clear_logo()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::services::generation::generate;
    use image::{Rgba, RgbaImage};
    use qr_compositor::{QrContent, encode_png};

    fn png(w: u32, h: u32) -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(w, h, Rgba([0, 128, 255, 255]))).unwrap()
    }

    /// A large PNG that compresses poorly, so decoding takes a while.
    fn slow_png() -> Vec<u8> {
        let img = RgbaImage::from_fn(1400, 1400, |x, y| {
            let v = x.wrapping_mul(2_654_435_761).wrapping_add(y.wrapping_mul(40_503)) ^ (x * y);
            Rgba([v as u8, (v >> 8) as u8, (v >> 16) as u8, 255])
        });
        encode_png(&img).unwrap()
    }

    #[tokio::test]
    async fn upload_selects_decoded_logo() {
        let state = SharedState::new(AppConfig::default());
        let logo = upload_logo(&state, "logo.png".into(), Some("image/png".into()), png(30, 20))
            .await
            .unwrap();
        assert_eq!(logo.image.dimensions(), (30, 20));
        assert_eq!(state.session().await.logo().unwrap().name, "logo.png");
    }

    #[tokio::test]
    async fn rejected_upload_clears_logo_but_keeps_artifact() {
        let state = SharedState::new(AppConfig::default());
        upload_logo(&state, "logo.png".into(), Some("image/png".into()), png(8, 8))
            .await
            .unwrap();
        generate(&state, QrContent::new("keep me")).await.unwrap();
        let before = state.session().await.artifact().unwrap().png.clone();

        let err = upload_logo(&state, "photo.jpg".into(), Some("image/jpeg".into()), vec![0xff, 0xd8])
            .await
            .unwrap_err();
        assert!(matches!(err, LogoError::Rejected(QrError::UnsupportedFormat(_))));

        let session = state.session().await;
        assert!(session.logo().is_none());
        assert_eq!(session.artifact().unwrap().png, before);
    }

    #[tokio::test]
    async fn corrupt_png_is_decode_error() {
        let state = SharedState::new(AppConfig::default());
        let err = upload_logo(&state, "broken.png".into(), Some("image/png".into()), b"nope".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, LogoError::Rejected(QrError::Decode(_))));
    }

    #[tokio::test]
    async fn newer_upload_wins_over_slower_older_one() {
        let state = SharedState::new(AppConfig::default());
        let (older, newer) = tokio::join!(
            upload_logo(&state, "older.png".into(), Some("image/png".into()), slow_png()),
            upload_logo(&state, "newer.png".into(), Some("image/png".into()), png(4, 4)),
        );

        assert_eq!(newer.unwrap().name, "newer.png");
        assert!(matches!(older, Err(LogoError::Superseded(1))));
        assert_eq!(state.session().await.logo().unwrap().name, "newer.png");
    }

    #[tokio::test]
    async fn newer_rejection_is_not_undone_by_older_upload() {
        let state = SharedState::new(AppConfig::default());
        let (older, newer) = tokio::join!(
            upload_logo(&state, "older.png".into(), Some("image/png".into()), slow_png()),
            upload_logo(&state, "photo.jpg".into(), Some("image/jpeg".into()), vec![0xff, 0xd8]),
        );

        assert!(matches!(newer, Err(LogoError::Rejected(QrError::UnsupportedFormat(_)))));
        assert!(matches!(older, Err(LogoError::Superseded(_))));
        assert!(state.session().await.logo().is_none());
    }

    #[tokio::test]
    async fn clear_abandons_upload_in_flight() {
        let state = SharedState::new(AppConfig::default());
        let (uploaded, removed) = tokio::join!(
            upload_logo(&state, "older.png".into(), Some("image/png".into()), slow_png()),
            clear_logo(&state),
        );

        assert!(!removed);
        assert!(matches!(uploaded, Err(LogoError::Superseded(_))));
        assert!(state.session().await.logo().is_none());
    }
}
