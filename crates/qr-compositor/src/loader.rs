//! Logo file acceptance and decoding.
//!
//! Only PNG logos are accepted; transparency in the logo is composited over
//! the plate when drawn.

use image::{ImageFormat, RgbaImage};
use tracing::debug;

use crate::error::{QrError, Result};

/// Message shown when a non-PNG file is picked.
pub const UNSUPPORTED_LOGO_MESSAGE: &str =
    "Please upload a PNG image (transparent PNG recommended).";

/// Upper bound on logo upload size.
pub const DEFAULT_MAX_LOGO_BYTES: usize = 10 * 1024 * 1024;

/// Decide whether an uploaded file is an acceptable logo.
///
/// A declared MIME type wins; without one the file extension decides, and
/// without either the bytes are sniffed.
pub fn check_logo_format(file_name: Option<&str>, mime: Option<&str>, bytes: &[u8]) -> Result<()> {
    let mime = mime.map(str::trim).filter(|m| !m.is_empty());
    let accepted = match (mime, file_name) {
        (Some(m), _) => m.to_ascii_lowercase().contains("png"),
        (None, Some(name)) => name.to_ascii_lowercase().ends_with(".png"),
        (None, None) => matches!(image::guess_format(bytes), Ok(ImageFormat::Png)),
    };

    if accepted {
        Ok(())
    } else {
        debug!(?file_name, ?mime, "Rejected non-PNG logo");
        Err(QrError::UnsupportedFormat(UNSUPPORTED_LOGO_MESSAGE.into()))
    }
}

/// Reject uploads above `max_bytes`.
pub fn check_logo_size(bytes: &[u8], max_bytes: usize) -> Result<()> {
    if bytes.is_empty() {
        return Err(QrError::InvalidInput("Logo file is empty".into()));
    }
    if bytes.len() > max_bytes {
        return Err(QrError::InvalidInput(format!(
            "Logo file too large ({} bytes, max {max_bytes})",
            bytes.len()
        )));
    }
    Ok(())
}

/// Decode PNG bytes into an RGBA bitmap.
pub fn decode_logo(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| QrError::Decode(e.to_string()))?;
    if img.width() == 0 || img.height() == 0 {
        return Err(QrError::Decode("image has no pixels".into()));
    }
    debug!(width = img.width(), height = img.height(), "Decoded logo");
    Ok(img.to_rgba8())
}

/// Run every acceptance check and decode the logo.
pub fn load_logo(
    file_name: Option<&str>,
    mime: Option<&str>,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<RgbaImage> {
    check_logo_format(file_name, mime, bytes)?;
    check_logo_size(bytes, max_bytes)?;
    decode_logo(bytes)
}
