//! PNG export and download naming.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::error::{QrError, Result};

const FILENAME_PREFIX: &str = "qr-with-logo";

/// Encode the artifact as PNG.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    PngEncoder::new(&mut png_bytes)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
        .map_err(|e| QrError::Export(e.to_string()))?;
    Ok(png_bytes)
}

/// Suggested download name, e.g. `qr-with-logo-20261016T093015123Z.png`.
///
/// The timestamp is the millisecond RFC 3339 UTC time with separators removed.
pub fn download_filename(at: DateTime<Utc>) -> String {
    let stamp: String = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    format!("{FILENAME_PREFIX}-{stamp}.png")
}

/// `data:` URL for inline previews.
pub fn to_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::Rgba;

    #[test]
    fn filename_strips_separators() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 15).unwrap();
        assert_eq!(download_filename(at), "qr-with-logo-20261016T093015000Z.png");
    }

    #[test]
    fn png_round_trips_dimensions() {
        let img = RgbaImage::from_pixel(7, 5, Rgba([1, 2, 3, 255]));
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (7, 5));
    }

    #[test]
    fn data_url_has_png_prefix() {
        let url = to_data_url(&[1, 2, 3]);
        assert_eq!(url, "data:image/png;base64,AQID");
    }
}
