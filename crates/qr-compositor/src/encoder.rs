//! QR code rasterization on top of the `qrcode` crate.

use std::fmt;
use std::str::FromStr;

use image::RgbaImage;
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::error::{QrError, Result};

/// Quiet zone, in modules, drawn around the symbol.
pub const DEFAULT_MARGIN: u32 = 1;

/// User-facing message for an empty text field.
pub const EMPTY_TEXT_MESSAGE: &str = "Please enter a URL or text to encode.";

/// QR error-correction level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    M,
    Q,
    #[default]
    H,
}

impl ErrorCorrection {
    /// Approximate share of the symbol that can be damaged and still decode.
    pub fn recovery_fraction(self) -> f64 {
        match self {
            Self::L => 0.07,
            Self::M => 0.15,
            Self::Q => 0.25,
            Self::H => 0.30,
        }
    }

    fn ec_level(self) -> EcLevel {
        match self {
            Self::L => EcLevel::L,
            Self::M => EcLevel::M,
            Self::Q => EcLevel::Q,
            Self::H => EcLevel::H,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = QrError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(Self::L),
            "M" | "MEDIUM" => Ok(Self::M),
            "Q" | "QUARTILE" => Ok(Self::Q),
            "H" | "HIGH" => Ok(Self::H),
            _ => Err(QrError::InvalidInput(format!(
                "Unknown error correction level: {s:?} (expected L, M, Q or H)"
            ))),
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(s)
    }
}

/// Everything needed to rasterize one QR code.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    pub text: String,
    pub error_correction: ErrorCorrection,
    pub target_size: u32,
    pub dark: Color,
    pub light: Color,
    pub margin: u32,
}

impl EncodeRequest {
    pub fn new(text: impl Into<String>, target_size: u32) -> Self {
        Self {
            text: text.into(),
            error_correction: ErrorCorrection::default(),
            target_size,
            dark: Color::BLACK,
            light: Color::WHITE,
            margin: DEFAULT_MARGIN,
        }
    }
}

/// Encode `req.text` and paint it onto a `target_size` square.
///
/// The module grid (plus quiet zone) is stretched over the whole raster with
/// a fractional module size, so the output is exactly `target_size` pixels
/// wide even when it does not divide evenly by the module count.
pub fn encode(req: &EncodeRequest) -> Result<RgbaImage> {
    if req.text.is_empty() {
        return Err(QrError::InvalidInput(EMPTY_TEXT_MESSAGE.into()));
    }
    if req.target_size == 0 {
        return Err(QrError::InvalidDimension(
            "QR target size must be positive".into(),
        ));
    }

    let code = QrCode::with_error_correction_level(req.text.as_bytes(), req.error_correction.ec_level())
        .map_err(|e| QrError::Encoding(e.to_string()))?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;
    let total = module_count + req.margin * 2;

    if req.target_size < total {
        return Err(QrError::InvalidDimension(format!(
            "QR target size {} is smaller than the symbol ({total} modules)",
            req.target_size
        )));
    }

    debug!(
        module_count,
        margin = req.margin,
        target_size = req.target_size,
        level = %req.error_correction,
        "Rasterizing QR code"
    );

    // Pixel -> module column/row, shared by both axes.
    let lookup: Vec<Option<u32>> = (0..req.target_size)
        .map(|p| {
            let m = (u64::from(p) * u64::from(total) / u64::from(req.target_size)) as u32;
            m.checked_sub(req.margin).filter(|m| *m < module_count)
        })
        .collect();

    let mut img = RgbaImage::from_pixel(req.target_size, req.target_size, req.light.rgba());
    for (y, row) in lookup.iter().enumerate() {
        let Some(my) = row else { continue };
        for (x, col) in lookup.iter().enumerate() {
            let Some(mx) = col else { continue };
            let idx = (my * module_count + mx) as usize;
            if modules[idx] == qrcode::Color::Dark {
                img.put_pixel(x as u32, y as u32, req.dark.rgba());
            }
        }
    }

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn encode_produces_exact_square() {
        let img = encode(&EncodeRequest::new("https://example.com", 800)).unwrap();
        assert_eq!(img.dimensions(), (800, 800));
    }

    #[test]
    fn encode_uses_only_dark_and_light() {
        let mut req = EncodeRequest::new("hello", 123);
        req.dark = "#102030".parse().unwrap();
        req.light = "#f0e0d0".parse().unwrap();
        let img = encode(&req).unwrap();
        for p in img.pixels() {
            assert!(*p == req.dark.rgba() || *p == req.light.rgba());
        }
    }

    #[test]
    fn encode_leaves_quiet_zone_light() {
        let mut req = EncodeRequest::new("quiet zone", 400);
        req.margin = 4;
        let img = encode(&req).unwrap();
        let white = Rgba([255, 255, 255, 255]);
        for i in 0..400 {
            assert_eq!(*img.get_pixel(i, 0), white);
            assert_eq!(*img.get_pixel(0, i), white);
            assert_eq!(*img.get_pixel(i, 399), white);
            assert_eq!(*img.get_pixel(399, i), white);
        }
    }

    #[test]
    fn encode_draws_finder_pattern_corner() {
        // Version 1 + quiet zone = 23 modules; pixel 42 lands on module 0 of the finder.
        let img = encode(&EncodeRequest::new("finder", 800)).unwrap();
        let px = *img.get_pixel(42, 42);
        assert_eq!(px, Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn encode_rejects_empty_text() {
        let err = encode(&EncodeRequest::new("", 400)).unwrap_err();
        assert!(matches!(err, QrError::InvalidInput(_)));
    }

    #[test]
    fn encode_rejects_zero_size() {
        let err = encode(&EncodeRequest::new("x", 0)).unwrap_err();
        assert!(matches!(err, QrError::InvalidDimension(_)));
    }

    #[test]
    fn encode_rejects_size_below_module_count() {
        let err = encode(&EncodeRequest::new("x", 10)).unwrap_err();
        assert!(matches!(err, QrError::InvalidDimension(_)));
    }

    #[test]
    fn encode_reports_capacity_overflow() {
        let text = "a".repeat(5000);
        let err = encode(&EncodeRequest::new(text, 800)).unwrap_err();
        assert!(matches!(err, QrError::Encoding(_)));
    }

    #[test]
    fn error_correction_parses_case_insensitive() {
        assert_eq!("q".parse::<ErrorCorrection>().unwrap(), ErrorCorrection::Q);
        assert_eq!("High".parse::<ErrorCorrection>().unwrap(), ErrorCorrection::H);
        assert!("X".parse::<ErrorCorrection>().is_err());
    }
}
