//! End-to-end render: encode at high resolution, then compose.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::Color;
use crate::compose::{self, CompositionSpec, PlateLayout};
use crate::encoder::{self, DEFAULT_MARGIN, EncodeRequest, ErrorCorrection};
use crate::error::{QrError, Result};
use crate::{DEFAULT_DISPLAY_SIZE, DEFAULT_OVERSAMPLE};

/// Output geometry shared by every generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub display_size: u32,
    /// Barcode is encoded at `display_size * oversample` before downscaling.
    pub oversample: u32,
    pub margin: u32,
    pub composition: CompositionSpec,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            display_size: DEFAULT_DISPLAY_SIZE,
            oversample: DEFAULT_OVERSAMPLE,
            margin: DEFAULT_MARGIN,
            composition: CompositionSpec::default(),
        }
    }
}

impl RenderSettings {
    pub fn source_size(&self) -> Result<u32> {
        self.display_size
            .checked_mul(self.oversample)
            .filter(|s| *s > 0)
            .ok_or_else(|| {
                QrError::InvalidDimension(format!(
                    "invalid render size {}x{}",
                    self.display_size, self.oversample
                ))
            })
    }
}

/// The user-facing inputs of one generation.
#[derive(Debug, Clone)]
pub struct QrContent {
    pub text: String,
    pub error_correction: ErrorCorrection,
    pub dark: Color,
    pub light: Color,
}

impl QrContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error_correction: ErrorCorrection::default(),
            dark: Color::BLACK,
            light: Color::WHITE,
        }
    }
}

/// Render one artifact at `settings.display_size`.
pub fn render(content: &QrContent, logo: Option<&RgbaImage>, settings: &RenderSettings) -> Result<RgbaImage> {
    if settings.display_size == 0 {
        return Err(QrError::InvalidDimension(
            "display size must be positive".into(),
        ));
    }
    let request = EncodeRequest {
        text: content.text.clone(),
        error_correction: content.error_correction,
        target_size: settings.source_size()?,
        dark: content.dark,
        light: content.light,
        margin: settings.margin,
    };
    let barcode = encoder::encode(&request)?;

    if let Some(logo) = logo {
        warn_if_plate_exceeds_recovery(settings, logo, content.error_correction);
    }

    let artifact = compose::compose(&barcode, settings.display_size, logo, &settings.composition)?;
    debug!(
        display_size = settings.display_size,
        with_logo = logo.is_some(),
        "Rendered QR artifact"
    );
    Ok(artifact)
}

/// Share of the display covered by the plate.
pub fn plate_coverage(layout: &PlateLayout, display_size: u32) -> f64 {
    let display_area = f64::from(display_size) * f64::from(display_size);
    layout.plate.area() as f64 / display_area
}

fn warn_if_plate_exceeds_recovery(settings: &RenderSettings, logo: &RgbaImage, level: ErrorCorrection) {
    let Ok(layout) = PlateLayout::compute(settings.display_size, logo.dimensions(), &settings.composition) else {
        return;
    };
    let coverage = plate_coverage(&layout, settings.display_size);
    if coverage > level.recovery_fraction() {
        warn!(
            coverage,
            level = %level,
            "Logo plate covers more than the error-correction level can recover; code may not scan"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn render_defaults_to_display_size() {
        let img = render(&QrContent::new("https://example.com"), None, &RenderSettings::default()).unwrap();
        assert_eq!(img.dimensions(), (400, 400));
    }

    #[test]
    fn render_with_logo_draws_plate() {
        let logo = RgbaImage::from_pixel(100, 50, Rgba([255, 0, 0, 255]));
        let img = render(&QrContent::new("hello"), Some(&logo), &RenderSettings::default()).unwrap();
        assert_eq!(*img.get_pixel(200, 150), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn render_honours_custom_colors() {
        let mut content = QrContent::new("colors");
        content.dark = "#0000ff".parse().unwrap();
        let img = render(&content, None, &RenderSettings::default()).unwrap();
        assert!(img.pixels().any(|p| *p == Rgba([0, 0, 255, 255])));
        assert!(img.pixels().all(|p| p[0] == p[1] && p[2] == 255));
    }

    #[test]
    fn render_rejects_empty_text() {
        let err = render(&QrContent::new(""), None, &RenderSettings::default()).unwrap_err();
        assert!(matches!(err, QrError::InvalidInput(_)));
    }

    #[test]
    fn render_rejects_zero_oversample() {
        let settings = RenderSettings {
            oversample: 0,
            ..RenderSettings::default()
        };
        let err = render(&QrContent::new("x"), None, &settings).unwrap_err();
        assert!(matches!(err, QrError::InvalidDimension(_)));
    }

    #[test]
    fn default_plate_fits_high_recovery() {
        let layout = PlateLayout::compute(400, (64, 64), &CompositionSpec::default()).unwrap();
        let coverage = plate_coverage(&layout, 400);
        assert!(coverage < ErrorCorrection::H.recovery_fraction());
        assert!(coverage > ErrorCorrection::L.recovery_fraction() / 2.0);
    }
}
