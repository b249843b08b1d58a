//! Runtime application configuration loaded from the environment.

use anyhow::Context;
use qr_compositor::{Color, CompositionSpec, ErrorCorrection, PlateLayout, RenderSettings};

use super::defaults::{get_default, setting_keys};
use super::validation::validate_setting;

/// Largest oversampled barcode side the encoder may allocate (256 MiB RGBA).
pub const MAX_SOURCE_SIZE: u32 = 8192;

/// Runtime configuration populated from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub render: RenderSettings,
    pub error_correction: ErrorCorrection,
    pub dark_color: Color,
    pub light_color: Color,
    pub max_logo_bytes: usize,
    pub preview_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 8080,
            render: RenderSettings::default(),
            error_correction: ErrorCorrection::H,
            dark_color: Color::BLACK,
            light_color: Color::WHITE,
            max_logo_bytes: qr_compositor::DEFAULT_MAX_LOGO_BYTES,
            preview_size: qr_compositor::DEFAULT_PREVIEW_SIZE,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Result<Self, anyhow::Error> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// unset or empty keys. Invalid values are an error.
    pub fn load_from<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in setting_keys() {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                validate_setting(key, value.trim())
                    .map_err(|e| anyhow::anyhow!("invalid {key}={value:?}: {e}"))?;
            }
        }

        let g = |key: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or_else(|| get_default(key).map(str::to_string))
                .unwrap_or_default()
        };

        let composition = CompositionSpec {
            logo_scale: parse(&g("LOGO_SCALE"), "LOGO_SCALE")?,
            padding_fraction: parse(&g("LOGO_PADDING"), "LOGO_PADDING")?,
            corner_radius_fraction: parse(&g("LOGO_CORNER_RADIUS"), "LOGO_CORNER_RADIUS")?,
            plate_color: Color::WHITE,
        };

        let config = Self {
            server_port: parse(&g("SERVER_PORT"), "SERVER_PORT")?,
            render: RenderSettings {
                display_size: parse(&g("QR_DISPLAY_SIZE"), "QR_DISPLAY_SIZE")?,
                oversample: parse(&g("QR_OVERSAMPLE"), "QR_OVERSAMPLE")?,
                margin: parse(&g("QR_MARGIN"), "QR_MARGIN")?,
                composition,
            },
            error_correction: parse(&g("QR_ERROR_CORRECTION"), "QR_ERROR_CORRECTION")?,
            dark_color: parse(&g("QR_DARK_COLOR"), "QR_DARK_COLOR")?,
            light_color: parse(&g("QR_LIGHT_COLOR"), "QR_LIGHT_COLOR")?,
            max_logo_bytes: parse(&g("MAX_LOGO_BYTES"), "MAX_LOGO_BYTES")?,
            preview_size: parse(&g("PREVIEW_SIZE"), "PREVIEW_SIZE")?,
        };
        config.check_render_settings()?;
        Ok(config)
    }

    /// Checks that need more than one key: the oversampled barcode size and
    /// whether the logo plate fits the display.
    fn check_render_settings(&self) -> Result<(), anyhow::Error> {
        let render = &self.render;
        let source = render
            .source_size()
            .context("invalid QR_DISPLAY_SIZE x QR_OVERSAMPLE")?;
        if source > MAX_SOURCE_SIZE {
            anyhow::bail!(
                "QR_DISPLAY_SIZE x QR_OVERSAMPLE = {source}px exceeds the {MAX_SOURCE_SIZE}px limit"
            );
        }
        PlateLayout::compute(render.display_size, (1, 1), &render.composition)
            .context("LOGO_SCALE and LOGO_PADDING do not fit QR_DISPLAY_SIZE")?;
        Ok(())
    }
}

fn parse<T>(s: &str, key: &str) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.parse::<T>().with_context(|| format!("invalid {key}={s:?}"))
}
