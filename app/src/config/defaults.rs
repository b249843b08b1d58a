//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("SERVER_PORT", "8080", "HTTP port the studio listens on"),
    ("QR_DISPLAY_SIZE", "400", "Side of the generated PNG in pixels"),
    ("QR_OVERSAMPLE", "2", "Barcode is encoded at this multiple of the display size"),
    ("QR_MARGIN", "1", "Quiet zone around the symbol, in modules"),
    ("QR_ERROR_CORRECTION", "H", "Default error-correction level (L, M, Q, H)"),
    ("QR_DARK_COLOR", "#000000", "Default color of dark modules"),
    ("QR_LIGHT_COLOR", "#ffffff", "Default color of light modules"),
    ("LOGO_SCALE", "0.2", "Logo box side as a fraction of the display size"),
    ("LOGO_PADDING", "0.15", "Plate padding as a fraction of the logo box"),
    ("LOGO_CORNER_RADIUS", "0.15", "Plate corner radius as a fraction of the plate side"),
    ("MAX_LOGO_BYTES", "10485760", "Largest accepted logo upload in bytes"),
    ("PREVIEW_SIZE", "256", "On-page preview size in CSS pixels"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Setting keys in declaration order.
pub fn setting_keys() -> impl Iterator<Item = &'static str> {
    DEFS.iter().map(|(key, _, _)| *key)
}

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
