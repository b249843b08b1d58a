//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{4}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$").unwrap()
});

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "SERVER_PORT" => validate_int_range(value, 1, 65535)?,
        "QR_DISPLAY_SIZE" => validate_int_range(value, 64, 4096)?,
        "QR_OVERSAMPLE" => validate_int_range(value, 1, 8)?,
        "QR_MARGIN" => validate_int_range(value, 0, 16)?,
        "PREVIEW_SIZE" => validate_int_range(value, 32, 2048)?,
        "MAX_LOGO_BYTES" => validate_int_range(value, 1024, 100 * 1024 * 1024)?,
        "QR_ERROR_CORRECTION" => {
            if !["L", "M", "Q", "H"].contains(&value.to_ascii_uppercase().as_str()) {
                return Err("must be one of L, M, Q, H".into());
            }
        }
        "QR_DARK_COLOR" | "QR_LIGHT_COLOR" => {
            if !RE_HEX_COLOR.is_match(value) {
                return Err("must be a hex color like #000000".into());
            }
        }
        "LOGO_SCALE" => {
            let v: f64 = value.parse().map_err(|_| "must be a float")?;
            if !(v > 0.0 && v < 1.0) {
                return Err("must be greater than 0.0 and less than 1.0".into());
            }
        }
        "LOGO_PADDING" | "LOGO_CORNER_RADIUS" => {
            let v: f64 = value.parse().map_err(|_| "must be a float")?;
            if !(0.0..1.0).contains(&v) {
                return Err("must be at least 0.0 and less than 1.0".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
