//! Configuration management: defaults, validation, loading from the environment.

pub mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::AppConfig;

use serde::{Deserialize, Serialize};

/// A setting as returned to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingInfo {
    pub key: String,
    pub value: String,
    pub default: String,
    pub description: String,
}

impl AppConfig {
    /// Effective value of every known setting, in declaration order.
    pub fn setting_infos(&self) -> Vec<SettingInfo> {
        defaults::setting_keys()
            .filter_map(|key| {
                let def = defaults::DEFAULT_SETTINGS.get(key)?;
                Some(SettingInfo {
                    key: key.to_string(),
                    value: self.effective_value(key),
                    default: def.default.to_string(),
                    description: def.description.to_string(),
                })
            })
            .collect()
    }

    fn effective_value(&self, key: &str) -> String {
        let c = &self.render.composition;
        match key {
            "SERVER_PORT" => self.server_port.to_string(),
            "QR_DISPLAY_SIZE" => self.render.display_size.to_string(),
            "QR_OVERSAMPLE" => self.render.oversample.to_string(),
            "QR_MARGIN" => self.render.margin.to_string(),
            "QR_ERROR_CORRECTION" => self.error_correction.to_string(),
            "QR_DARK_COLOR" => self.dark_color.to_string(),
            "QR_LIGHT_COLOR" => self.light_color.to_string(),
            "LOGO_SCALE" => c.logo_scale.to_string(),
            "LOGO_PADDING" => c.padding_fraction.to_string(),
            "LOGO_CORNER_RADIUS" => c.corner_radius_fraction.to_string(),
            "MAX_LOGO_BYTES" => self.max_logo_bytes.to_string(),
            "PREVIEW_SIZE" => self.preview_size.to_string(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_infos_cover_every_default() {
        let infos = AppConfig::default().setting_infos();
        assert_eq!(infos.len(), defaults::setting_keys().count());
        for info in &infos {
            assert!(!info.value.is_empty(), "{} has no value", info.key);
        }
    }

    #[test]
    fn default_config_reports_default_values() {
        let infos = AppConfig::default().setting_infos();
        let scale = infos.iter().find(|i| i.key == "LOGO_SCALE").unwrap();
        assert_eq!(scale.value, "0.2");
        let dark = infos.iter().find(|i| i.key == "QR_DARK_COLOR").unwrap();
        assert_eq!(dark.value, dark.default);
    }
}
