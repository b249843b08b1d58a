//! Hex color values for the dark/light modules and the logo plate.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::QrError;

/// An RGBA color written in CSS hex notation (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub Rgba<u8>);

impl Color {
    pub const BLACK: Color = Color(Rgba([0, 0, 0, 255]));
    pub const WHITE: Color = Color(Rgba([255, 255, 255, 255]));

    pub fn rgba(self) -> Rgba<u8> {
        self.0
    }

    pub fn is_opaque(self) -> bool {
        self.0[3] == 255
    }
}

impl FromStr for Color {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QrError::InvalidInput(format!("Invalid color: {s:?} (expected #rrggbb)"));

        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        // Short forms double each nibble: #f80 == #ff8800.
        let expanded: String = match hex.len() {
            3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_string(),
            _ => return Err(invalid()),
        };

        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if expanded.len() == 8 { channel(6)? } else { 255 };

        Ok(Color(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha])))
    }
}

impl TryFrom<String> for Color {
    type Error = QrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0.0;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_form() {
        let c: Color = "#1a2B3c".parse().unwrap();
        assert_eq!(c.rgba(), Rgba([0x1a, 0x2b, 0x3c, 255]));
    }

    #[test]
    fn parses_short_form_with_alpha() {
        let c: Color = "#f808".parse().unwrap();
        assert_eq!(c.rgba(), Rgba([0xff, 0x88, 0x00, 0x88]));
        assert!(!c.is_opaque());
    }

    #[test]
    fn rejects_missing_hash_and_bad_lengths() {
        assert!("000000".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
    }

    #[test]
    fn display_drops_opaque_alpha() {
        assert_eq!(Color::WHITE.to_string(), "#ffffff");
        assert_eq!(Color(Rgba([1, 2, 3, 4])).to_string(), "#01020304");
    }
}
