//! Hex color values as entered in the style form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QrError;

/// An RGBA color parsed from `#rgb`, `#rrggbb` or `#rrggbbaa`.
///
/// Formats back to lowercase `#rrggbb`, with the alpha pair appended only
/// when the color is not fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub const BLACK: HexColor = HexColor::rgb(0x00, 0x00, 0x00);
    pub const WHITE: HexColor = HexColor::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        HexColor { r, g, b, a: 0xff }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear interpolation between two colors, `t` clamped to 0..=1.
    pub fn lerp(self, other: HexColor, t: f64) -> HexColor {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        HexColor {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Opacity in 0..=1, as used by SVG `stop-opacity`/`fill-opacity`.
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// `#rrggbb` without the alpha channel.
    pub fn to_rgb_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QrError::InvalidColor(s.to_string());

        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|v| v * 17);
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

        match hex.len() {
            3 => Ok(HexColor::rgb(
                nibble(0).map_err(|_| invalid())?,
                nibble(1).map_err(|_| invalid())?,
                nibble(2).map_err(|_| invalid())?,
            )),
            6 | 8 => {
                let a = if hex.len() == 8 {
                    pair(6).map_err(|_| invalid())?
                } else {
                    0xff
                };
                Ok(HexColor {
                    r: pair(0).map_err(|_| invalid())?,
                    g: pair(2).map_err(|_| invalid())?,
                    b: pair(4).map_err(|_| invalid())?,
                    a,
                })
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = QrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rgb_hex())?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}
