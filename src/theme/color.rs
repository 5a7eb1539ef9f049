use crate::utils::{impl_deserialize_from_str, impl_serialize_from_display};
use hex::{FromHex, FromHexError};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// An RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl_deserialize_from_str!(Color);
impl_serialize_from_display!(Color);

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The perceptual luma of this color, in the `[0, 255]` range.
    pub fn luma(&self) -> f64 {
        0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64
    }

    /// The HSL lightness of this color, in the `[0, 1]` range.
    pub fn lightness(&self) -> f64 {
        self.to_hsl().2
    }

    /// Get a copy of this color with its HSL lightness shifted by `delta`.
    ///
    /// The resulting lightness is clamped to `[0, 1]`.
    pub fn shift_lightness(&self, delta: f64) -> Self {
        let (hue, saturation, lightness) = self.to_hsl();
        Self::from_hsl(hue, saturation, (lightness + delta).clamp(0.0, 1.0))
    }

    /// Get a color that contrasts against this one.
    ///
    /// Light colors are darkened and dark colors are lightened by `amount`.
    pub fn contrasting(&self, amount: f64) -> Self {
        if self.luma() > 128.0 { self.shift_lightness(-amount) } else { self.shift_lightness(amount) }
    }

    fn to_hsl(self) -> (f64, f64, f64) {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;
        let delta = max - min;
        if delta == 0.0 {
            return (0.0, 0.0, lightness);
        }
        let saturation = if lightness < 0.5 { delta / (max + min) } else { delta / (2.0 - max - min) };
        let hue = if max == r {
            ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        (hue / 6.0, saturation, lightness)
    }

    fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        if saturation == 0.0 {
            let value = Self::to_channel(lightness);
            return Self::new(value, value, value);
        }
        let q =
            if lightness < 0.5 { lightness * (1.0 + saturation) } else { lightness + saturation - lightness * saturation };
        let p = 2.0 * lightness - q;
        let r = Self::hue_to_rgb(p, q, hue + 1.0 / 3.0);
        let g = Self::hue_to_rgb(p, q, hue);
        let b = Self::hue_to_rgb(p, q, hue - 1.0 / 3.0);
        Self::new(Self::to_channel(r), Self::to_channel(g), Self::to_channel(b))
    }

    fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    fn to_channel(value: f64) -> u8 {
        (value * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

/// Expand a `#rgb` color into `#rrggbb` by doubling every nibble.
///
/// Any other input is returned as is.
pub fn expand_hex(color: &str) -> String {
    match color.strip_prefix('#') {
        Some(digits) if digits.len() == 3 => {
            let mut output = String::from("#");
            for c in digits.chars() {
                output.push(c);
                output.push(c);
            }
            output
        }
        _ => color.to_string(),
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let expanded = expand_hex(input);
        let digits = expanded.strip_prefix('#').unwrap_or(&expanded);
        if digits.len() != 6 {
            return Err(ParseColorError::Length(input.to_string()));
        }
        let [r, g, b] = <[u8; 3]>::from_hex(digits)?;
        Ok(Self { r, g, b })
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode([self.r, self.g, self.b]))
    }
}

impl From<syntect::highlighting::Color> for Color {
    fn from(color: syntect::highlighting::Color) -> Self {
        Self::new(color.r, color.g, color.b)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ParseColorError {
    #[error("invalid hex color: {0}")]
    Hex(#[from] FromHexError),

    #[error("color '{0}' must have 3 or 6 hex digits")]
    Length(String),
}
