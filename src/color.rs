// src/color.rs

//! Color types used by the matcher: 8-bit sRGB (`Rgb`) and CIE L*a*b* (`Lab`),
//! plus conversions between hex strings, RGB and Lab.

use std::fmt;
use thiserror::Error;

/// D65 reference white used for the XYZ -> Lab step.
const REF_X: f64 = 0.95047;
const REF_Y: f64 = 1.0;
const REF_Z: f64 = 1.08883;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color {0:?}")]
pub struct HexColorError(pub String);

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parses `#RRGGBB` or `RRGGBB` (either case).
    pub fn from_hex(hex: &str) -> Result<Self, HexColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(HexColorError(hex.to_string()));
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| HexColorError(hex.to_string()))?;
        Ok(Rgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8))
    }

    /// Uppercase `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_lab(&self) -> Lab {
        Lab::from(*self)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A CIE L*a*b* color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    /// Euclidean (CIE76) distance.
    pub fn distance(&self, other: &Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

impl From<Rgb> for Lab {
    fn from(rgb: Rgb) -> Self {
        let r = linearize(rgb.r);
        let g = linearize(rgb.g);
        let b = linearize(rgb.b);

        let x = r * 0.4124 + g * 0.3576 + b * 0.1805;
        let y = r * 0.2126 + g * 0.7152 + b * 0.0722;
        let z = r * 0.0193 + g * 0.1192 + b * 0.9505;

        let fx = lab_f(x / REF_X);
        let fy = lab_f(y / REF_Y);
        let fz = lab_f(z / REF_Z);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

fn lab_f(t: f64) -> f64 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}
