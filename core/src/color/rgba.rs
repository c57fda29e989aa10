//! RGBA color and lightmap output encodings

use super::Rgb;
use crate::common::*;
use std::fmt;

/// RGB color with an alpha channel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: Float,

    /// Green channel.
    pub g: Float,

    /// Blue channel.
    pub b: Float,

    /// Alpha channel.
    pub a: Float,
}

impl Default for Rgba {
    /// Returns opaque black.
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Create a new `Rgba`.
    ///
    /// * `r` - Red channel.
    /// * `g` - Green channel.
    /// * `b` - Blue channel.
    /// * `a` - Alpha channel.
    pub const fn new(r: Float, g: Float, b: Float, a: Float) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the color channels.
    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Encodes an HDR color in `[0, 2]` as a displayable LDR color by
    /// halving it. The shader is expected to multiply by 2.
    ///
    /// * `c` - HDR color.
    pub fn double_ldr(c: &Rgb) -> Self {
        let c = (*c * 0.5).clamp(0.0, 1.0);
        Self::new(c.r, c.g, c.b, 1.0)
    }

    /// Encodes an HDR color as RGBM, storing a shared multiplier in alpha.
    ///
    /// * `c`     - HDR color.
    /// * `range` - Maximum representable multiplier.
    pub fn rgbm(c: &Rgb, range: Float) -> Self {
        let m = clamp(c.max_component() / range, 0.0, 1.0);
        let m = (m * 255.0).ceil() / 255.0;
        if m == 0.0 {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        }
        let scaled = (*c / (m * range)).clamp(0.0, 1.0);
        Self::new(scaled.r, scaled.g, scaled.b, m)
    }

    /// Decodes an RGBM encoded color.
    ///
    /// * `range` - Multiplier range used during encoding.
    pub fn from_rgbm(&self, range: Float) -> Rgb {
        self.rgb() * (self.a * range)
    }

    /// Converts the color to 8-bit channels.
    pub fn to_bytes(&self) -> [u8; 4] {
        let q = |v: Float| (clamp(v, 0.0, 1.0) * 255.0 + 0.5) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        Self::new(c.r, c.g, c.b, 1.0)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.r, self.g, self.b, self.a)
    }
}
