//! RGB color

use crate::common::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Sub, SubAssign};

/// Number of channels in `Rgb`.
pub const RGB_CHANNELS: usize = 3;

/// Linear RGB color used for radiance, reflectance and photon energy.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rgb {
    /// Red channel.
    pub r: Float,

    /// Green channel.
    pub g: Float,

    /// Blue channel.
    pub b: Float,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// White.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a new `Rgb`.
    ///
    /// * `r` - Red channel.
    /// * `g` - Green channel.
    /// * `b` - Blue channel.
    pub const fn new(r: Float, g: Float, b: Float) -> Self {
        Self { r, g, b }
    }

    /// Create a gray color with all channels set to `v`.
    ///
    /// * `v` - Channel value.
    pub const fn gray(v: Float) -> Self {
        Self::new(v, v, v)
    }

    /// Returns the luminance (CIE Y) of the color.
    pub fn luminance(&self) -> Float {
        0.212671 * self.r + 0.715160 * self.g + 0.072169 * self.b
    }

    /// Returns true if the values are zero everywhere.
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// Returns true if any channel is NaN.
    pub fn has_nans(&self) -> bool {
        self.r.is_nan() || self.g.is_nan() || self.b.is_nan()
    }

    /// Returns the largest channel value.
    pub fn max_component(&self) -> Float {
        max(self.r, max(self.g, self.b))
    }

    /// Clamps every channel to `[low, high]`.
    ///
    /// * `low`  - Lower bound.
    /// * `high` - Upper bound.
    pub fn clamp(&self, low: Float, high: Float) -> Self {
        Self::new(
            clamp(self.r, low, high),
            clamp(self.g, low, high),
            clamp(self.b, low, high),
        )
    }

    /// Returns the channels as an array.
    pub fn to_array(&self) -> [Float; RGB_CHANNELS] {
        [self.r, self.g, self.b]
    }
}

impl From<[Float; RGB_CHANNELS]> for Rgb {
    fn from(c: [Float; RGB_CHANNELS]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl Add for Rgb {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

impl AddAssign for Rgb {
    fn add_assign(&mut self, other: Self) {
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
    }
}

impl Sub for Rgb {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.r - other.r, self.g - other.g, self.b - other.b)
    }
}

impl SubAssign for Rgb {
    fn sub_assign(&mut self, other: Self) {
        self.r -= other.r;
        self.g -= other.g;
        self.b -= other.b;
    }
}

impl Mul for Rgb {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }
}

impl MulAssign for Rgb {
    fn mul_assign(&mut self, other: Self) {
        self.r *= other.r;
        self.g *= other.g;
        self.b *= other.b;
    }
}

impl Mul<Float> for Rgb {
    type Output = Self;

    fn mul(self, f: Float) -> Self {
        Self::new(self.r * f, self.g * f, self.b * f)
    }
}

impl Mul<Rgb> for Float {
    type Output = Rgb;

    fn mul(self, c: Rgb) -> Rgb {
        c * self
    }
}

impl MulAssign<Float> for Rgb {
    fn mul_assign(&mut self, f: Float) {
        self.r *= f;
        self.g *= f;
        self.b *= f;
    }
}

impl Div<Float> for Rgb {
    type Output = Self;

    fn div(self, f: Float) -> Self {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        self * inv
    }
}

impl DivAssign<Float> for Rgb {
    fn div_assign(&mut self, f: Float) {
        debug_assert!(f != 0.0);
        *self *= 1.0 / f;
    }
}

impl Index<usize> for Rgb {
    type Output = Float;

    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.r,
            1 => &self.g,
            2 => &self.b,
            _ => panic!("Rgb index {i} out of bounds"),
        }
    }
}

impl IndexMut<usize> for Rgb {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        match i {
            0 => &mut self.r,
            1 => &mut self.g,
            2 => &mut self.b,
            _ => panic!("Rgb index {i} out of bounds"),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn white_has_unit_luminance() {
        assert!(approx_eq!(f32, Rgb::WHITE.luminance(), 1.0, epsilon = 1e-5));
        assert_eq!(Rgb::BLACK.luminance(), 0.0);
    }

    #[test]
    fn channel_arithmetic() {
        let a = Rgb::new(1.0, 2.0, 3.0);
        let b = Rgb::new(0.5, 0.5, 2.0);
        assert_eq!(a * b, Rgb::new(0.5, 1.0, 6.0));
        assert_eq!(a + b, Rgb::new(1.5, 2.5, 5.0));
        assert_eq!(2.0 * a, Rgb::new(2.0, 4.0, 6.0));
        assert_eq!(a / 2.0, Rgb::new(0.5, 1.0, 1.5));
        assert_eq!(a[2], 3.0);
    }

    #[test]
    fn nans_are_detected() {
        assert!(Rgb::new(Float::NAN, 0.0, 0.0).has_nans());
        assert!(!Rgb::WHITE.has_nans());
    }
}
