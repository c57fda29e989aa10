//! 2-D Axis Aligned Bounding Boxes.

use crate::common::*;
use glam::Vec2;
use std::fmt;

/// 2-D Axis Aligned Bounding Box, used for rectangles in UV space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds2f {
    /// Minimum bounds.
    pub p_min: Vec2,

    /// Maximum bounds.
    pub p_max: Vec2,
}

impl Default for Bounds2f {
    /// Returns an empty bounding box.
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds2f {
    /// Bounding box that contains nothing.
    pub const EMPTY: Self = Self {
        p_min: Vec2::splat(INFINITY),
        p_max: Vec2::splat(-INFINITY),
    };

    /// Creates a new bounding box from 2 points.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        Self {
            p_min: p1.min(p2),
            p_max: p1.max(p2),
        }
    }

    /// Return a bounding box containing itself and a point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: Vec2) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Returns true if the bounding box contains nothing.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y
    }

    /// Returns the area of the rectangle.
    pub fn area(&self) -> Float {
        if self.is_empty() {
            0.0
        } else {
            let d = self.p_max - self.p_min;
            d.x * d.y
        }
    }

    /// Converts the normalized rectangle to an inclusive-exclusive pixel
    /// range `(x0, y0, x1, y1)` clamped to the image.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    pub fn pixel_range(&self, width: usize, height: usize) -> (usize, usize, usize, usize) {
        if self.is_empty() || width == 0 || height == 0 {
            return (0, 0, 0, 0);
        }
        let to_pixel = |v: Float, size: usize| -> usize { clamp(v * size as Float, 0.0, size as Float) as usize };
        let to_pixel_end =
            |v: Float, size: usize| -> usize { clamp((v * size as Float).ceil(), 0.0, size as Float) as usize };
        (
            to_pixel(self.p_min.x, width),
            to_pixel(self.p_min.y, height),
            to_pixel_end(self.p_max.x, width),
            to_pixel_end(self.p_max.y, height),
        )
    }
}

impl fmt::Display for Bounds2f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.p_min, self.p_max)
    }
}
