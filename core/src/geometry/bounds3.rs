//! 3-D Axis Aligned Bounding Boxes.

use super::Axis;
use crate::common::*;
use glam::Vec3;
use std::fmt;

/// 3-D Axis Aligned Bounding Box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum bounds.
    pub p_min: Vec3,

    /// Maximum bounds.
    pub p_max: Vec3,
}

impl Default for Bounds3f {
    /// Returns an empty bounding box.
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds3f {
    /// Bounding box that contains nothing. Union with any point or box yields
    /// that point or box.
    pub const EMPTY: Self = Self {
        p_min: Vec3::splat(INFINITY),
        p_max: Vec3::splat(-INFINITY),
    };

    /// Creates a new bounding box from 2 points. The minimum and maximum
    /// bounds are used for each coordinate axis.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Vec3, p2: Vec3) -> Self {
        Self {
            p_min: p1.min(p2),
            p_max: p1.max(p2),
        }
    }

    /// Returns true if the bounding box contains nothing.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    /// Return a bounding box containing itself and a point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: Vec3) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Return a bounding box containing both bounding boxes.
    ///
    /// * `other` - The other bounding box.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            p_min: self.p_min.min(other.p_min),
            p_max: self.p_max.max(other.p_max),
        }
    }

    /// Returns the vector along the box diagonal from the minimum point to
    /// the maximum point.
    pub fn diagonal(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.p_max - self.p_min
        }
    }

    /// Returns the centre of the box.
    pub fn center(&self) -> Vec3 {
        0.5 * (self.p_min + self.p_max)
    }

    /// Returns the surface area of the six faces of the box.
    pub fn surface_area(&self) -> Float {
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// Returns the inside volume of the box.
    pub fn volume(&self) -> Float {
        let d = self.diagonal();
        d.x * d.y * d.z
    }

    /// Returns the index of which of the axes is longest.
    pub fn maximum_extent(&self) -> Axis {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            Axis::X
        } else if d.y > d.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Returns the continuous position of a point relative to the corners of
    /// the box, where a point at the minimum corner has offset `(0, 0, 0)`
    /// and a point at the maximum corner has offset `(1, 1, 1)`.
    ///
    /// * `p` - The point.
    pub fn offset(&self, p: Vec3) -> Vec3 {
        let mut o = p - self.p_min;
        let d = self.p_max - self.p_min;
        for i in 0..3 {
            if d[i] > 0.0 {
                o[i] /= d[i];
            }
        }
        o
    }

    /// Returns the radius of a sphere centred at the box centre that
    /// encloses the box.
    pub fn bounding_radius(&self) -> Float {
        0.5 * self.diagonal().length()
    }

    /// Returns true if the point is inside or on the box.
    ///
    /// * `p` - The point.
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.p_min).all() && p.cmple(self.p_max).all()
    }

    /// Returns true if the segment `origin + t * dir` for `t` in `[0, t_max]`
    /// overlaps the box. Uses precomputed reciprocals of the direction and the
    /// sign of each direction component.
    ///
    /// * `origin`     - Segment origin.
    /// * `inv_dir`    - Reciprocal of the segment direction.
    /// * `dir_is_neg` - 1 for each negative direction component.
    /// * `t_max`      - Parametric end of the segment.
    pub fn intersect_p_inv(&self, origin: Vec3, inv_dir: Vec3, dir_is_neg: [u8; 3], t_max: Float) -> bool {
        let bounds = [self.p_min, self.p_max];

        // Check for ray intersection against x and y slabs.
        let mut t_min = (bounds[dir_is_neg[0] as usize].x - origin.x) * inv_dir.x;
        let mut t_max_x = (bounds[1 - dir_is_neg[0] as usize].x - origin.x) * inv_dir.x;
        let ty_min = (bounds[dir_is_neg[1] as usize].y - origin.y) * inv_dir.y;
        let mut ty_max = (bounds[1 - dir_is_neg[1] as usize].y - origin.y) * inv_dir.y;

        // Update `t_max_x` and `ty_max` to ensure robust bounds intersection.
        let robust = 1.0 + 2.0 * gamma(3);
        t_max_x *= robust;
        ty_max *= robust;

        if t_min > ty_max || ty_min > t_max_x {
            return false;
        }
        if ty_min > t_min {
            t_min = ty_min;
        }
        if ty_max < t_max_x {
            t_max_x = ty_max;
        }

        // Check for ray intersection against z slab.
        let tz_min = (bounds[dir_is_neg[2] as usize].z - origin.z) * inv_dir.z;
        let mut tz_max = (bounds[1 - dir_is_neg[2] as usize].z - origin.z) * inv_dir.z;
        tz_max *= robust;

        if t_min > tz_max || tz_min > t_max_x {
            return false;
        }
        if tz_min > t_min {
            t_min = tz_min;
        }
        if tz_max < t_max_x {
            t_max_x = tz_max;
        }

        t_min < t_max && t_max_x > 0.0
    }
}

impl From<Vec3> for Bounds3f {
    /// Create a degenerate bounding box around a single point.
    fn from(p: Vec3) -> Self {
        Self { p_min: p, p_max: p }
    }
}

impl fmt::Display for Bounds3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.p_min, self.p_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_union_point() {
        let b = Bounds3f::EMPTY.union_point(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.p_min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.p_max, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.volume(), 0.0);
    }

    #[test]
    fn empty_has_zero_volume() {
        assert!(Bounds3f::EMPTY.is_empty());
        assert_eq!(Bounds3f::EMPTY.volume(), 0.0);
    }

    #[test]
    fn volume_and_extent() {
        let b = Bounds3f::new(Vec3::ZERO, Vec3::new(2.0, 1.0, 3.0));
        assert_eq!(b.volume(), 6.0);
        assert_eq!(b.surface_area(), 2.0 * (2.0 + 6.0 + 3.0));
        assert_eq!(b.maximum_extent(), Axis::Z);
    }

    #[test]
    fn segment_overlap() {
        let b = Bounds3f::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let o = Vec3::new(0.0, 0.0, -5.0);
        let d = Vec3::new(0.0, 0.0, 1.0);
        let inv = d.recip();
        let neg = [0, 0, 0];
        assert!(b.intersect_p_inv(o, inv, neg, 10.0));
        assert!(!b.intersect_p_inv(o, inv, neg, 3.0));
    }
}
