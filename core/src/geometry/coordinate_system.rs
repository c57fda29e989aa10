//! 3-D Coordinate System

use glam::Vec3;

/// An orthonormal frame built around a surface normal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoordinateSystem {
    /// First tangent.
    pub tangent: Vec3,

    /// Second tangent.
    pub bitangent: Vec3,

    /// The unit normal the frame was built from.
    pub normal: Vec3,
}

impl From<Vec3> for CoordinateSystem {
    /// Create a new coordinate system from a single unit vector.
    ///
    /// A second vector is constructed from the first by zeroing one of the
    /// coordinates, swapping the remaining two and negating one of them. The
    /// third is the cross product of the first two.
    ///
    /// * `normal` - Unit vector used as the local z-axis.
    fn from(normal: Vec3) -> Self {
        let tangent = if normal.x.abs() > normal.y.abs() {
            Vec3::new(-normal.z, 0.0, normal.x) / (normal.x * normal.x + normal.z * normal.z).sqrt()
        } else {
            Vec3::new(0.0, normal.z, -normal.y) / (normal.y * normal.y + normal.z * normal.z).sqrt()
        };
        let bitangent = normal.cross(tangent);
        Self {
            tangent,
            bitangent,
            normal,
        }
    }
}

impl CoordinateSystem {
    /// Transforms a direction from the local frame (z-up) to world space.
    ///
    /// * `v` - Local direction.
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        v.x * self.tangent + v.y * self.bitangent + v.z * self.normal
    }
}
