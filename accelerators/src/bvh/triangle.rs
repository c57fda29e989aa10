//! Triangle

use relight_core::common::*;
use relight_core::geometry::*;
use relight_core::mesh::*;
use relight_core::tracer::*;
use std::mem::size_of;

/// A world space triangle with the vertex attributes needed to fill a `Hit`.
#[derive(Clone, Debug)]
pub struct Triangle {
    /// Vertices in winding order.
    pub vertices: [Vertex; 3],

    /// Index of the source mesh in the scene.
    pub mesh: usize,

    /// Index of the face in the source mesh.
    pub face: usize,
}

impl Triangle {
    /// Create a `Triangle` from a mesh face.
    ///
    /// * `face` - The face.
    /// * `mesh` - Index of the mesh in the scene.
    pub fn new(face: &Face<'_>, mesh: usize) -> Self {
        Self {
            vertices: [face.vertex(0).clone(), face.vertex(1).clone(), face.vertex(2).clone()],
            mesh,
            face: face.index(),
        }
    }

    /// Returns the face view of the triangle.
    pub fn as_face(&self) -> Face<'_> {
        Face::new(self.face, &self.vertices[0], &self.vertices[1], &self.vertices[2])
    }

    /// Returns the bounding box.
    pub fn bounds(&self) -> Bounds3f {
        Bounds3f::new(self.vertices[0].position, self.vertices[1].position).union_point(self.vertices[2].position)
    }

    /// Returns true if the material alpha cuts the triangle out.
    pub fn is_cut_out(&self) -> bool {
        self.vertices[0].material.as_ref().is_some_and(|m| m.is_cut_out())
    }

    /// Intersects the ray `o + t d` for `t` in `(0, t_max)` with the
    /// triangle. Returns `t` and the barycentric weights of the second and
    /// third vertices.
    ///
    /// * `o`     - Ray origin.
    /// * `d`     - Ray direction. Need not be normalized.
    /// * `t_max` - Upper bound of the ray parameter.
    pub fn intersect(&self, o: Vec3, d: Vec3, t_max: Float) -> Option<(Float, Vec2)> {
        let p0 = self.vertices[0].position;
        let p1 = self.vertices[1].position;
        let p2 = self.vertices[2].position;

        // Translate vertices based on ray origin.
        let mut p0t = p0 - o;
        let mut p1t = p1 - o;
        let mut p2t = p2 - o;

        // Permute components of triangle vertices and ray direction.
        let kz = max_dimension(d.abs());
        let kx = (kz + 1) % 3;
        let ky = (kx + 1) % 3;
        let d = permute(d, kx, ky, kz);
        p0t = permute(p0t, kx, ky, kz);
        p1t = permute(p1t, kx, ky, kz);
        p2t = permute(p2t, kx, ky, kz);

        // Apply shear transformation to translated vertex positions.
        let sx = -d.x / d.z;
        let sy = -d.y / d.z;
        let sz = 1.0 / d.z;
        p0t.x += sx * p0t.z;
        p0t.y += sy * p0t.z;
        p1t.x += sx * p1t.z;
        p1t.y += sy * p1t.z;
        p2t.x += sx * p2t.z;
        p2t.y += sy * p2t.z;

        // Compute edge function coefficients e0, e1, e2.
        let mut e0 = p1t.x * p2t.y - p1t.y * p2t.x;
        let mut e1 = p2t.x * p0t.y - p2t.y * p0t.x;
        let mut e2 = p0t.x * p1t.y - p0t.y * p1t.x;

        // Fallback to double-precision test at triangle edges.
        if size_of::<Float>() == size_of::<f32>() && (e0 == 0.0 || e1 == 0.0 || e2 == 0.0) {
            let p2txp1ty = (p2t.x as f64) * (p1t.y as f64);
            let p2typ1tx = (p2t.y as f64) * (p1t.x as f64);
            e0 = (p2typ1tx - p2txp1ty) as Float;

            let p0txp2ty = (p0t.x as f64) * (p2t.y as f64);
            let p0typ2tx = (p0t.y as f64) * (p2t.x as f64);
            e1 = (p0typ2tx - p0txp2ty) as Float;

            let p1txp0ty = (p1t.x as f64) * (p0t.y as f64);
            let p1typ0tx = (p1t.y as f64) * (p0t.x as f64);
            e2 = (p1typ0tx - p1txp0ty) as Float;
        }

        // Perform triangle edge and determinant tests.
        if (e0 < 0.0 || e1 < 0.0 || e2 < 0.0) && (e0 > 0.0 || e1 > 0.0 || e2 > 0.0) {
            return None;
        }

        let det = e0 + e1 + e2;
        if det == 0.0 {
            return None;
        }

        // Compute scaled hit distance to triangle and test against ray `t` range.
        p0t.z *= sz;
        p1t.z *= sz;
        p2t.z *= sz;
        let t_scaled = e0 * p0t.z + e1 * p1t.z + e2 * p2t.z;
        if (det < 0.0 && (t_scaled >= 0.0 || t_scaled < t_max * det))
            || (det > 0.0 && (t_scaled <= 0.0 || t_scaled > t_max * det))
        {
            return None;
        }

        let inv_det = 1.0 / det;
        let b1 = e1 * inv_det;
        let b2 = e2 * inv_det;
        let t = t_scaled * inv_det;

        // Ensure that computed triangle `t` is conservatively greater than zero.
        let max_z_t = Vec3::new(p0t.z, p1t.z, p2t.z).abs().max_element();
        let delta_z = gamma(3) * max_z_t;

        let max_x_t = Vec3::new(p0t.x, p1t.x, p2t.x).abs().max_element();
        let max_y_t = Vec3::new(p0t.y, p1t.y, p2t.y).abs().max_element();
        let delta_x = gamma(5) * (max_x_t + max_z_t);
        let delta_y = gamma(5) * (max_y_t + max_z_t);

        let delta_e = 2.0 * (gamma(2) * max_x_t * max_y_t + delta_y * max_x_t + delta_x * max_y_t);

        let max_e = Vec3::new(e0, e1, e2).abs().max_element();
        let delta_t = 3.0 * (gamma(3) * max_e * max_z_t + delta_e * max_z_t + delta_z * max_e) * inv_det.abs();
        if t <= delta_t {
            return None;
        }

        Some((t, Vec2::new(b1, b2)))
    }

    /// Builds a hit at barycentric coordinates `bary`, filling the fields
    /// selected by `flags`.
    ///
    /// * `point` - World space hit point.
    /// * `t`     - Parametric distance along the segment.
    /// * `bary`  - Barycentric coordinates.
    /// * `flags` - Fields to fill in.
    pub fn hit(&self, point: Vec3, t: Float, bary: Vec2, flags: HitFlags) -> Hit {
        let face = self.as_face();
        let mut hit = Hit {
            point,
            t,
            mesh: self.mesh,
            face: self.face,
            ..Default::default()
        };
        if let Some(m) = self.vertices[0].material.as_ref() {
            hit.alpha = m.diffuse.a;
        }
        if flags.contains(HitFlags::NORMAL) {
            hit.normal = face.normal_at(bary);
        }
        if flags.contains(HitFlags::COLOR) {
            hit.color = face.diffuse_at(bary);
        }
        if flags.contains(HitFlags::UV) {
            hit.uv = face.uv_at(bary, UvLayer::Lightmap);
        }
        hit
    }
}

/// Returns the index of the largest component.
fn max_dimension(v: Vec3) -> usize {
    if v.x > v.y {
        if v.x > v.z {
            0
        } else {
            2
        }
    } else if v.y > v.z {
        1
    } else {
        2
    }
}

/// Returns the vector `(v[x], v[y], v[z])`.
fn permute(v: Vec3, x: usize, y: usize, z: usize) -> Vec3 {
    Vec3::new(v[x], v[y], v[z])
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use relight_core::color::*;
    use std::sync::Arc;

    fn triangle() -> Triangle {
        let v = |x: f32, y: f32| Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z, Rgb::gray(0.5), Uv::new(x, y), Uv::ZERO);
        Triangle {
            vertices: [v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)],
            mesh: 3,
            face: 7,
        }
    }

    #[test]
    fn hits_inside() {
        let tri = triangle();
        let (t, bary) = tri.intersect(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -2.0), 1.0).unwrap();
        assert!(approx_eq!(f32, t, 0.5, epsilon = 1e-6));
        assert!(approx_eq!(f32, bary.x, 0.25, epsilon = 1e-6));
        assert!(approx_eq!(f32, bary.y, 0.25, epsilon = 1e-6));
    }

    #[test]
    fn misses_outside_and_beyond_t_max() {
        let tri = triangle();
        assert!(tri.intersect(Vec3::new(0.75, 0.75, 1.0), -Vec3::Z, 2.0).is_none());
        assert!(tri.intersect(Vec3::new(0.25, 0.25, 1.0), -Vec3::Z, 0.5).is_none());
        assert!(tri.intersect(Vec3::new(0.25, 0.25, 1.0), Vec3::Z, 10.0).is_none());
    }

    #[test]
    fn hit_fills_requested_fields() {
        let mut tri = triangle();
        let material = Arc::new(Material::new("cut", Rgba::new(1.0, 0.5, 1.0, 0.25)));
        tri.vertices.iter_mut().for_each(|v| v.material = Some(Arc::clone(&material)));
        assert!(tri.is_cut_out());

        let bary = Vec2::new(0.5, 0.25);
        let hit = tri.hit(Vec3::ZERO, 0.5, bary, HitFlags::NORMAL | HitFlags::COLOR);
        assert_eq!(hit.normal, Vec3::Z);
        assert_eq!(hit.color, Rgb::new(0.5, 0.25, 0.5));
        assert_eq!(hit.uv, Uv::ZERO);
        assert_eq!(hit.alpha, 0.25);
        assert_eq!((hit.mesh, hit.face), (3, 7));

        let hit = tri.hit(Vec3::ZERO, 0.5, bary, HitFlags::UV);
        assert_eq!(hit.uv, Uv::new(0.5, 0.25));
        assert_eq!(hit.normal, Vec3::ZERO);
    }
}
