//! Face

use super::{UvLayer, Vertex};
use crate::color::*;
use crate::common::*;
use crate::geometry::*;

/// A read-only view of a mesh triangle.
///
/// Barycentric coordinates `(u, v)` locate `a + u (b - a) + v (c - a)`, so
/// vertex `a` has weight `1 - u - v`, `b` has weight `u` and `c` has weight
/// `v`. Interpolation is affine in both world and UV space.
#[derive(Copy, Clone, Debug)]
pub struct Face<'m> {
    /// Index of the face in the owning mesh.
    index: usize,

    /// First vertex.
    a: &'m Vertex,

    /// Second vertex.
    b: &'m Vertex,

    /// Third vertex.
    c: &'m Vertex,
}

impl<'m> Face<'m> {
    /// Create a new `Face`.
    ///
    /// * `index` - Index of the face in the owning mesh.
    /// * `a`     - First vertex.
    /// * `b`     - Second vertex.
    /// * `c`     - Third vertex.
    pub fn new(index: usize, a: &'m Vertex, b: &'m Vertex, c: &'m Vertex) -> Self {
        Self { index, a, b, c }
    }

    /// Returns the index of the face in the owning mesh.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns a face vertex in winding order.
    ///
    /// * `i` - Vertex number in `[0, 3)`.
    pub fn vertex(&self, i: usize) -> &'m Vertex {
        match i {
            0 => self.a,
            1 => self.b,
            2 => self.c,
            _ => panic!("face vertex index {i} out of bounds"),
        }
    }

    /// Returns the world space area of the triangle.
    pub fn area(&self) -> Float {
        let e0 = self.b.position - self.a.position;
        let e1 = self.c.position - self.a.position;
        0.5 * e0.cross(e1).length()
    }

    /// Returns the geometric normal following the winding order. Degenerate
    /// triangles return the zero vector.
    pub fn normal(&self) -> Vec3 {
        let e0 = self.b.position - self.a.position;
        let e1 = self.c.position - self.a.position;
        e0.cross(e1).normalize_or_zero()
    }

    /// Returns the centroid of the triangle.
    pub fn centroid(&self) -> Vec3 {
        (self.a.position + self.b.position + self.c.position) / 3.0
    }

    /// Returns the bounding rectangle of the triangle in a UV layer.
    ///
    /// * `layer` - UV layer.
    pub fn uv_rect(&self, layer: UvLayer) -> Bounds2f {
        Bounds2f::new(self.a.uv(layer), self.b.uv(layer)).union_point(self.c.uv(layer))
    }

    /// Returns the barycentric coordinates of a point in a UV layer.
    /// Triangles that are degenerate in UV space return coordinates that are
    /// never contained.
    ///
    /// * `uv`    - Point in UV space.
    /// * `layer` - UV layer.
    pub fn barycentric_uv(&self, uv: Uv, layer: UvLayer) -> Vec2 {
        let a = self.a.uv(layer);
        let e0 = self.b.uv(layer) - a;
        let e1 = self.c.uv(layer) - a;
        let e2 = uv - a;

        let det = e0.x * e1.y - e1.x * e0.y;
        if det.abs() < EPSILON * EPSILON {
            return Vec2::splat(-1.0);
        }

        let inv_det = 1.0 / det;
        Vec2::new((e2.x * e1.y - e1.x * e2.y) * inv_det, (e0.x * e2.y - e2.x * e0.y) * inv_det)
    }

    /// Returns the barycentric coordinates of a world space point projected
    /// onto the plane of the triangle.
    ///
    /// * `p` - The point.
    pub fn barycentric(&self, p: Vec3) -> Vec2 {
        let e0 = self.b.position - self.a.position;
        let e1 = self.c.position - self.a.position;
        let e2 = p - self.a.position;

        let d00 = e0.dot(e0);
        let d01 = e0.dot(e1);
        let d11 = e1.dot(e1);
        let d20 = e2.dot(e0);
        let d21 = e2.dot(e1);

        let denom = d00 * d11 - d01 * d01;
        if denom.abs() < EPSILON * EPSILON {
            return Vec2::splat(-1.0);
        }

        let inv_denom = 1.0 / denom;
        Vec2::new((d11 * d20 - d01 * d21) * inv_denom, (d00 * d21 - d01 * d20) * inv_denom)
    }

    /// Returns true if barycentric coordinates lie inside the triangle. The
    /// edge opposite `a` is excluded so adjacent triangles sharing it do not
    /// both claim points on it.
    ///
    /// * `bary` - Barycentric coordinates.
    #[inline]
    pub fn contains(bary: Vec2) -> bool {
        bary.x >= 0.0 && bary.y >= 0.0 && bary.x + bary.y < 1.0
    }

    /// Interpolates the position.
    ///
    /// * `bary` - Barycentric coordinates.
    pub fn position_at(&self, bary: Vec2) -> Vec3 {
        self.a.position + bary.x * (self.b.position - self.a.position) + bary.y * (self.c.position - self.a.position)
    }

    /// Interpolates and normalizes the shading normal. Falls back to the
    /// geometric normal when the interpolated normal vanishes.
    ///
    /// * `bary` - Barycentric coordinates.
    pub fn normal_at(&self, bary: Vec2) -> Vec3 {
        let n = self.a.normal + bary.x * (self.b.normal - self.a.normal) + bary.y * (self.c.normal - self.a.normal);
        let n = n.normalize_or_zero();
        if n == Vec3::ZERO {
            self.normal()
        } else {
            n
        }
    }

    /// Interpolates the vertex color.
    ///
    /// * `bary` - Barycentric coordinates.
    pub fn color_at(&self, bary: Vec2) -> Rgb {
        self.a.color + (self.b.color - self.a.color) * bary.x + (self.c.color - self.a.color) * bary.y
    }

    /// Interpolates texture coordinates.
    ///
    /// * `bary`  - Barycentric coordinates.
    /// * `layer` - UV layer.
    pub fn uv_at(&self, bary: Vec2, layer: UvLayer) -> Uv {
        let a = self.a.uv(layer);
        a + bary.x * (self.b.uv(layer) - a) + bary.y * (self.c.uv(layer) - a)
    }

    /// Returns the surface reflectance at a point: the interpolated vertex
    /// color modulated by the material's diffuse color.
    ///
    /// * `bary` - Barycentric coordinates.
    pub fn diffuse_at(&self, bary: Vec2) -> Rgb {
        let color = self.color_at(bary);
        match self.a.material.as_ref() {
            Some(m) => color * m.diffuse.rgb(),
            None => color,
        }
    }

    /// Walks every pixel of a `width` x `height` grid whose centre lies inside
    /// the triangle in the given UV layer, calling `f(x, y, bary)` with the
    /// barycentric coordinates of the pixel centre.
    ///
    /// * `width`  - Grid width in pixels.
    /// * `height` - Grid height in pixels.
    /// * `layer`  - UV layer to rasterize.
    /// * `f`      - Called for every covered pixel.
    pub fn rasterize<F>(&self, width: usize, height: usize, layer: UvLayer, mut f: F)
    where
        F: FnMut(usize, usize, Vec2),
    {
        let (x0, y0, x1, y1) = self.uv_rect(layer).pixel_range(width, height);
        for y in y0..y1 {
            for x in x0..x1 {
                let uv = Uv::new(
                    (x as Float + 0.5) / width as Float,
                    (y as Float + 0.5) / height as Float,
                );
                let bary = self.barycentric_uv(uv, layer);
                if Self::contains(bary) {
                    f(x, y, bary);
                }
            }
        }
    }
}
