//! Vertex

use super::ArcMaterial;
use crate::color::*;
use crate::common::*;
use crate::geometry::*;
use ordered_float::OrderedFloat;
use std::hash::{Hash, Hasher};

/// Texture coordinate layers carried by a vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UvLayer {
    /// Unique, non-overlapping unwrap used to address lightmaps.
    Lightmap = 0,

    /// Diffuse texture coordinates.
    Diffuse = 1,
}

/// Number of UV layers a vertex carries.
pub const UV_LAYERS: usize = 2;

/// Mesh vertex.
///
/// Equality and hashing consider position, normal, color and both UV
/// layers; the material is ignored so vertices can be de-duplicated before
/// a material is assigned.
#[derive(Clone, Debug, Default)]
pub struct Vertex {
    /// Object or world space position.
    pub position: Vec3,

    /// Unit normal.
    pub normal: Vec3,

    /// Vertex color.
    pub color: Rgb,

    /// Texture coordinates indexed by `UvLayer`.
    pub uv: [Uv; UV_LAYERS],

    /// Material assigned by `Mesh::add_faces`.
    pub material: Option<ArcMaterial>,
}

impl Vertex {
    /// Create a new `Vertex` without a material.
    ///
    /// * `position`    - Position.
    /// * `normal`      - Unit normal.
    /// * `color`       - Vertex color.
    /// * `lightmap_uv` - Lightmap texture coordinates.
    /// * `diffuse_uv`  - Diffuse texture coordinates.
    pub fn new(position: Vec3, normal: Vec3, color: Rgb, lightmap_uv: Uv, diffuse_uv: Uv) -> Self {
        Self {
            position,
            normal,
            color,
            uv: [lightmap_uv, diffuse_uv],
            material: None,
        }
    }

    /// Returns the texture coordinates of the given layer.
    ///
    /// * `layer` - UV layer.
    #[inline]
    pub fn uv(&self, layer: UvLayer) -> Uv {
        self.uv[layer as usize]
    }

    /// Returns the tuple of attributes used to compare vertices.
    fn key(&self) -> [OrderedFloat<Float>; 13] {
        let p = self.position;
        let n = self.normal;
        let c = self.color;
        let l = self.uv[UvLayer::Lightmap as usize];
        let d = self.uv[UvLayer::Diffuse as usize];
        [p.x, p.y, p.z, n.x, n.y, n.z, c.r, c.g, c.b, l.x, l.y, d.x, d.y].map(OrderedFloat)
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Material;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn vertex(x: Float) -> Vertex {
        Vertex::new(Vec3::new(x, 0.0, 0.0), Vec3::Z, Rgb::WHITE, Uv::new(x, 0.0), Uv::ZERO)
    }

    #[test]
    fn equal_vertices_hash_once() {
        let mut set = HashSet::new();
        set.insert(vertex(1.0));
        set.insert(vertex(1.0));
        set.insert(vertex(2.0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn material_does_not_affect_equality() {
        let mut v = vertex(1.0);
        v.material = Some(Arc::new(Material::default()));
        assert_eq!(v, vertex(1.0));
    }

    #[test]
    fn uv_layers_are_distinct() {
        let v = Vertex::new(Vec3::ZERO, Vec3::Z, Rgb::WHITE, Uv::new(0.25, 0.5), Uv::new(1.0, 2.0));
        assert_eq!(v.uv(UvLayer::Lightmap), Uv::new(0.25, 0.5));
        assert_eq!(v.uv(UvLayer::Diffuse), Uv::new(1.0, 2.0));
        assert_ne!(v, Vertex { uv: [Uv::new(1.0, 2.0), Uv::new(0.25, 0.5)], ..v.clone() });
    }
}
