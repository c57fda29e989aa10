//! Material

use crate::color::*;
use std::sync::Arc;

/// Surface description shared by the vertices of a mesh. Texture loading
/// belongs to the scene front end; only the resolved diffuse color is kept.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Material name.
    pub name: String,

    /// Diffuse reflectance. Alpha is used for cut-out tests when a tracer is
    /// asked to honour it.
    pub diffuse: Rgba,
}

impl Material {
    /// Create a new `Material`.
    ///
    /// * `name`    - Material name.
    /// * `diffuse` - Diffuse reflectance and alpha.
    pub fn new(name: &str, diffuse: Rgba) -> Self {
        Self {
            name: name.to_owned(),
            diffuse,
        }
    }

    /// Returns true if the alpha channel cuts the surface out.
    pub fn is_cut_out(&self) -> bool {
        self.diffuse.a < 0.5
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default", Rgba::WHITE)
    }
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<Material>;
