//! Radiosity
//!
//! Every used lightmap lumel becomes a patch. Patches reference each other
//! by index into one patch array.

mod builder;

// Re-export
pub use builder::*;

use relight_core::color::*;
use relight_core::common::*;
use relight_core::error::*;
use relight_core::geometry::*;
use relight_core::scene::*;
use std::sync::Arc;

/// Share of the light leaving one patch that arrives at another.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FormFactor {
    /// Index of the sending patch.
    pub target: usize,

    /// Normalized weight.
    pub weight: Float,
}

/// A lumel taking part in light exchange.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    /// Index of the mesh in the scene.
    pub mesh: usize,

    /// Index of the lumel in the mesh lightmap.
    pub lumel: usize,

    /// World space position.
    pub position: Vec3,

    /// Unit normal.
    pub normal: Vec3,

    /// Radiance the patch emits by itself, usually its direct light.
    pub injected: Rgb,

    /// Surface reflectance.
    pub diffuse: Rgb,

    /// Reflected radiance computed by `Radiosity::solve`.
    pub indirect: Rgb,

    /// Patches this patch receives light from.
    pub form_factors: Vec<FormFactor>,
}

impl Patch {
    /// Returns the sum of the form factor weights.
    pub fn total_weight(&self) -> Float {
        self.form_factors.iter().map(|f| f.weight).sum()
    }
}

/// Contiguous patches of one mesh.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PatchRange {
    /// Index of the first patch.
    pub first: usize,

    /// Number of patches.
    pub count: usize,
}

/// Patches with their form factors and the iterative solve over them.
pub struct Radiosity {
    /// The scene the patches were built from.
    scene: Arc<Scene>,

    /// All patches.
    patches: Vec<Patch>,

    /// Patch range of every scene mesh.
    ranges: Vec<PatchRange>,
}

impl Radiosity {
    /// Returns the patches.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Returns the patch range of every scene mesh.
    pub fn ranges(&self) -> &[PatchRange] {
        &self.ranges
    }

    /// Returns the patches of one mesh.
    ///
    /// * `mesh` - Mesh index.
    pub fn mesh_patches(&self, mesh: usize) -> &[Patch] {
        match self.ranges.get(mesh) {
            Some(r) => &self.patches[r.first..r.first + r.count],
            None => &[],
        }
    }

    /// Returns the total number of form factors.
    pub fn form_factor_count(&self) -> usize {
        self.patches.iter().map(|p| p.form_factors.len()).sum()
    }

    /// Reads each patch's injected radiance from its lumel and its
    /// reflectance from the face under it.
    pub fn inject_from_lightmaps(&mut self) -> Result<()> {
        for patch in self.patches.iter_mut() {
            let mesh = self.scene.mesh(patch.mesh)?;
            let lightmap = mesh
                .lightmap()
                .ok_or_else(|| RelightError::invalid_call(format!("mesh '{}' lost its lightmap", mesh.name)))?;
            let lumel = lightmap
                .lumels()
                .get(patch.lumel)
                .ok_or_else(|| RelightError::invalid_call(format!("patch lumel {} out of range", patch.lumel)))?;
            patch.injected = lumel.color();
            patch.diffuse = mesh.face(lumel.face)?.diffuse_at(lumel.bary);
        }
        Ok(())
    }

    /// Runs Jacobi iterations of
    /// `indirect_i = diffuse_i * sum_j weight_ij * (injected_j + indirect_j)`.
    ///
    /// * `iterations` - Number of iterations.
    pub fn solve(&mut self, iterations: usize) {
        for iteration in 0..iterations {
            let exitant: Vec<Rgb> = self.patches.iter().map(|p| p.injected + p.indirect).collect();
            let mut change: Float = 0.0;
            for patch in self.patches.iter_mut() {
                let gathered = patch
                    .form_factors
                    .iter()
                    .fold(Rgb::BLACK, |sum, f| sum + exitant[f.target] * f.weight);
                let indirect = patch.diffuse * gathered;
                let d = indirect - patch.indirect;
                change = change.max(d.r.abs()).max(d.g.abs()).max(d.b.abs());
                patch.indirect = indirect;
            }
            debug!("Radiosity iteration {}: max change {}", iteration + 1, change);
        }
    }

    /// Adds every patch's indirect radiance to its lumel.
    pub fn apply(&self) -> Result<()> {
        for patch in self.patches.iter() {
            let mesh = self.scene.mesh(patch.mesh)?;
            if let Some(lumel) = mesh.lightmap().and_then(|lm| lm.lumels().get(patch.lumel)) {
                lumel.add_color(patch.indirect);
            }
        }
        Ok(())
    }
}
