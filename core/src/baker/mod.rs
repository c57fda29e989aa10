//! Baker
//!
//! A baker is a per-lumel kernel. `bake_mesh` checks the preconditions of a
//! mesh and drives a `BakeIterator` over it; concrete bakers only implement
//! `bake_lumel`.

mod iterator;

// Re-export
pub use iterator::*;

use crate::error::*;
use crate::lightmap::*;
use crate::mesh::*;
use crate::progress::*;
use crate::rng::RNG;

/// Per-lumel lighting kernel.
pub trait Baker: Send + Sync {
    /// Returns a name for logs.
    fn name(&self) -> &str {
        "baker"
    }

    /// Computes the lighting of one used lumel and writes it into the lumel.
    ///
    /// * `mesh`  - Mesh the lumel belongs to.
    /// * `lumel` - The lumel.
    fn bake_lumel(&self, _mesh: &Mesh, _lumel: &Lumel) -> Result<()> {
        Err(RelightError::not_implemented(format!("{}: bake_lumel", self.name())))
    }

    /// Returns the map this baker writes into.
    ///
    /// * `mesh` - The mesh.
    fn target<'m>(&self, mesh: &'m Mesh) -> Option<&'m Lightmap> {
        mesh.lightmap()
    }

    /// Bakes the part of a mesh an iterator selects. Fails without doing any
    /// work when the mesh has no faces, no iterator is given or the mesh has
    /// no target map.
    ///
    /// * `mesh`     - The mesh.
    /// * `iterator` - Selects the lumels to bake.
    /// * `progress` - Notified after every iterator step.
    /// * `cancel`   - Checked before every iterator step.
    fn bake_mesh(
        &self,
        mesh: &Mesh,
        iterator: Option<&mut dyn BakeIterator>,
        progress: Option<&dyn Progress>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if mesh.face_count() == 0 {
            return Err(RelightError::invalid_call(format!("mesh '{}' has no faces", mesh.name)));
        }
        let iterator = iterator.ok_or_else(|| RelightError::invalid_call("bake_mesh requires an iterator"))?;
        let target = self
            .target(mesh)
            .ok_or_else(|| RelightError::invalid_call(format!("mesh '{}' has no target map", mesh.name)))?;

        iterator.begin(mesh, target);
        let step_count = iterator.step_count();
        let mut step = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(RelightError::Cancelled);
            }
            let more = iterator.next(mesh, target, &|lumel| self.bake_lumel(mesh, lumel))?;
            step += 1;
            if let Some(progress) = progress {
                progress.notify(step, step_count);
            }
            if !more {
                return Ok(());
            }
        }
    }
}

/// Returns a random number generator seeded from a lumel's location so a
/// lumel samples the same directions whichever worker bakes it.
///
/// * `lumel` - The lumel.
pub fn lumel_rng(lumel: &Lumel) -> RNG {
    RNG::new(((lumel.y as u64) << 32) | lumel.x as u64)
}
