//! Full Bake Job

use super::*;
use crate::baker::*;
use crate::mesh::Mesh;
use crate::progress::*;
use crate::scene::Scene;
use std::sync::Arc;

/// Bakes every mesh of a scene with one baker, splitting each mesh across a
/// root worker and a pool.
pub struct FullBakeJob {
    /// Scene to bake. Maps must be attached before the scene is shared.
    pub scene: Arc<Scene>,

    /// Kernel to run.
    pub baker: Arc<dyn Baker>,

    /// Shared by every per-mesh job.
    pub progress: Option<Arc<dyn Progress>>,

    /// Stops the bake between steps.
    pub cancel: CancellationToken,
}

impl FullBakeJob {
    /// Create a new `FullBakeJob`.
    ///
    /// * `scene`    - Scene to bake.
    /// * `baker`    - Kernel to run.
    /// * `progress` - Optional progress receiver.
    /// * `cancel`   - Cancellation token.
    pub fn new(
        scene: Arc<Scene>,
        baker: Arc<dyn Baker>,
        progress: Option<Arc<dyn Progress>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            scene,
            baker,
            progress,
            cancel,
        }
    }

    /// Returns the indices of the meshes to bake, largest bounding volume
    /// first. Meshes without faces or without a target map are skipped.
    fn schedule(&self) -> Vec<usize> {
        let mut order: Vec<usize> = self
            .scene
            .meshes()
            .iter()
            .enumerate()
            .filter(|(_, mesh)| {
                if mesh.face_count() == 0 {
                    warn!("Skipping mesh '{}' without faces", mesh.name);
                    false
                } else if self.baker.target(mesh).is_none() {
                    warn!("Skipping mesh '{}' without a {} target", mesh.name, self.baker.name());
                    false
                } else {
                    true
                }
            })
            .map(|(i, _)| i)
            .collect();

        let meshes = self.scene.meshes();
        order.sort_by(|&a, &b| meshes[b].bounds().volume().total_cmp(&meshes[a].bounds().volume()));
        order
    }

    /// Returns the total number of steps `n` workers take on a mesh.
    fn mesh_steps(&self, mesh: &Mesh, n: usize) -> u64 {
        let items = if mesh.face_count() >= n {
            mesh.face_count()
        } else {
            self.baker.target(mesh).map_or(0, |t| t.width() * t.height())
        };
        (0..n).map(|k| step_count(k, n, items) as u64).sum()
    }

    /// Runs the bake. The pool workers receive their share of a mesh first
    /// and the root worker, which runs its share on push, comes last. Every
    /// mesh is finished on all workers before the next one starts.
    ///
    /// * `root` - Worker of the calling thread.
    /// * `pool` - Additional workers.
    pub fn execute(&self, root: &mut dyn Worker, pool: &mut WorkerPool) -> Result<()> {
        let order = self.schedule();
        let n = pool.len() + 1;

        if let Some(progress) = self.progress.as_ref() {
            let total = order.iter().map(|&i| self.mesh_steps(&self.scene.meshes()[i], n)).sum();
            progress.begin(total);
        }

        for (done, &i) in order.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(RelightError::Cancelled);
            }

            let mesh = self.scene.mesh(i)?;
            let by_face = mesh.face_count() >= n;
            info!(
                "Baking mesh '{}' ({}/{}) with {}: {} faces, {} workers by {}",
                mesh.name,
                done + 1,
                order.len(),
                self.baker.name(),
                mesh.face_count(),
                n,
                if by_face { "face" } else { "lumel" }
            );

            let mut workers: Vec<&mut dyn Worker> = Vec::with_capacity(n);
            workers.extend(pool.workers_mut().iter_mut().map(|w| w.as_mut() as &mut dyn Worker));
            workers.push(&mut *root);

            let mut status = Ok(());
            for (k, worker) in workers.iter_mut().enumerate() {
                let iterator: Box<dyn BakeIterator> = if by_face {
                    Box::new(FaceBakeIterator::new(k, n))
                } else {
                    Box::new(LumelBakeIterator::new(k, n))
                };
                let job = BakeMeshJob {
                    scene: Arc::clone(&self.scene),
                    baker: Arc::clone(&self.baker),
                    mesh: i,
                    iterator,
                    progress: self.progress.clone(),
                    cancel: self.cancel.clone(),
                };
                if let Err(e) = worker.push(Box::new(job)) {
                    status = Err(e);
                    break;
                }
            }

            let waited = wait_all(&mut workers);
            status.and(waited)?;
        }

        if let Some(progress) = self.progress.as_ref() {
            progress.finish();
        }
        Ok(())
    }
}
