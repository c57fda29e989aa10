//! Relight
//!
//! Entry point tying the bakers to the workers. Maps must be attached to
//! the scene meshes before the scene is shared.

use crate::ambient_occlusion::*;
use crate::direct_light::*;
use crate::indirect_light::*;
use crate::photons::*;
use crate::radiosity::*;
use crate::settings::*;
use relight_core::baker::*;
use relight_core::common::*;
use relight_core::error::*;
use relight_core::progress::*;
use relight_core::scene::*;
use relight_core::worker::*;
use std::sync::Arc;

/// Radiosity parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RadiositySettings {
    /// Pairs of patches whose form factors are both below it are skipped.
    pub form_factor_threshold: Float,

    /// Form factors kept per patch, 0 keeps all of them.
    pub max_form_factors: usize,

    /// Solver iterations.
    pub iterations: usize,
}

impl Default for RadiositySettings {
    fn default() -> Self {
        Self {
            form_factor_threshold: 0.0001,
            max_form_factors: 256,
            iterations: 4,
        }
    }
}

/// Runs bakes on a root worker and a pool of workers.
pub struct Relight {
    /// Worker 0, usually running on the calling thread.
    root: Box<dyn Worker>,

    /// Workers 1..N.
    pool: WorkerPool,

    /// Receives progress of every bake.
    progress: Option<Arc<dyn Progress>>,

    /// Stops a running bake.
    cancel: CancellationToken,
}

impl Relight {
    /// Create a new `Relight`.
    ///
    /// * `root` - Worker 0.
    /// * `pool` - Additional workers.
    pub fn new(root: Box<dyn Worker>, pool: WorkerPool) -> Self {
        Self {
            root,
            pool,
            progress: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Returns a `Relight` with an inline root worker and `threads - 1`
    /// pool threads.
    ///
    /// * `threads` - Total number of workers.
    pub fn threaded(threads: usize) -> Result<Self> {
        let pool = WorkerPool::threaded(threads.saturating_sub(1))?;
        Ok(Self::new(Box::new(InlineWorker::new("relight-root")), pool))
    }

    /// Sets the progress receiver.
    ///
    /// * `progress` - Progress receiver.
    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Returns the token that cancels running bakes.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns the total number of workers.
    pub fn worker_count(&self) -> usize {
        self.pool.len() + 1
    }

    /// Bakes every mesh of a scene with a baker.
    ///
    /// * `scene` - The scene. Must be ready to bake.
    /// * `baker` - Kernel to run.
    pub fn bake(&mut self, scene: &Arc<Scene>, baker: Arc<dyn Baker>) -> Result<()> {
        scene.require_tracer("Relight::bake")?;
        let job = FullBakeJob::new(Arc::clone(scene), baker, self.progress.clone(), self.cancel.clone());
        job.execute(self.root.as_mut(), &mut self.pool)
    }

    /// Adds direct light to the lightmaps.
    ///
    /// * `scene` - The scene.
    pub fn bake_direct_light(&mut self, scene: &Arc<Scene>) -> Result<()> {
        self.bake(scene, Arc::new(DirectLight::new(Arc::clone(scene))))
    }

    /// Emits and gathers photons, then adds the final gather to the
    /// lightmaps.
    ///
    /// * `scene`    - The scene. Photon maps must be attached.
    /// * `settings` - Photon and final gather parameters.
    pub fn bake_indirect_light(&mut self, scene: &Arc<Scene>, settings: &IndirectLightSettings) -> Result<()> {
        if scene.meshes().iter().all(|m| m.photonmap().is_none()) {
            return Err(RelightError::invalid_call("Relight::bake_indirect_light requires photon maps"));
        }

        let photons = Arc::new(Photons::new(Arc::clone(scene), settings.photons()));
        photons.emit(self.root.as_mut(), &mut self.pool, self.progress.clone(), &self.cancel)?;
        photons.gather();

        self.bake(scene, Arc::new(IndirectLight::new(Arc::clone(scene), *settings)))
    }

    /// Writes ambient occlusion into the lightmaps, replacing their colors.
    ///
    /// * `scene`    - The scene.
    /// * `settings` - Occlusion parameters.
    pub fn bake_ambient_occlusion(&mut self, scene: &Arc<Scene>, settings: &AmbientOcclusionSettings) -> Result<()> {
        self.bake(scene, Arc::new(AmbientOcclusion::new(Arc::clone(scene), *settings)))
    }

    /// Exchanges the current lightmap colors between patches and adds the
    /// reflected light to the lightmaps.
    ///
    /// * `scene`    - The scene.
    /// * `settings` - Radiosity parameters.
    pub fn bake_radiosity(&mut self, scene: &Arc<Scene>, settings: &RadiositySettings) -> Result<Radiosity> {
        if self.cancel.is_cancelled() {
            return Err(RelightError::Cancelled);
        }
        let mut radiosity =
            RadiosityBuilder::new(Arc::clone(scene)).build(settings.form_factor_threshold, settings.max_form_factors)?;
        radiosity.inject_from_lightmaps()?;
        radiosity.solve(settings.iterations);
        radiosity.apply()?;
        Ok(radiosity)
    }
}
