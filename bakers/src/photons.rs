//! Photons
//!
//! Emits photons from every light, traces them through the scene and
//! deposits their energy into the photon maps. After emission `gather`
//! turns the deposits into the radiance read by the final gather.

use crate::settings::*;
use relight_core::baker::step_count;
use relight_core::color::*;
use relight_core::common::*;
use relight_core::error::*;
use relight_core::geometry::*;
use relight_core::light::*;
use relight_core::progress::*;
use relight_core::rng::RNG;
use relight_core::sampling::*;
use relight_core::scene::*;
use relight_core::tracer::*;
use relight_core::worker::*;
use std::sync::Arc;

/// One segment of a photon path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhotonBounce {
    /// Bounce count, 0 for the first surface hit.
    pub depth: usize,

    /// The surface hit.
    pub hit: Hit,

    /// Energy deposited at the hit.
    pub energy: Rgb,
}

/// Photon emission and photon map gathering.
pub struct Photons {
    /// The scene. Photon maps must be attached.
    scene: Arc<Scene>,

    /// Emission parameters.
    settings: PhotonSettings,
}

impl Photons {
    /// Create a new `Photons` pass.
    ///
    /// * `scene`    - The scene. Must be ready to bake.
    /// * `settings` - Emission parameters.
    pub fn new(scene: Arc<Scene>, settings: PhotonSettings) -> Self {
        Self { scene, settings }
    }

    /// Returns the emission parameters.
    pub fn settings(&self) -> &PhotonSettings {
        &self.settings
    }

    /// Follows a photon until its luminance falls below the energy
    /// threshold, it leaves the scene or it exceeds the bounce limit. Every
    /// surface hit is passed to `visit`.
    ///
    /// * `tracer`      - Tracer.
    /// * `attenuation` - Distance falloff of the emitting light.
    /// * `origin`      - Start of the path.
    /// * `direction`   - Unit direction of the first segment.
    /// * `energy`      - Energy the photon starts with.
    /// * `rng`         - Bounce directions are drawn from it.
    /// * `visit`       - Receives every bounce.
    #[allow(clippy::too_many_arguments)]
    pub fn trace_with<F>(
        &self,
        tracer: &dyn RayTracer,
        attenuation: Option<&LightAttenuation>,
        origin: Vec3,
        direction: Vec3,
        energy: Rgb,
        rng: &mut RNG,
        mut visit: F,
    ) where
        F: FnMut(&PhotonBounce),
    {
        if energy.is_black() {
            return;
        }
        let far = self.scene.far_distance();
        let threshold = self.settings.energy_threshold;
        let (mut origin, mut direction, mut energy) = (origin, direction, energy);
        let mut depth = 0;

        while depth <= self.settings.max_depth && energy.luminance() >= threshold {
            let hit = match tracer.trace_segment(origin, origin + direction * far, HitFlags::ALL) {
                Some(hit) => hit,
                None => return,
            };

            let mut factor = lambert(direction, hit.normal);
            if let Some(attenuation) = attenuation {
                factor *= attenuation.calculate(hit.point.distance(origin));
            }
            if factor <= 0.0 {
                return;
            }
            energy = energy * hit.color * factor;

            visit(&PhotonBounce { depth, hit, energy });

            origin = hit.point + hit.normal * RAY_OFFSET;
            direction = cosine_sample_hemisphere_around(hit.normal, rng.uniform_vec2());
            depth += 1;
        }
    }

    /// Traces a photon carrying the light's full flux and stores its share of
    /// that flux into the photon maps of the meshes it hits. Returns the
    /// number of deposits.
    ///
    /// * `tracer`  - Tracer.
    /// * `light`   - Emitting light.
    /// * `emitted` - Emitted photon.
    /// * `rng`     - Bounce directions are drawn from it.
    pub fn trace(&self, tracer: &dyn RayTracer, light: &Light, emitted: &EmittedPhoton, rng: &mut RNG) -> usize {
        let share = light.photon_share();
        if share <= 0.0 {
            return 0;
        }
        let mut stored = 0;
        self.trace_with(
            tracer,
            light.attenuation.as_ref(),
            emitted.origin,
            emitted.direction,
            light.photon_flux(),
            rng,
            |bounce| {
                let photonmap = self.scene.mesh(bounce.hit.mesh).ok().and_then(|mesh| mesh.photonmap());
                if photonmap.is_some_and(|pm| pm.store(bounce.hit.uv, bounce.energy * share)) {
                    stored += 1;
                }
            },
        );
        stored
    }

    /// Emits the photons of every light once.
    ///
    /// * `pass` - Pass number. Seeds the random number generators.
    pub fn emit_pass(&self, pass: usize) -> Result<usize> {
        let tracer = self.scene.require_tracer("Photons::emit_pass")?;
        let bounds = self.scene.bounds();

        let mut stored = 0;
        for (i, light) in self.scene.lights().iter().enumerate() {
            let emitter = match light.photon_emitter.as_ref() {
                Some(emitter) => emitter,
                None => continue,
            };
            let mut rng = RNG::new(((pass as u64) << 32) | i as u64);
            for _ in 0..emitter.count() {
                if let Some(photon) = emitter.emit(light, &bounds, &mut rng) {
                    stored += self.trace(tracer, light, &photon, &mut rng);
                }
            }
        }
        Ok(stored)
    }

    /// Runs every emission pass, splitting passes across the root worker and
    /// the pool. The pool is handed its passes before the root worker runs
    /// its own. Returns the number of photons stored.
    ///
    /// * `root`     - Worker of the calling thread.
    /// * `pool`     - Additional workers.
    /// * `progress` - Notified after every pass.
    /// * `cancel`   - Checked before every pass.
    pub fn emit(
        self: &Arc<Self>,
        root: &mut dyn Worker,
        pool: &mut WorkerPool,
        progress: Option<Arc<dyn Progress>>,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        self.scene.require_tracer("Photons::emit")?;
        let n = pool.len() + 1;
        let passes = self.settings.pass_count;
        info!(
            "Emitting photons: {} passes, {} lights, {} workers",
            passes,
            self.scene.lights().iter().filter(|l| l.photon_emitter.is_some()).count(),
            n
        );
        if let Some(progress) = progress.as_ref() {
            progress.begin(passes as u64);
        }

        let mut workers: Vec<&mut dyn Worker> = Vec::with_capacity(n);
        workers.extend(pool.workers_mut().iter_mut().map(|w| w.as_mut() as &mut dyn Worker));
        workers.push(root);

        let mut status = Ok(());
        for (k, worker) in workers.iter_mut().enumerate() {
            let job = PhotonPassJob {
                photons: Arc::clone(self),
                first: k,
                step: n,
                progress: progress.clone(),
                cancel: cancel.clone(),
            };
            if let Err(e) = worker.push(Box::new(job)) {
                status = Err(e);
                break;
            }
        }
        let waited = wait_all(&mut workers);
        status.and(waited)?;

        if let Some(progress) = progress.as_ref() {
            progress.finish();
        }

        let total = self
            .scene
            .meshes()
            .iter()
            .filter_map(|m| m.photonmap())
            .map(|pm| pm.photon_count())
            .sum();
        info!("Stored {} photons", total);
        Ok(total)
    }

    /// Averages the deposits of all passes and runs the density estimate on
    /// every photon map.
    pub fn gather(&self) {
        let passes = self.settings.pass_count.max(1) as Float;
        for mesh in self.scene.meshes() {
            if let Some(photonmap) = mesh.photonmap() {
                debug!("Gathering {} photons on '{}'", photonmap.photon_count(), mesh.name);
                photonmap.lumels().iter().for_each(|l| l.set_color(l.color() / passes));
                photonmap.gather(mesh.area(), self.settings.gather_radius, self.settings.gather_max_distance);
            }
        }
    }
}

/// Runs the emission passes `first, first + step, ...`.
pub struct PhotonPassJob {
    /// Shared emitter.
    pub photons: Arc<Photons>,

    /// First pass.
    pub first: usize,

    /// Pass stride.
    pub step: usize,

    /// Notified after every pass.
    pub progress: Option<Arc<dyn Progress>>,

    /// Checked before every pass.
    pub cancel: CancellationToken,
}

impl Job for PhotonPassJob {
    fn execute(self: Box<Self>) -> Result<()> {
        let passes = self.photons.settings.pass_count;
        let total = step_count(self.first, self.step, passes);
        for (i, pass) in (self.first..passes).step_by(self.step.max(1)).enumerate() {
            if self.cancel.is_cancelled() {
                return Err(RelightError::Cancelled);
            }
            let stored = self.photons.emit_pass(pass)?;
            debug!("Photon pass {} stored {} photons", pass, stored);
            if let Some(progress) = self.progress.as_ref() {
                progress.notify(i + 1, total);
            }
        }
        Ok(())
    }
}
