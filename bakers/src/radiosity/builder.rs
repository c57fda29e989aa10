//! Radiosity Builder

use super::*;
use itertools::Itertools;
use relight_core::rng::RNG;

/// Returns the form factor weights `(receiver <- sender, sender <- receiver)`
/// of two patches, or `None` when they coincide or either faces away from
/// the other.
///
/// * `receiver` - Position and unit normal of the receiving patch.
/// * `sender`   - Position and unit normal of the sending patch.
pub fn form_factor(receiver: (Vec3, Vec3), sender: (Vec3, Vec3)) -> Option<(Float, Float)> {
    let (rp, rn) = receiver;
    let (sp, sn) = sender;

    let dir = sp - rp;
    let r = dir.length();
    if r <= 0.0 {
        return None;
    }
    let dir = dir / r;

    let cos_receiver = dir.dot(rn);
    let cos_sender = -dir.dot(sn);
    if cos_receiver <= 0.0 || cos_sender <= 0.0 {
        return None;
    }

    let d = PI * r * r;
    Some((cos_receiver * cos_sender / d, cos_sender * cos_receiver / d))
}

/// Builds patches and form factors from the lightmaps of a scene.
pub struct RadiosityBuilder {
    /// The scene. Lightmaps must be attached.
    scene: Arc<Scene>,
}

impl RadiosityBuilder {
    /// Create a new `RadiosityBuilder`.
    ///
    /// * `scene` - The scene. Must be ready to bake.
    pub fn new(scene: Arc<Scene>) -> Self {
        Self { scene }
    }

    /// Creates one patch per used lumel of every mesh lightmap, then links
    /// every visible pair of patches.
    ///
    /// * `threshold`        - Pairs whose weights are both below it are
    ///                        skipped.
    /// * `max_form_factors` - Form factors kept per patch, 0 keeps all of
    ///                        them.
    pub fn build(&self, threshold: Float, max_form_factors: usize) -> Result<Radiosity> {
        let tracer = self.scene.require_tracer("RadiosityBuilder::build")?;
        let (mut patches, ranges) = self.create_patches();

        let mut links: Vec<Vec<FormFactor>> = vec![vec![]; patches.len()];
        let mut occluded = 0;
        for (i, j) in (0..patches.len()).tuple_combinations() {
            let (receiver, sender) = (&patches[i], &patches[j]);
            let (w_rs, w_sr) = match form_factor((receiver.position, receiver.normal), (sender.position, sender.normal)) {
                Some(w) => w,
                None => continue,
            };
            if w_rs < threshold && w_sr < threshold {
                continue;
            }

            let start = receiver.position + receiver.normal * RAY_OFFSET;
            let end = sender.position + sender.normal * RAY_OFFSET;
            if tracer.test(start, end) {
                occluded += 1;
                continue;
            }

            links[i].push(FormFactor { target: j, weight: w_rs });
            links[j].push(FormFactor { target: i, weight: w_sr });
        }

        for (i, (patch, form_factors)) in patches.iter_mut().zip(links).enumerate() {
            patch.form_factors = form_factors;
            refine_form_factors(patch, max_form_factors, &mut RNG::new(i as u64));
        }

        let radiosity = Radiosity {
            scene: Arc::clone(&self.scene),
            patches,
            ranges,
        };
        info!(
            "Radiosity: {} patches, {} form factors, {} occluded pairs",
            radiosity.patches.len(),
            radiosity.form_factor_count(),
            occluded
        );
        Ok(radiosity)
    }

    /// Returns one patch per used lumel and the patch range of every mesh.
    fn create_patches(&self) -> (Vec<Patch>, Vec<PatchRange>) {
        let mut patches = vec![];
        let mut ranges = Vec::with_capacity(self.scene.meshes().len());
        for (m, mesh) in self.scene.meshes().iter().enumerate() {
            let first = patches.len();
            if let Some(lightmap) = mesh.lightmap() {
                patches.extend(
                    lightmap
                        .lumels()
                        .iter()
                        .enumerate()
                        .filter(|(_, l)| l.used)
                        .map(|(i, l)| Patch {
                            mesh: m,
                            lumel: i,
                            position: l.position,
                            normal: l.normal,
                            injected: Rgb::BLACK,
                            diffuse: Rgb::BLACK,
                            indirect: Rgb::BLACK,
                            form_factors: vec![],
                        }),
                );
            }
            ranges.push(PatchRange {
                first,
                count: patches.len() - first,
            });
        }
        (patches, ranges)
    }
}

/// Randomly drops form factors until at most `max` remain and rescales the
/// rest to sum to 1.
///
/// * `patch` - The patch.
/// * `max`   - Form factors to keep, 0 keeps all of them.
/// * `rng`   - Selects the form factors to drop.
pub fn refine_form_factors(patch: &mut Patch, max: usize, rng: &mut RNG) {
    if max > 0 && patch.form_factors.len() > max {
        rng.shuffle(&mut patch.form_factors);
        patch.form_factors.truncate(max);
    }

    let total = patch.total_weight();
    if total > 0.0 {
        patch.form_factors.iter_mut().for_each(|f| f.weight /= total);
    }
}
