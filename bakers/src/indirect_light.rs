//! Indirect Light
//!
//! Final gather over the photon maps. Photons must have been emitted and
//! gathered before this baker runs; meshes without a photon map reflect
//! nothing.

use crate::settings::*;
use relight_core::baker::*;
use relight_core::color::*;
use relight_core::common::*;
use relight_core::error::*;
use relight_core::lightmap::*;
use relight_core::mesh::*;
use relight_core::sampling::*;
use relight_core::scene::*;
use relight_core::tracer::*;
use std::sync::Arc;

/// Bakes light reflected once off other surfaces by sampling the gathered
/// photon maps.
pub struct IndirectLight {
    /// The scene.
    scene: Arc<Scene>,

    /// Sampling parameters.
    settings: IndirectLightSettings,
}

impl IndirectLight {
    /// Create a new `IndirectLight` baker.
    ///
    /// * `scene`    - The scene. Must be ready to bake.
    /// * `settings` - Sampling parameters.
    pub fn new(scene: Arc<Scene>, settings: IndirectLightSettings) -> Self {
        Self { scene, settings }
    }

    /// Returns the gathered photon map radiance at a hit.
    ///
    /// * `hit` - The hit.
    fn gathered(&self, hit: &Hit) -> Rgb {
        self.scene
            .mesh(hit.mesh)
            .ok()
            .and_then(|mesh| mesh.photonmap())
            .and_then(|photonmap| photonmap.lumel_at_uv(hit.uv))
            .map_or(Rgb::BLACK, |lumel| lumel.color())
    }
}

impl Baker for IndirectLight {
    fn name(&self) -> &str {
        "indirect light"
    }

    fn bake_lumel(&self, _mesh: &Mesh, lumel: &Lumel) -> Result<()> {
        let tracer = self.scene.require_tracer("IndirectLight::bake_lumel")?;
        let samples = self.settings.final_gather_samples;
        if samples == 0 {
            return Ok(());
        }

        let distance = min(self.settings.final_gather_distance, self.scene.far_distance());
        let origin = lumel.position + lumel.normal * RAY_OFFSET;
        let mut rng = lumel_rng(lumel);

        let mut sum = Rgb::BLACK;
        for _ in 0..samples {
            let dir = cosine_sample_hemisphere_around(lumel.normal, rng.uniform_vec2());
            let cos = max(0.0, dir.dot(lumel.normal));
            match tracer.trace_segment(origin, origin + dir * distance, HitFlags::NORMAL | HitFlags::UV) {
                None => sum += self.settings.sky_color * cos + self.settings.ambient_color,
                // Back faces are seen through a gap in the geometry.
                Some(hit) if dir.dot(hit.normal) >= 0.0 => {}
                Some(hit) => sum += self.gathered(&hit) * cos + self.settings.ambient_color,
            }
        }

        lumel.add_color(sum / samples as Float);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_scenes::*;
    use float_cmp::approx_eq;
    use relight_core::geometry::*;
    use relight_core::progress::*;

    fn settings(samples: usize, sky: Rgb, ambient: Rgb) -> IndirectLightSettings {
        IndirectLightSettings {
            final_gather_samples: samples,
            ..IndirectLightSettings::draft()
        }
        .with_sky(sky, ambient)
    }

    fn bake(scene: &Arc<Scene>, settings: IndirectLightSettings) {
        let baker = IndirectLight::new(Arc::clone(scene), settings);
        let mut it = FaceBakeIterator::new(0, 1);
        baker
            .bake_mesh(scene.mesh(0).unwrap(), Some(&mut it), None, &CancellationToken::new())
            .unwrap();
    }

    fn floor() -> Mesh {
        quad("floor", Vec3::ZERO, Vec3::X, Vec3::Y, Rgb::WHITE)
    }

    #[test]
    fn open_sky_is_cosine_weighted() {
        let scene = ready_photon_scene(vec![floor()], vec![], 2);
        bake(&scene, settings(1024, Rgb::WHITE, Rgb::BLACK));
        for lumel in scene.mesh(0).unwrap().lightmap().unwrap().lumels() {
            assert!(approx_eq!(f32, lumel.color().r, 2.0 / 3.0, epsilon = 0.05));
        }
    }

    #[test]
    fn ambient_is_added_per_sample() {
        let scene = ready_photon_scene(vec![floor()], vec![], 2);
        bake(&scene, settings(16, Rgb::BLACK, Rgb::gray(0.25)));
        for lumel in scene.mesh(0).unwrap().lightmap().unwrap().lumels() {
            assert!(approx_eq!(f32, lumel.color().g, 0.25, epsilon = 1e-5));
        }
    }

    #[test]
    fn back_faces_are_rejected() {
        let roof = quad(
            "roof",
            Vec3::new(-100.0, -100.0, 0.5),
            Vec3::X * 200.0,
            Vec3::Y * 200.0,
            Rgb::WHITE,
        );
        let scene = ready_photon_scene(vec![floor(), roof], vec![], 2);
        bake(&scene, settings(64, Rgb::WHITE, Rgb::gray(0.25)));
        for lumel in scene.mesh(0).unwrap().lightmap().unwrap().lumels() {
            assert!(lumel.color().r < 0.01);
        }
    }

    #[test]
    fn gathers_photon_map_of_hit_surface() {
        let ceiling = quad("ceiling", Vec3::Z, Vec3::Y, Vec3::X, Rgb::WHITE);
        let scene = ready_photon_scene(vec![floor(), ceiling], vec![], 4);
        let photonmap = scene.mesh(1).unwrap().photonmap().unwrap();
        photonmap.lumels().iter().for_each(|l| l.set_color(Rgb::WHITE));

        bake(&scene, settings(64, Rgb::BLACK, Rgb::BLACK));
        for lumel in scene.mesh(0).unwrap().lightmap().unwrap().lumels() {
            let c = lumel.color().r;
            assert!(c > 0.0 && c < 1.0);
        }

        // The ceiling's own lightmap is untouched.
        let ceiling = scene.mesh(1).unwrap().lightmap().unwrap();
        assert!(ceiling.lumels().iter().all(|l| l.color().is_black()));
    }

    #[test]
    fn zero_samples_leave_lumels_unchanged() {
        let scene = ready_photon_scene(vec![floor()], vec![], 2);
        bake(&scene, settings(0, Rgb::WHITE, Rgb::WHITE));
        let lm = scene.mesh(0).unwrap().lightmap().unwrap();
        assert!(lm.lumels().iter().all(|l| l.color().is_black()));
    }
}
