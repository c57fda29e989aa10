//! Ambient Occlusion

use crate::settings::*;
use relight_core::baker::*;
use relight_core::color::*;
use relight_core::common::*;
use relight_core::error::*;
use relight_core::lightmap::*;
use relight_core::mesh::*;
use relight_core::sampling::*;
use relight_core::scene::*;
use std::sync::Arc;

/// Bakes the fraction of the hemisphere above a lumel that is open.
///
/// The result overwrites the lumel color, so ambient occlusion is normally
/// baked into its own lightmap.
pub struct AmbientOcclusion {
    /// The scene.
    scene: Arc<Scene>,

    /// Sampling parameters.
    settings: AmbientOcclusionSettings,
}

impl AmbientOcclusion {
    /// Create a new `AmbientOcclusion` baker.
    ///
    /// * `scene`    - The scene. Must be ready to bake.
    /// * `settings` - Sampling parameters.
    pub fn new(scene: Arc<Scene>, settings: AmbientOcclusionSettings) -> Self {
        Self { scene, settings }
    }

    /// Returns the occlusion factor for a number of occluded rays. The value
    /// is not clamped and goes negative when `occluded_fraction < 1` and
    /// most rays are blocked.
    ///
    /// * `occluded` - Number of occluded rays.
    pub fn factor(&self, occluded: usize) -> Float {
        let s = &self.settings;
        if s.samples == 0 {
            return 1.0;
        }
        let ao = 1.0 - occluded as Float / (s.samples as Float * s.occluded_fraction);
        if ao > 0.0 && s.exponent != 1.0 {
            ao.powf(s.exponent)
        } else {
            ao
        }
    }
}

impl Baker for AmbientOcclusion {
    fn name(&self) -> &str {
        "ambient occlusion"
    }

    fn bake_lumel(&self, _mesh: &Mesh, lumel: &Lumel) -> Result<()> {
        let tracer = self.scene.require_tracer("AmbientOcclusion::bake_lumel")?;
        let origin = lumel.position + lumel.normal * RAY_OFFSET;
        let mut rng = lumel_rng(lumel);

        let occluded = (0..self.settings.samples)
            .filter(|_| {
                let dir = uniform_sample_hemisphere_around(lumel.normal, rng.uniform_vec2());
                tracer.test(origin, origin + dir * self.settings.max_distance)
            })
            .count();

        lumel.set_color(Rgb::gray(self.factor(occluded)));
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

    fn settings(samples: usize, occluded_fraction: Float, exponent: Float) -> AmbientOcclusionSettings {
        AmbientOcclusionSettings {
            samples,
            occluded_fraction,
            max_distance: 10.0,
            exponent,
        }
    }

    fn bake(scene: &Arc<Scene>, settings: AmbientOcclusionSettings) -> Vec<Rgb> {
        let baker = AmbientOcclusion::new(Arc::clone(scene), settings);
        let mut it = LumelBakeIterator::new(0, 1);
        let floor = scene.mesh(0).unwrap();
        baker.bake_mesh(floor, Some(&mut it), None, &CancellationToken::new()).unwrap();
        floor.lightmap().unwrap().colors()
    }

    #[test]
    fn fully_occluded_lumels_are_black() {
        let scene = Arc::new(ready_scene(closed_box(Rgb::WHITE), vec![], 4));
        for c in bake(&scene, settings(100, 1.0, 1.0)) {
            assert_eq!(c, Rgb::BLACK);
        }
    }

    #[test]
    fn open_lumels_are_white() {
        let floor = quad("floor", Vec3::ZERO, Vec3::X, Vec3::Y, Rgb::WHITE);
        let scene = Arc::new(ready_scene(vec![floor], vec![], 4));
        for c in bake(&scene, settings(32, 1.0, 1.0)) {
            assert_eq!(c, Rgb::WHITE);
        }
    }

    #[test]
    fn occluded_fraction_is_not_clamped() {
        let scene = Arc::new(ready_scene(closed_box(Rgb::WHITE), vec![], 2));
        for c in bake(&scene, settings(20, 0.5, 2.0)) {
            assert!(approx_eq!(f32, c.r, -1.0, epsilon = 1e-6));
        }
    }

    #[test]
    fn exponent_applies_to_positive_factors() {
        let scene = Arc::new(ready_scene(closed_box(Rgb::WHITE), vec![], 2));
        for c in bake(&scene, settings(20, 2.0, 2.0)) {
            assert!(approx_eq!(f32, c.r, 0.25, epsilon = 1e-6));
        }

        let ao = AmbientOcclusion::new(Arc::clone(&scene), settings(0, 1.0, 1.0));
        assert_eq!(ao.factor(0), 1.0);
    }

    #[test]
    fn result_overwrites_previous_color() {
        let scene = Arc::new(ready_scene(closed_box(Rgb::WHITE), vec![], 2));
        let lm = scene.mesh(0).unwrap().lightmap().unwrap();
        lm.lumels().iter().for_each(|l| l.set_color(Rgb::gray(5.0)));
        for c in bake(&scene, settings(10, 1.0, 1.0)) {
            assert_eq!(c, Rgb::BLACK);
        }
    }
}
