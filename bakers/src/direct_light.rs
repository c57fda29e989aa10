//! Direct Light

use relight_core::baker::*;
use relight_core::color::*;
use relight_core::common::*;
use relight_core::error::*;
use relight_core::light::*;
use relight_core::lightmap::*;
use relight_core::mesh::*;
use relight_core::scene::*;
use relight_core::tracer::*;
use std::sync::Arc;

/// Bakes the light arriving straight from every light source.
pub struct DirectLight {
    /// The scene.
    scene: Arc<Scene>,
}

impl DirectLight {
    /// Create a new `DirectLight` baker.
    ///
    /// * `scene` - The scene. Must be ready to bake.
    pub fn new(scene: Arc<Scene>) -> Self {
        Self { scene }
    }

    /// Returns the light a lumel receives from one light sample.
    ///
    /// * `tracer` - Tracer used for shadow rays.
    /// * `light`  - The light.
    /// * `sample` - Light sample.
    /// * `lumel`  - Receiving lumel.
    /// * `far`    - Shadow ray length for directional light.
    fn light_from_point(&self, tracer: &dyn RayTracer, light: &Light, sample: &LightVertex, lumel: &Lumel, far: Float) -> Rgb {
        let influence = light.influence_at(tracer, sample, lumel.position, lumel.normal, far);
        if influence > 0.0 {
            light.color * light.intensity * influence
        } else {
            Rgb::BLACK
        }
    }

    /// Returns the average light a lumel receives from the generated
    /// samples of a light.
    ///
    /// * `tracer` - Tracer used for shadow rays.
    /// * `light`  - The light.
    /// * `lumel`  - Receiving lumel.
    /// * `far`    - Shadow ray length for directional light.
    fn light_from_point_set(&self, tracer: &dyn RayTracer, light: &Light, lumel: &Lumel, far: Float) -> Rgb {
        let samples = light.vertices();
        let sum = samples
            .iter()
            .fold(Rgb::BLACK, |sum, sample| sum + self.light_from_point(tracer, light, sample, lumel, far));
        sum / samples.len() as Float
    }
}

impl Baker for DirectLight {
    fn name(&self) -> &str {
        "direct light"
    }

    fn bake_lumel(&self, _mesh: &Mesh, lumel: &Lumel) -> Result<()> {
        let tracer = self.scene.require_tracer("DirectLight::bake_lumel")?;
        let far = self.scene.far_distance();

        let mut color = Rgb::BLACK;
        for light in self.scene.lights() {
            color += if light.vertex_generator.is_some() && !light.vertices().is_empty() {
                self.light_from_point_set(tracer, light, lumel, far)
            } else {
                self.light_from_point(tracer, light, &light.position_sample(), lumel, far)
            };
        }
        lumel.add_color(color);
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

    fn bake(scene: &Arc<Scene>, mesh: usize) {
        let baker = DirectLight::new(Arc::clone(scene));
        let mut it = LumelBakeIterator::new(0, 1);
        baker
            .bake_mesh(scene.mesh(mesh).unwrap(), Some(&mut it), None, &CancellationToken::new())
            .unwrap();
    }

    #[test]
    fn point_light_above_triangle() {
        let light_position = Vec3::new(1.0 / 3.0, 1.0 / 3.0, 1.0);
        let light = Light::point(light_position, Rgb::WHITE, 1.0, 10.0, false);
        let scene = Arc::new(ready_scene(vec![triangle()], vec![light], 2));
        bake(&scene, 0);

        let lm = scene.mesh(0).unwrap().lightmap().unwrap();
        let lit = lm.lumel(0, 0);
        assert!(lit.used);

        let d = lit.position.distance(light_position);
        let expected = LightAttenuation::linear(10.0).calculate(d) / d;
        assert!(approx_eq!(f32, lit.color().r, expected, epsilon = 1e-4));
        assert!(approx_eq!(f32, lit.color().g, expected, epsilon = 1e-4));

        for lumel in lm.lumels().iter().filter(|l| !l.used) {
            assert!(lumel.color().is_black());
            assert!(lit.color().r > lumel.color().r);
        }
    }

    #[test]
    fn blocker_casts_shadow() {
        let floor = quad("floor", Vec3::ZERO, Vec3::X, Vec3::Y, Rgb::WHITE);
        let blocker = quad(
            "blocker",
            Vec3::new(-1.0, -1.0, 0.5),
            Vec3::X * 3.0,
            Vec3::Y * 3.0,
            Rgb::WHITE,
        );
        let position = Vec3::new(0.5, 0.5, 1.0);

        let shadowed = Arc::new(ready_scene(
            vec![floor.clone(), blocker.clone()],
            vec![Light::point(position, Rgb::WHITE, 1.0, 10.0, true)],
            4,
        ));
        bake(&shadowed, 0);
        let lm = shadowed.mesh(0).unwrap().lightmap().unwrap();
        assert!(lm.lumels().iter().all(|l| l.color().is_black()));

        let open = Arc::new(ready_scene(
            vec![floor, blocker],
            vec![Light::point(position, Rgb::WHITE, 1.0, 10.0, false)],
            4,
        ));
        bake(&open, 0);
        let lm = open.mesh(0).unwrap().lightmap().unwrap();
        assert!(lm.lumels().iter().all(|l| l.color().r > 0.0));
    }

    #[test]
    fn area_light_averages_samples() {
        let panel = quad("panel", Vec3::new(0.0, 1.0, 1.0), Vec3::X, -Vec3::Y, Rgb::WHITE);
        let light = Light::area(&panel, &Mat4::IDENTITY, Rgb::WHITE, 1.0, true, LightVertexGenerator::Mesh);
        assert_eq!(light.vertices().len(), 4);

        let floor = quad("floor", Vec3::ZERO, Vec3::X, Vec3::Y, Rgb::WHITE);
        let scene = Arc::new(ready_scene(vec![floor], vec![light], 4));
        bake(&scene, 0);

        let lm = scene.mesh(0).unwrap().lightmap().unwrap();
        for lumel in lm.lumels() {
            let c = lumel.color().r;
            assert!(c > 0.0 && c <= 1.0);
        }
    }

    #[test]
    fn colors_are_added_to_existing_values() {
        let light = Light::directional(-Vec3::Z, Rgb::new(1.0, 0.5, 0.25), 2.0, true);
        let scene = Arc::new(ready_scene(vec![triangle()], vec![light], 2));
        let lumel = scene.mesh(0).unwrap().lightmap().unwrap().lumel(0, 0);
        lumel.set_color(Rgb::gray(0.5));
        bake(&scene, 0);
        assert!(approx_eq!(f32, lumel.color().r, 2.5, epsilon = 1e-5));
        assert!(approx_eq!(f32, lumel.color().b, 1.0, epsilon = 1e-5));
    }

    #[test]
    fn unfinished_scene_is_invalid() {
        let mut scene = Scene::new(Box::new(relight_accelerators::BvhTracer::default()));
        scene.begin().unwrap();
        scene.add_mesh(triangle()).unwrap();
        let lumel = Lumel::new(0, 0);
        let scene = Arc::new(scene);
        let baker = DirectLight::new(Arc::clone(&scene));
        let r = baker.bake_lumel(scene.mesh(0).unwrap(), &lumel);
        assert!(matches!(r, Err(RelightError::InvalidCall(_))));
    }
}
