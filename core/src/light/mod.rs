//! Light
//!
//! A light is a plain set of parameters plus owned strategies. Each strategy
//! is optional, so a directional light simply carries no attenuation and a
//! point light no cutoff.

use crate::color::*;
use crate::common::*;
use crate::geometry::*;
use crate::mesh::Mesh;
use crate::tracer::RayTracer;

mod attenuation;
mod cutoff;
mod influence;
mod photon_emitter;
mod vertex_generator;

// Re-export
pub use attenuation::*;
pub use cutoff::*;
pub use influence::*;
pub use photon_emitter::*;
pub use vertex_generator::*;

/// Default number of photons a light emits per pass.
pub const DEFAULT_PHOTON_COUNT: usize = 10_000;

/// A static light source.
#[derive(Clone, Debug)]
pub struct Light {
    /// World space position. Directional lights ignore it.
    pub position: Vec3,

    /// Light color.
    pub color: Rgb,

    /// Intensity multiplier.
    pub intensity: Float,

    /// Shadow rays are traced when true.
    pub casts_shadow: bool,

    /// Distance falloff.
    pub attenuation: Option<LightAttenuation>,

    /// Angular restriction.
    pub cutoff: Option<LightCutoff>,

    /// Surface response.
    pub influence: LightInfluence,

    /// Generator the light samples were created with.
    pub vertex_generator: Option<LightVertexGenerator>,

    /// Photon distribution.
    pub photon_emitter: Option<PhotonEmitter>,

    /// Samples on the emitting surface. Empty for lights evaluated at their
    /// position.
    vertices: Vec<LightVertex>,
}

impl Light {
    /// Returns a point light.
    ///
    /// * `position`     - World space position.
    /// * `color`        - Light color.
    /// * `intensity`    - Intensity multiplier.
    /// * `radius`       - Distance past which the light has no effect.
    /// * `casts_shadow` - Trace shadow rays.
    pub fn point(position: Vec3, color: Rgb, intensity: Float, radius: Float, casts_shadow: bool) -> Self {
        Self {
            position,
            color,
            intensity,
            casts_shadow,
            attenuation: Some(LightAttenuation::linear(radius)),
            cutoff: None,
            influence: LightInfluence::Point,
            vertex_generator: None,
            photon_emitter: Some(PhotonEmitter::Point {
                count: DEFAULT_PHOTON_COUNT,
            }),
            vertices: vec![],
        }
    }

    /// Returns a directional light.
    ///
    /// * `direction`    - Direction the light travels in.
    /// * `color`        - Light color.
    /// * `intensity`    - Intensity multiplier.
    /// * `casts_shadow` - Trace shadow rays.
    pub fn directional(direction: Vec3, color: Rgb, intensity: Float, casts_shadow: bool) -> Self {
        let direction = direction.normalize_or_zero();
        Self {
            position: Vec3::ZERO,
            color,
            intensity,
            casts_shadow,
            attenuation: None,
            cutoff: None,
            influence: LightInfluence::Directional { direction },
            vertex_generator: None,
            photon_emitter: Some(PhotonEmitter::Directional {
                direction,
                count: DEFAULT_PHOTON_COUNT,
            }),
            vertices: vec![],
        }
    }

    /// Returns a spot light.
    ///
    /// * `position`       - World space position.
    /// * `direction`      - Cone axis.
    /// * `cutoff_degrees` - Half angle of the cone in degrees.
    /// * `exponent`       - Falloff exponent inside the cone.
    /// * `color`          - Light color.
    /// * `intensity`      - Intensity multiplier.
    /// * `radius`         - Distance past which the light has no effect.
    /// * `casts_shadow`   - Trace shadow rays.
    #[allow(clippy::too_many_arguments)]
    pub fn spot(
        position: Vec3,
        direction: Vec3,
        cutoff_degrees: Float,
        exponent: Float,
        color: Rgb,
        intensity: Float,
        radius: Float,
        casts_shadow: bool,
    ) -> Self {
        Self {
            cutoff: Some(LightCutoff::Spot {
                direction: direction.normalize_or_zero(),
                cutoff: cutoff_degrees.to_radians(),
                exponent,
            }),
            ..Self::point(position, color, intensity, radius, casts_shadow)
        }
    }

    /// Returns an area light emitting from the surface of a mesh.
    ///
    /// * `mesh`         - Emitting mesh in object space.
    /// * `transform`    - Object to world transform.
    /// * `color`        - Light color.
    /// * `intensity`    - Intensity multiplier.
    /// * `casts_shadow` - Trace shadow rays.
    /// * `generator`    - Light sample generator.
    pub fn area(
        mesh: &Mesh,
        transform: &Mat4,
        color: Rgb,
        intensity: Float,
        casts_shadow: bool,
        generator: LightVertexGenerator,
    ) -> Self {
        let instance = mesh.transformed(transform);
        let vertices = generator.generate(&instance);
        Self {
            position: instance.bounds().center(),
            color,
            intensity,
            casts_shadow,
            attenuation: None,
            cutoff: None,
            influence: LightInfluence::Area,
            vertex_generator: Some(generator),
            photon_emitter: Some(PhotonEmitter::Area {
                count: DEFAULT_PHOTON_COUNT,
            }),
            vertices,
        }
    }

    /// Sets the number of photons emitted per pass.
    ///
    /// * `count` - Photons per pass.
    pub fn with_photon_count(mut self, count: usize) -> Self {
        self.photon_emitter = self.photon_emitter.map(|e| e.with_count(count));
        self
    }

    /// Removes the photon emitter so the light only contributes direct light.
    pub fn without_photons(mut self) -> Self {
        self.photon_emitter = None;
        self
    }

    /// Returns the light samples. Empty for lights evaluated at their
    /// position.
    pub fn vertices(&self) -> &[LightVertex] {
        &self.vertices
    }

    /// Returns the single sample used for lights without generated vertices.
    pub fn position_sample(&self) -> LightVertex {
        LightVertex::new(self.position, Vec3::ZERO)
    }

    /// Returns the product of influence, attenuation and cutoff for one
    /// light sample. The shadow ray is skipped when attenuation or cutoff
    /// already reject the point.
    ///
    /// * `tracer` - Tracer used for the shadow ray.
    /// * `sample` - Light sample.
    /// * `point`  - Surface point.
    /// * `normal` - Unit surface normal.
    /// * `far`    - Shadow ray length for directional light.
    pub fn influence_at(&self, tracer: &dyn RayTracer, sample: &LightVertex, point: Vec3, normal: Vec3, far: Float) -> Float {
        let mut factor = 1.0;
        if let Some(attenuation) = self.attenuation.as_ref() {
            factor *= attenuation.calculate(sample.position.distance(point));
        }
        if let Some(cutoff) = self.cutoff.as_ref() {
            factor *= cutoff.calculate(sample.position, point);
        }
        if factor <= 0.0 {
            return 0.0;
        }
        factor * self.influence.calculate(tracer, self.casts_shadow, sample, point, normal, far)
    }

    /// Returns the energy a photon leaves the light with. Black without a
    /// photon emitter.
    pub fn photon_flux(&self) -> Rgb {
        match self.photon_emitter.as_ref() {
            Some(emitter) if emitter.count() > 0 => self.color * self.intensity,
            _ => Rgb::BLACK,
        }
    }

    /// Returns the fraction of a traced photon's energy that is stored, one
    /// over the photons of a pass. Zero without a photon emitter.
    pub fn photon_share(&self) -> Float {
        match self.photon_emitter.as_ref() {
            Some(emitter) if emitter.count() > 0 => 1.0 / emitter.count() as Float,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Vertex;
    use crate::tracer::*;
    use float_cmp::approx_eq;

    struct OpenTracer;

    impl RayTracer for OpenTracer {
        fn begin(&mut self) {}
        fn add_mesh(&mut self, _mesh: &Mesh, _index: usize) {}
        fn end(&mut self) {}
        fn trace_segment(&self, _start: Vec3, _end: Vec3, _flags: HitFlags) -> Option<Hit> {
            None
        }
    }

    #[test]
    fn point_light_factors_multiply() {
        let light = Light::point(Vec3::new(0.0, 0.0, 1.0), Rgb::WHITE, 1.0, 10.0, false);
        let i = light.influence_at(&OpenTracer, &light.position_sample(), Vec3::ZERO, Vec3::Z, 100.0);
        let expected = LightAttenuation::linear(10.0).calculate(1.0);
        assert!(approx_eq!(f32, i, expected, epsilon = 1e-6));

        let out_of_range = light.influence_at(&OpenTracer, &light.position_sample(), Vec3::new(0.0, 0.0, -20.0), Vec3::Z, 100.0);
        assert_eq!(out_of_range, 0.0);
    }

    #[test]
    fn spot_light_cuts_outside_cone() {
        let light = Light::spot(Vec3::new(0.0, 0.0, 1.0), -Vec3::Z, 10.0, 1.0, Rgb::WHITE, 1.0, 10.0, false);
        let sample = light.position_sample();
        assert!(light.influence_at(&OpenTracer, &sample, Vec3::ZERO, Vec3::Z, 100.0) > 0.0);
        assert_eq!(light.influence_at(&OpenTracer, &sample, Vec3::new(1.0, 0.0, 0.0), Vec3::Z, 100.0), 0.0);
    }

    #[test]
    fn area_light_generates_world_samples() {
        let v = |x: Float, y: Float| Vertex::new(Vec3::new(x, y, 0.0), -Vec3::Z, Rgb::WHITE, Uv::ZERO, Uv::ZERO);
        let mut mesh = Mesh::new("panel");
        mesh.add_faces(&[v(0.0, 0.0), v(0.0, 1.0), v(1.0, 0.0)], &[0, 1, 2], None).unwrap();
        let light = Light::area(
            &mesh,
            &Mat4::from_translation(Vec3::new(0.0, 0.0, 2.0)),
            Rgb::WHITE,
            1.0,
            true,
            LightVertexGenerator::Mesh,
        );
        assert_eq!(light.vertices().len(), 3);
        assert!(light.vertices().iter().all(|s| s.position.z == 2.0));
        assert_eq!(light.influence, LightInfluence::Area);
    }

    #[test]
    fn photon_share_splits_flux() {
        let light = Light::point(Vec3::ZERO, Rgb::new(1.0, 0.5, 0.0), 2.0, 10.0, true).with_photon_count(4);
        assert_eq!(light.photon_flux(), Rgb::new(2.0, 1.0, 0.0));
        assert_eq!(light.photon_flux() * light.photon_share(), Rgb::new(0.5, 0.25, 0.0));
        let dark = light.without_photons();
        assert!(dark.photon_flux().is_black());
        assert_eq!(dark.photon_share(), 0.0);
    }
}
