//! Light Influence

use super::LightVertex;
use crate::common::*;
use crate::geometry::*;
use crate::tracer::RayTracer;

/// How much a light sample illuminates a surface point before attenuation
/// and cutoff are applied.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightInfluence {
    /// Lambert term for light arriving from the sample position.
    Point,

    /// Lambert term for parallel light travelling along `direction`.
    Directional {
        /// Unit direction the light travels in.
        direction: Vec3,
    },

    /// Lambert term scaled by the emitting sample's cosine.
    Area,
}

impl LightInfluence {
    /// Returns the influence of a light sample on a surface point, zero when
    /// the point faces away or is shadowed.
    ///
    /// * `tracer`       - Tracer used for the shadow ray.
    /// * `casts_shadow` - Trace a shadow ray.
    /// * `sample`       - Light sample.
    /// * `point`        - Surface point.
    /// * `normal`       - Unit surface normal.
    /// * `far`          - Shadow ray length for directional light.
    pub fn calculate(
        &self,
        tracer: &dyn RayTracer,
        casts_shadow: bool,
        sample: &LightVertex,
        point: Vec3,
        normal: Vec3,
        far: Float,
    ) -> Float {
        let (incident, light_point, emitter_cos) = match *self {
            Self::Point | Self::Area => {
                let dir = point - sample.position;
                let distance = dir.length();
                if distance <= 0.0 {
                    return 0.0;
                }
                let incident = dir / distance;
                let emitter_cos = match self {
                    Self::Area => max(0.0, incident.dot(sample.normal)),
                    _ => 1.0,
                };
                // Area samples lie on the emitter, so the shadow ray stops short of it.
                (incident, sample.position + sample.normal * RAY_OFFSET, emitter_cos)
            }
            Self::Directional { direction } => {
                let incident = direction.normalize_or_zero();
                (incident, point - incident * far, 1.0)
            }
        };

        let influence = lambert(incident, normal) * emitter_cos;
        if influence <= 0.0 {
            return 0.0;
        }

        if casts_shadow && tracer.test(point + normal * RAY_OFFSET, light_point) {
            return 0.0;
        }

        influence
    }
}

/// Lambert cosine law for light travelling along `incident`.
///
/// * `incident` - Unit direction from the light to the surface.
/// * `normal`   - Unit surface normal.
#[inline]
pub fn lambert(incident: Vec3, normal: Vec3) -> Float {
    max(0.0, -incident.dot(normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use crate::tracer::*;
    use float_cmp::approx_eq;

    /// Answers every query with a fixed occlusion result.
    struct FixedTracer(bool);

    impl RayTracer for FixedTracer {
        fn begin(&mut self) {}
        fn add_mesh(&mut self, _mesh: &Mesh, _index: usize) {}
        fn end(&mut self) {}
        fn trace_segment(&self, start: Vec3, _end: Vec3, _flags: HitFlags) -> Option<Hit> {
            self.0.then(|| Hit {
                point: start,
                ..Default::default()
            })
        }
    }

    fn above() -> LightVertex {
        LightVertex::new(Vec3::new(0.0, 0.0, 1.0), -Vec3::Z)
    }

    #[test]
    fn point_lambert() {
        let open = FixedTracer(false);
        let i = LightInfluence::Point.calculate(&open, true, &above(), Vec3::ZERO, Vec3::Z, 10.0);
        assert!(approx_eq!(f32, i, 1.0));

        let tilted = Vec3::new(1.0, 0.0, 1.0).normalize();
        let i = LightInfluence::Point.calculate(&open, true, &above(), Vec3::ZERO, tilted, 10.0);
        assert!(approx_eq!(f32, i, tilted.z, epsilon = 1e-6));

        let i = LightInfluence::Point.calculate(&open, true, &above(), Vec3::ZERO, -Vec3::Z, 10.0);
        assert_eq!(i, 0.0);
    }

    #[test]
    fn shadow_ray_only_when_casting() {
        let blocked = FixedTracer(true);
        assert_eq!(LightInfluence::Point.calculate(&blocked, true, &above(), Vec3::ZERO, Vec3::Z, 10.0), 0.0);
        assert_eq!(LightInfluence::Point.calculate(&blocked, false, &above(), Vec3::ZERO, Vec3::Z, 10.0), 1.0);
    }

    #[test]
    fn coincident_sample_has_no_influence() {
        let open = FixedTracer(false);
        let sample = LightVertex::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(LightInfluence::Point.calculate(&open, true, &sample, Vec3::ZERO, Vec3::Z, 10.0), 0.0);
    }

    #[test]
    fn directional_ignores_sample_position() {
        let open = FixedTracer(false);
        let d = LightInfluence::Directional { direction: -Vec3::Z };
        let far_away = LightVertex::new(Vec3::new(100.0, 0.0, -5.0), Vec3::Z);
        assert!(approx_eq!(f32, d.calculate(&open, true, &far_away, Vec3::ZERO, Vec3::Z, 10.0), 1.0));
    }

    #[test]
    fn area_uses_emitter_cosine() {
        let open = FixedTracer(false);
        let facing_down = above();
        assert!(approx_eq!(f32, LightInfluence::Area.calculate(&open, true, &facing_down, Vec3::ZERO, Vec3::Z, 10.0), 1.0));

        let facing_up = LightVertex::new(Vec3::new(0.0, 0.0, 1.0), Vec3::Z);
        assert_eq!(LightInfluence::Area.calculate(&open, true, &facing_up, Vec3::ZERO, Vec3::Z, 10.0), 0.0);
    }
}
