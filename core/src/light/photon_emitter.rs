//! Photon Emitter

use super::Light;
use crate::common::*;
use crate::geometry::*;
use crate::rng::RNG;
use crate::sampling::*;

/// A photon leaving a light.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EmittedPhoton {
    /// Ray origin.
    pub origin: Vec3,

    /// Unit direction.
    pub direction: Vec3,
}

/// How a light distributes photons.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PhotonEmitter {
    /// Uniform directions over the sphere from the light position.
    Point {
        /// Photons per pass.
        count: usize,
    },

    /// Parallel rays from a disk covering the scene.
    Directional {
        /// Unit direction the light travels in.
        direction: Vec3,

        /// Photons per pass.
        count: usize,
    },

    /// Cosine weighted directions from a random light sample.
    Area {
        /// Photons per pass.
        count: usize,
    },
}

impl PhotonEmitter {
    /// Returns the number of photons emitted per pass.
    pub fn count(&self) -> usize {
        match *self {
            Self::Point { count } => count,
            Self::Directional { count, .. } => count,
            Self::Area { count } => count,
        }
    }

    /// Returns a copy emitting a different number of photons.
    ///
    /// * `count` - Photons per pass.
    pub fn with_count(self, count: usize) -> Self {
        match self {
            Self::Point { .. } => Self::Point { count },
            Self::Directional { direction, .. } => Self::Directional { direction, count },
            Self::Area { .. } => Self::Area { count },
        }
    }

    /// Samples one photon. Returns `None` when the light has nothing to
    /// emit from.
    ///
    /// * `light`  - The emitting light.
    /// * `bounds` - Scene bounds.
    /// * `rng`    - Random number generator.
    pub fn emit(&self, light: &Light, bounds: &Bounds3f, rng: &mut RNG) -> Option<EmittedPhoton> {
        match *self {
            Self::Point { .. } => Some(EmittedPhoton {
                origin: light.position,
                direction: uniform_sample_sphere(rng.uniform_vec2()),
            }),

            Self::Directional { direction, .. } => {
                let direction = direction.normalize_or_zero();
                if direction == Vec3::ZERO || bounds.is_empty() {
                    return None;
                }
                let radius = bounds.bounding_radius();
                let frame = CoordinateSystem::from(direction);
                let d = concentric_sample_disk(rng.uniform_vec2()) * radius;
                let origin = bounds.center() + frame.tangent * d.x + frame.bitangent * d.y - direction * radius;
                Some(EmittedPhoton { origin, direction })
            }

            Self::Area { .. } => {
                let vertices = light.vertices();
                if vertices.is_empty() {
                    return None;
                }
                let v = vertices[rng.bounded_u32(vertices.len() as u32) as usize];
                Some(EmittedPhoton {
                    origin: v.position + v.normal * RAY_OFFSET,
                    direction: cosine_sample_hemisphere_around(v.normal, rng.uniform_vec2()),
                })
            }
        }
    }
}
