//! Light Cutoff

use crate::common::*;
use crate::geometry::*;

/// Angular restriction of a light's emission.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightCutoff {
    /// Cone around `direction`.
    Spot {
        /// Unit cone axis.
        direction: Vec3,

        /// Half angle of the cone in radians.
        cutoff: Float,

        /// Falloff exponent applied to the cosine inside the cone.
        exponent: Float,
    },
}

impl LightCutoff {
    /// Returns the cutoff factor for light travelling from `light` to
    /// `point`.
    ///
    /// * `light` - Light sample position.
    /// * `point` - Receiving point.
    pub fn calculate(&self, light: Vec3, point: Vec3) -> Float {
        match *self {
            Self::Spot {
                direction,
                cutoff,
                exponent,
            } => {
                let to_point = (point - light).normalize_or_zero();
                let cos = direction.dot(to_point);
                if cos < cutoff.cos() {
                    0.0
                } else {
                    cos.powf(exponent)
                }
            }
        }
    }
}
