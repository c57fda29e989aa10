//! Light Attenuation

use crate::common::*;

/// Distance falloff of a light.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightAttenuation {
    /// `1 / (constant + linear r + quadratic r^2)` with `r = d / radius`,
    /// zero at and beyond `radius`.
    Linear {
        /// Distance past which the light has no effect.
        radius: Float,

        /// Constant term.
        constant: Float,

        /// Linear term.
        linear: Float,

        /// Quadratic term.
        quadratic: Float,
    },
}

impl LightAttenuation {
    /// Returns a `Linear` attenuation with a quadratic falloff that reaches a
    /// small fraction of full intensity at `radius`.
    ///
    /// * `radius` - Distance past which the light has no effect.
    pub fn linear(radius: Float) -> Self {
        Self::Linear {
            radius,
            constant: 1.0,
            linear: 0.0,
            quadratic: 25.0,
        }
    }

    /// Returns the attenuation factor at a distance.
    ///
    /// * `distance` - Distance from the light.
    pub fn calculate(&self, distance: Float) -> Float {
        match *self {
            Self::Linear {
                radius,
                constant,
                linear,
                quadratic,
            } => {
                if distance >= radius || radius <= 0.0 {
                    return 0.0;
                }
                let r = distance / radius;
                let denom = constant + linear * r + quadratic * r * r;
                if denom > 0.0 {
                    1.0 / denom
                } else {
                    0.0
                }
            }
        }
    }
}
