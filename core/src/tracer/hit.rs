//! Hit

use crate::color::*;
use crate::common::Float;
use crate::geometry::*;
use bitflags::bitflags;

bitflags! {
    /// Selects the `Hit` fields a tracer fills in. Fields not requested are
    /// left at their defaults.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct HitFlags: u8 {
        /// Interpolated shading normal.
        const NORMAL = 1;

        /// Surface color: vertex color modulated by material diffuse.
        const COLOR = 2;

        /// Lightmap UV.
        const UV = 4;

        /// Ignore hits on cut-out materials.
        const USE_ALPHA = 8;

        /// Every attribute.
        const ALL = Self::NORMAL.bits() | Self::COLOR.bits() | Self::UV.bits();
    }
}

/// Closest intersection on a traced segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    /// World space hit point.
    pub point: Vec3,

    /// Shading normal if `HitFlags::NORMAL` was requested.
    pub normal: Vec3,

    /// Surface color if `HitFlags::COLOR` was requested.
    pub color: Rgb,

    /// Material alpha at the hit.
    pub alpha: Float,

    /// Lightmap UV if `HitFlags::UV` was requested.
    pub uv: Uv,

    /// Index of the hit mesh in the scene.
    pub mesh: usize,

    /// Index of the hit face in its mesh.
    pub face: usize,

    /// Parametric distance along the segment in `[0, 1]`.
    pub t: Float,
}

impl Default for Hit {
    fn default() -> Self {
        Self {
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            color: Rgb::BLACK,
            alpha: 1.0,
            uv: Uv::ZERO,
            mesh: 0,
            face: 0,
            t: 0.0,
        }
    }
}
