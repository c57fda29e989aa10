//! Lumel

use crate::color::*;
use crate::geometry::*;
use crate::parallel::*;
use std::sync::atomic::{AtomicU32, Ordering};

/// One pixel of a lightmap or photon map.
///
/// Geometry is fixed when the map is rasterized. Color and photon count are
/// accumulated through atomics so workers sharing a map only need `&Lumel`.
#[derive(Debug, Default)]
pub struct Lumel {
    /// Column in the map.
    pub x: usize,

    /// Row in the map.
    pub y: usize,

    /// True if a face covers the pixel centre. Unused lumels are inert.
    pub used: bool,

    /// World space sample position.
    pub position: Vec3,

    /// World space unit normal.
    pub normal: Vec3,

    /// Owning face index.
    pub face: usize,

    /// Barycentric coordinates of the sample in the owning face.
    pub bary: Vec2,

    /// Accumulated color.
    color: AtomicRgb,

    /// Number of photons stored.
    photons: AtomicU32,
}

impl Lumel {
    /// Create a new unused `Lumel`.
    ///
    /// * `x` - Column in the map.
    /// * `y` - Row in the map.
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    /// Returns the accumulated color.
    pub fn color(&self) -> Rgb {
        self.color.load()
    }

    /// Replaces the accumulated color.
    ///
    /// * `c` - New color.
    pub fn set_color(&self, c: Rgb) {
        self.color.store(c);
    }

    /// Adds to the accumulated color.
    ///
    /// * `c` - Color to add.
    pub fn add_color(&self, c: Rgb) {
        self.color.add(c);
    }

    /// Stores a photon's energy.
    ///
    /// * `energy` - Photon energy.
    pub fn add_photon(&self, energy: Rgb) {
        self.color.add(energy);
        self.photons.fetch_add(1, Ordering::AcqRel);
    }

    /// Returns the number of photons stored.
    pub fn photons(&self) -> u32 {
        self.photons.load(Ordering::Acquire)
    }

    /// Clears color and photon count.
    pub fn clear(&self) {
        self.color.store(Rgb::BLACK);
        self.photons.store(0, Ordering::Release);
    }
}

impl Clone for Lumel {
    fn clone(&self) -> Self {
        Self {
            x: self.x,
            y: self.y,
            used: self.used,
            position: self.position,
            normal: self.normal,
            face: self.face,
            bary: self.bary,
            color: self.color.clone(),
            photons: AtomicU32::new(self.photons()),
        }
    }
}
