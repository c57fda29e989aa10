//! Quality settings.

use relight_core::color::Rgb;
use relight_core::common::*;

/// Parameters of the photon and final gather passes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IndirectLightSettings {
    /// Number of photon emission passes.
    pub photon_pass_count: usize,

    /// Number of bounces a photon makes after its first hit.
    pub photon_bounce_count: usize,

    /// Photons are dropped once their luminance falls below it. Photons
    /// leave a light with its full color times intensity.
    pub photon_energy_threshold: Float,

    /// World space distance limit of the photon density estimate.
    pub photon_max_distance: Float,

    /// Hemisphere rays per lumel during final gather.
    pub final_gather_samples: usize,

    /// Length of final gather rays.
    pub final_gather_distance: Float,

    /// Photon map window radius in lumels.
    pub final_gather_radius: usize,

    /// Radiance of final gather rays that leave the scene.
    pub sky_color: Rgb,

    /// Constant term added by every final gather sample.
    pub ambient_color: Rgb,
}

impl IndirectLightSettings {
    /// Preview quality.
    pub fn draft() -> Self {
        Self {
            photon_pass_count: 8,
            photon_bounce_count: 3,
            photon_energy_threshold: 0.05,
            photon_max_distance: 1.0,
            final_gather_samples: 32,
            final_gather_distance: 50.0,
            final_gather_radius: 7,
            sky_color: Rgb::BLACK,
            ambient_color: Rgb::BLACK,
        }
    }

    /// Quick iteration.
    pub fn fast() -> Self {
        Self {
            photon_pass_count: 16,
            final_gather_samples: 64,
            ..Self::draft()
        }
    }

    /// High quality.
    pub fn best() -> Self {
        Self {
            photon_pass_count: 32,
            photon_energy_threshold: 0.005,
            final_gather_samples: 128,
            ..Self::draft()
        }
    }

    /// Shipping quality.
    pub fn production() -> Self {
        Self {
            photon_pass_count: 64,
            photon_energy_threshold: 0.0005,
            final_gather_samples: 512,
            ..Self::draft()
        }
    }

    /// Returns the settings with a sky and ambient color.
    ///
    /// * `sky_color`     - Radiance of rays that leave the scene.
    /// * `ambient_color` - Constant term of every sample.
    pub fn with_sky(self, sky_color: Rgb, ambient_color: Rgb) -> Self {
        Self {
            sky_color,
            ambient_color,
            ..self
        }
    }

    /// Returns the photon pass parameters.
    pub fn photons(&self) -> PhotonSettings {
        PhotonSettings::from(self)
    }
}

impl Default for IndirectLightSettings {
    fn default() -> Self {
        Self::fast()
    }
}

/// Parameters of photon emission and the photon map gather.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhotonSettings {
    /// Number of emission passes.
    pub pass_count: usize,

    /// A photon path ends after this many bounces.
    pub max_depth: usize,

    /// Luminance below which a photon is dropped.
    pub energy_threshold: Float,

    /// Gather window radius in lumels.
    pub gather_radius: usize,

    /// World space distance limit of the gather.
    pub gather_max_distance: Float,
}

impl From<&IndirectLightSettings> for PhotonSettings {
    fn from(s: &IndirectLightSettings) -> Self {
        Self {
            pass_count: s.photon_pass_count,
            max_depth: s.photon_bounce_count,
            energy_threshold: s.photon_energy_threshold,
            gather_radius: s.final_gather_radius,
            gather_max_distance: s.photon_max_distance,
        }
    }
}

/// Parameters of the ambient occlusion pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AmbientOcclusionSettings {
    /// Hemisphere rays per lumel.
    pub samples: usize,

    /// Fraction of occluded rays that makes a lumel fully dark.
    pub occluded_fraction: Float,

    /// Length of occlusion rays.
    pub max_distance: Float,

    /// Exponent applied to positive occlusion factors.
    pub exponent: Float,
}

impl AmbientOcclusionSettings {
    /// Preview quality.
    pub fn draft() -> Self {
        Self {
            samples: 32,
            occluded_fraction: 1.0,
            max_distance: 1.0,
            exponent: 1.0,
        }
    }

    /// Quick iteration.
    pub fn fast() -> Self {
        Self {
            samples: 64,
            ..Self::draft()
        }
    }

    /// High quality.
    pub fn best() -> Self {
        Self {
            samples: 128,
            ..Self::draft()
        }
    }

    /// Shipping quality.
    pub fn production() -> Self {
        Self {
            samples: 256,
            ..Self::draft()
        }
    }
}

impl Default for AmbientOcclusionSettings {
    fn default() -> Self {
        Self::fast()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_increase_quality() {
        let presets = [
            IndirectLightSettings::draft(),
            IndirectLightSettings::fast(),
            IndirectLightSettings::best(),
            IndirectLightSettings::production(),
        ];
        for pair in presets.windows(2) {
            assert!(pair[0].final_gather_samples < pair[1].final_gather_samples);
            assert!(pair[0].photon_pass_count < pair[1].photon_pass_count);
            assert!(pair[0].photon_energy_threshold >= pair[1].photon_energy_threshold);
        }

        let ao = [
            AmbientOcclusionSettings::draft(),
            AmbientOcclusionSettings::fast(),
            AmbientOcclusionSettings::best(),
            AmbientOcclusionSettings::production(),
        ];
        assert!(ao.windows(2).all(|p| p[0].samples < p[1].samples));
    }

    #[test]
    fn photon_settings_follow_indirect() {
        let s = IndirectLightSettings::best().with_sky(Rgb::WHITE, Rgb::gray(0.1));
        let p = s.photons();
        assert_eq!(p.pass_count, 32);
        assert_eq!(p.max_depth, s.photon_bounce_count);
        assert_eq!(p.gather_radius, s.final_gather_radius);
        assert_eq!(s.sky_color, Rgb::WHITE);
    }
}
