//! Command line options

use clap::{Parser, ValueEnum};
use relight_bakers::*;
use relight_core::lightmap::LightmapEncoding;
use std::path::PathBuf;

/// Bake quality preset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Quality {
    Draft,
    Fast,
    Best,
    Production,
}

impl Quality {
    /// Returns the photon and final gather parameters of the preset.
    pub fn indirect_light(&self) -> IndirectLightSettings {
        match self {
            Self::Draft => IndirectLightSettings::draft(),
            Self::Fast => IndirectLightSettings::fast(),
            Self::Best => IndirectLightSettings::best(),
            Self::Production => IndirectLightSettings::production(),
        }
    }

    /// Returns the ambient occlusion parameters of the preset.
    pub fn ambient_occlusion(&self) -> AmbientOcclusionSettings {
        match self {
            Self::Draft => AmbientOcclusionSettings::draft(),
            Self::Fast => AmbientOcclusionSettings::fast(),
            Self::Best => AmbientOcclusionSettings::best(),
            Self::Production => AmbientOcclusionSettings::production(),
        }
    }
}

/// Lightmap file format.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// 8-bit PNG.
    Png,

    /// 32-bit float OpenEXR.
    Exr,
}

/// Pixel encoding of 8-bit output.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PngEncoding {
    Ldr,
    DoubleLdr,
    Rgbm,
}

impl From<PngEncoding> for LightmapEncoding {
    fn from(e: PngEncoding) -> Self {
        match e {
            PngEncoding::Ldr => Self::Ldr,
            PngEncoding::DoubleLdr => Self::DoubleLdr,
            PngEncoding::Rgbm => Self::Rgbm { range: 8.0 },
        }
    }
}

/// Baker options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Bakes lightmaps for a procedural test scene.", long_about = None)]
pub struct Options {
    /// Number of threads to use for baking.
    #[arg(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 1,
        help = "Use specified number of threads for baking."
    )]
    n_threads: usize,

    /// Quality preset.
    #[arg(long, short = 'q', value_enum, default_value_t = Quality::Fast)]
    pub quality: Quality,

    /// Lightmap width and height.
    #[arg(long, short = 's', value_name = "LUMELS", default_value_t = 64)]
    pub size: usize,

    /// Output directory.
    #[arg(long = "outdir", short = 'o', value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Output file format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    pub format: OutputFormat,

    /// Pixel encoding of PNG output.
    #[arg(long, value_enum, default_value_t = PngEncoding::Rgbm)]
    pub encoding: PngEncoding,

    /// Skip photon emission and final gather.
    #[arg(long = "no-indirect", help = "Only bake direct light.")]
    pub no_indirect: bool,

    /// Add light reflected between lumels by radiosity.
    #[arg(long, help = "Run a radiosity solve after the light passes.")]
    pub radiosity: bool,

    /// Also bake ambient occlusion maps.
    #[arg(long, help = "Write ambient occlusion maps next to the lightmaps.")]
    pub ao: bool,

    /// BVH split method.
    #[arg(long = "split", value_name = "METHOD", default_value = "sah", help = "BVH split method: sah, middle or equal.")]
    pub split_method: String,

    /// Suppress all text output other than error messages.
    #[arg(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => {
                warn!("Invalid nthreads");
                1
            }
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }
}
