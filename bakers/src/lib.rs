//! Lighting kernels, the radiosity solver and the bake entry point.

#[macro_use]
extern crate log;

mod ambient_occlusion;
mod direct_light;
mod indirect_light;
mod photons;
mod radiosity;
mod relight;
mod settings;

#[cfg(test)]
mod test_scenes;

// Re-export
pub use ambient_occlusion::*;
pub use direct_light::*;
pub use indirect_light::*;
pub use photons::*;
pub use radiosity::*;
pub use relight::*;
pub use settings::*;
