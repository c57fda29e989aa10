//! Lightmaps

mod lightmap;
mod lumel;
mod photonmap;

// Re-export
pub use lightmap::*;
pub use lumel::*;
pub use photonmap::*;
