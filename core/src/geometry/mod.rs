//! Geometry
//!
//! Vector and matrix algebra comes from `glam`; this module adds the
//! bounding volumes and frames the baker needs on top of it.

mod axis;
mod bounds2;
mod bounds3;
mod coordinate_system;

// Re-export
pub use axis::*;
pub use bounds2::*;
pub use bounds3::*;
pub use coordinate_system::*;
pub use glam::{Mat3, Mat4, Vec2, Vec3};

/// Texture coordinate.
pub type Uv = Vec2;
