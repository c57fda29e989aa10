//! Colors

mod rgb;
mod rgba;

// Re-export
pub use rgb::*;
pub use rgba::*;
