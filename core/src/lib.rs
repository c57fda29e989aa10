//! Core

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate log;

// Re-export.
pub mod baker;
pub mod color;
pub mod common;
pub mod error;
pub mod geometry;
pub mod light;
pub mod lightmap;
pub mod mesh;
pub mod parallel;
pub mod progress;
pub mod rng;
pub mod sampling;
pub mod scene;
pub mod tracer;
pub mod worker;
