//! Light Vertex Generator

use crate::common::*;
use crate::geometry::*;
use crate::mesh::Mesh;

/// Maximum number of times a face is split in half along each edge.
const MAX_SUBDIVISION_DEPTH: usize = 8;

/// A sample point on an emitting surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightVertex {
    /// World space position.
    pub position: Vec3,

    /// Unit emission normal.
    pub normal: Vec3,
}

impl LightVertex {
    /// Create a new `LightVertex`.
    ///
    /// * `position` - World space position.
    /// * `normal`   - Unit emission normal.
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Turns an emitting mesh into a set of light samples.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightVertexGenerator {
    /// One sample per mesh vertex.
    Mesh,

    /// Faces are split at edge midpoints until every piece has an area of at
    /// most `max_area`; one sample per piece at its centroid.
    Faces {
        /// Largest area represented by a single sample.
        max_area: Float,
    },
}

impl LightVertexGenerator {
    /// Generates light samples for a mesh in world space.
    ///
    /// * `mesh` - Emitting mesh.
    pub fn generate(&self, mesh: &Mesh) -> Vec<LightVertex> {
        match *self {
            Self::Mesh => mesh
                .vertices()
                .iter()
                .map(|v| LightVertex::new(v.position, v.normal))
                .collect(),

            Self::Faces { max_area } => {
                let mut samples = vec![];
                for face in mesh.faces() {
                    let normal = face.normal();
                    let mut stack = vec![(
                        [face.vertex(0).position, face.vertex(1).position, face.vertex(2).position],
                        0,
                    )];
                    while let Some(([a, b, c], depth)) = stack.pop() {
                        let area = 0.5 * (b - a).cross(c - a).length();
                        if area <= max_area || depth >= MAX_SUBDIVISION_DEPTH {
                            samples.push(LightVertex::new((a + b + c) / 3.0, normal));
                            continue;
                        }
                        let (ab, bc, ca) = ((a + b) * 0.5, (b + c) * 0.5, (c + a) * 0.5);
                        stack.push(([a, ab, ca], depth + 1));
                        stack.push(([ab, b, bc], depth + 1));
                        stack.push(([ca, bc, c], depth + 1));
                        stack.push(([ab, bc, ca], depth + 1));
                    }
                }
                samples
            }
        }
    }
}
