//! Ray Tracer
//!
//! Bakers only see the scene geometry through `RayTracer`. The structure is
//! built once by `Scene::end` and then queried concurrently by every worker,
//! so queries take `&self`.

mod hit;

// Re-export
pub use hit::*;

use crate::geometry::*;
use crate::mesh::Mesh;

/// Ray intersection oracle over the meshes of a scene.
pub trait RayTracer: Send + Sync {
    /// Starts collecting meshes, discarding any previous structure.
    fn begin(&mut self);

    /// Adds the triangles of a mesh.
    ///
    /// * `mesh`  - The mesh in world space.
    /// * `index` - Index of the mesh in the scene, reported in hits.
    fn add_mesh(&mut self, mesh: &Mesh, index: usize);

    /// Builds the acceleration structure from the collected meshes.
    fn end(&mut self);

    /// Returns the closest hit on the segment from `start` to `end`.
    ///
    /// * `start` - Segment start.
    /// * `end`   - Segment end.
    /// * `flags` - Fields to fill in.
    fn trace_segment(&self, start: Vec3, end: Vec3, flags: HitFlags) -> Option<Hit>;

    /// Traces 4 segments at once.
    ///
    /// * `segments` - `(start, end)` pairs.
    /// * `flags`    - Fields to fill in.
    fn trace_segment4(&self, segments: &[(Vec3, Vec3); 4], flags: HitFlags) -> [Option<Hit>; 4] {
        segments.map(|(start, end)| self.trace_segment(start, end, flags))
    }

    /// Returns true if anything blocks the segment from `start` to `end`.
    ///
    /// * `start` - Segment start.
    /// * `end`   - Segment end.
    fn test(&self, start: Vec3, end: Vec3) -> bool {
        self.trace_segment(start, end, HitFlags::empty()).is_some()
    }
}
