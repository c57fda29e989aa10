//! Mesh

mod face;
mod material;
mod vertex;

// Re-export
pub use face::*;
pub use material::*;
pub use vertex::*;

use crate::common::*;
use crate::error::*;
use crate::geometry::*;
use crate::lightmap::*;
use std::collections::HashMap;

/// Indexed triangle mesh with the lightmap and photon map it is baked into.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Mesh name used in logs.
    pub name: String,

    /// Vertex buffer.
    vertices: Vec<Vertex>,

    /// Index buffer. Every 3 consecutive indices form a triangle.
    indices: Vec<u32>,

    /// Vertex buffer offsets of each face's corners.
    faces: Vec<[usize; 3]>,

    /// Bounds of all vertex positions.
    bounds: Bounds3f,

    /// Lightmap that bakers write into.
    lightmap: Option<Lightmap>,

    /// Photon map used by the indirect light bake.
    photonmap: Option<Photonmap>,
}

impl Mesh {
    /// Create a new empty `Mesh`.
    ///
    /// * `name` - Mesh name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    /// Appends a triangle list to the mesh. Indices are relative to the
    /// supplied vertices and are offset by the existing vertex count. Every
    /// new vertex is assigned `material`.
    ///
    /// * `vertices` - Vertices to append.
    /// * `indices`  - Triangle list indices into `vertices`.
    /// * `material` - Material assigned to the new vertices.
    pub fn add_faces(&mut self, vertices: &[Vertex], indices: &[u32], material: Option<ArcMaterial>) -> Result<()> {
        if indices.len() % 3 != 0 {
            return Err(RelightError::invalid_call(format!(
                "mesh '{}': index count {} is not a multiple of 3",
                self.name,
                indices.len()
            )));
        }
        if let Some(i) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(RelightError::invalid_call(format!(
                "mesh '{}': index {} out of range for {} vertices",
                self.name,
                i,
                vertices.len()
            )));
        }

        let offset = self.vertices.len() as u32;
        self.vertices.extend(vertices.iter().map(|v| Vertex {
            material: material.clone(),
            ..v.clone()
        }));
        self.indices.extend(indices.iter().map(|i| i + offset));

        self.rebuild();
        Ok(())
    }

    /// Appends unindexed triangles, merging equal vertices.
    ///
    /// * `triangles` - Vertices, 3 per triangle.
    /// * `material`  - Material assigned to the new vertices.
    pub fn add_triangles(&mut self, triangles: &[Vertex], material: Option<ArcMaterial>) -> Result<()> {
        let mut unique: Vec<Vertex> = Vec::with_capacity(triangles.len());
        let mut lookup: HashMap<&Vertex, u32> = HashMap::with_capacity(triangles.len());
        let mut indices = Vec::with_capacity(triangles.len());

        for v in triangles {
            let index = *lookup.entry(v).or_insert_with(|| {
                unique.push(v.clone());
                (unique.len() - 1) as u32
            });
            indices.push(index);
        }

        self.add_faces(&unique, &indices, material)
    }

    /// Rebuilds the face cache and the bounds from the buffers.
    fn rebuild(&mut self) {
        self.faces = self
            .indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
            .collect();

        self.bounds = self
            .vertices
            .iter()
            .fold(Bounds3f::EMPTY, |b, v| b.union_point(v.position));
    }

    /// Returns a face.
    ///
    /// * `i` - Face index in `[0, face_count)`.
    pub fn face(&self, i: usize) -> Result<Face<'_>> {
        self.faces
            .get(i)
            .map(|&[a, b, c]| Face::new(i, &self.vertices[a], &self.vertices[b], &self.vertices[c]))
            .ok_or_else(|| {
                RelightError::invalid_call(format!(
                    "mesh '{}': face {} out of range for {} faces",
                    self.name,
                    i,
                    self.faces.len()
                ))
            })
    }

    /// Returns an iterator over all faces.
    pub fn faces(&self) -> impl Iterator<Item = Face<'_>> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, &[a, b, c])| Face::new(i, &self.vertices[a], &self.vertices[b], &self.vertices[c]))
    }

    /// Returns the number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns the vertex buffer.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the index buffer.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Returns the bounds of the vertex positions.
    pub fn bounds(&self) -> Bounds3f {
        self.bounds
    }

    /// Returns the total surface area.
    pub fn area(&self) -> Float {
        self.faces().map(|f| f.area()).sum()
    }

    /// Returns a copy of the geometry with positions transformed by `m` and
    /// normals by its inverse transpose. Lightmaps are not carried over.
    ///
    /// * `m` - Object to world transform.
    pub fn transformed(&self, m: &Mat4) -> Self {
        let normal_matrix = Mat3::from_mat4(*m).inverse().transpose();
        let vertices: Vec<Vertex> = self
            .vertices
            .iter()
            .map(|v| Vertex {
                position: m.transform_point3(v.position),
                normal: (normal_matrix * v.normal).normalize_or_zero(),
                ..v.clone()
            })
            .collect();

        let mut mesh = Self {
            name: self.name.clone(),
            vertices,
            indices: self.indices.clone(),
            ..Default::default()
        };
        mesh.rebuild();
        mesh
    }

    /// Creates a `width` x `height` lightmap rasterized from the mesh faces,
    /// replacing any previous one.
    ///
    /// * `width`  - Width in lumels.
    /// * `height` - Height in lumels.
    pub fn attach_lightmap(&mut self, width: usize, height: usize) {
        self.lightmap = Some(Lightmap::from_mesh(self, width, height));
    }

    /// Creates a `width` x `height` photon map rasterized from the mesh
    /// faces, replacing any previous one.
    ///
    /// * `width`  - Width in lumels.
    /// * `height` - Height in lumels.
    pub fn attach_photonmap(&mut self, width: usize, height: usize) {
        self.photonmap = Some(Photonmap::from_mesh(self, width, height));
    }

    /// Returns the lightmap.
    pub fn lightmap(&self) -> Option<&Lightmap> {
        self.lightmap.as_ref()
    }

    /// Returns the photon map.
    pub fn photonmap(&self) -> Option<&Photonmap> {
        self.photonmap.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn vertex(x: Float, y: Float) -> Vertex {
        Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z, Rgb::WHITE, Uv::new(x, y), Uv::ZERO)
    }

    fn quad() -> (Vec<Vertex>, Vec<u32>) {
        (
            vec![vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(1.0, 1.0), vertex(0.0, 1.0)],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn add_faces_offsets_indices() {
        let (v, i) = quad();
        let mut mesh = Mesh::new("quad");
        mesh.add_faces(&v, &i, None).unwrap();
        mesh.add_faces(&v, &i, None).unwrap();
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(&mesh.indices()[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(mesh.bounds(), Bounds3f::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn add_faces_assigns_material() {
        let (v, i) = quad();
        let material = Arc::new(Material::new("red", crate::color::Rgba::new(1.0, 0.0, 0.0, 1.0)));
        let mut mesh = Mesh::new("quad");
        mesh.add_faces(&v, &i, Some(Arc::clone(&material))).unwrap();
        assert!(mesh.vertices().iter().all(|v| v.material.as_deref() == Some(&*material)));
    }

    #[test]
    fn add_faces_rejects_bad_indices() {
        let (v, _) = quad();
        let mut mesh = Mesh::new("bad");
        assert!(matches!(mesh.add_faces(&v, &[0, 1], None), Err(RelightError::InvalidCall(_))));
        assert!(matches!(mesh.add_faces(&v, &[0, 1, 4], None), Err(RelightError::InvalidCall(_))));
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn face_out_of_range_is_invalid_call() {
        let (v, i) = quad();
        let mut mesh = Mesh::new("quad");
        mesh.add_faces(&v, &i, None).unwrap();
        assert!(mesh.face(1).is_ok());
        assert!(matches!(mesh.face(2), Err(RelightError::InvalidCall(_))));
    }

    #[test]
    fn add_triangles_merges_vertices() {
        let (v, i) = quad();
        let soup: Vec<Vertex> = i.iter().map(|&i| v[i as usize].clone()).collect();
        let mut mesh = Mesh::new("soup");
        mesh.add_triangles(&soup, None).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert!((mesh.area() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn transformed_leaves_original() {
        let (v, i) = quad();
        let mut mesh = Mesh::new("quad");
        mesh.add_faces(&v, &i, None).unwrap();
        let m = Mat4::from_translation(Vec3::new(0.0, 0.0, 2.0)) * Mat4::from_rotation_x(PI_OVER_TWO);
        let t = mesh.transformed(&m);
        assert_eq!(mesh.vertices()[2].position, Vec3::new(1.0, 1.0, 0.0));
        assert!((t.vertices()[2].position - Vec3::new(1.0, 0.0, 3.0)).length() < 1e-5);
        assert!((t.vertices()[0].normal - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-5);
        assert!((t.bounds().p_max.z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn transformed_normals_stay_perpendicular() {
        let n = Vec3::new(1.0, 0.0, 1.0).normalize();
        let v = Vertex::new(Vec3::ZERO, n, Rgb::WHITE, Uv::ZERO, Uv::ZERO);
        let mut mesh = Mesh::new("slope");
        mesh.add_faces(&[v.clone(), v.clone(), v], &[0, 1, 2], None).unwrap();

        let t = mesh.transformed(&Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)));
        let expected = Vec3::new(0.5, 0.0, 1.0).normalize();
        assert!((t.vertices()[0].normal - expected).length() < 1e-5);
    }

    #[test]
    fn uniform_scale_rotates_normals_only() {
        let (v, i) = quad();
        let mut mesh = Mesh::new("quad");
        mesh.add_faces(&v, &i, None).unwrap();
        let rotation = Mat4::from_rotation_y(0.7);
        let rotated = mesh.transformed(&rotation);
        let scaled = mesh.transformed(&(rotation * Mat4::from_scale(Vec3::splat(3.0))));
        for (a, b) in rotated.vertices().iter().zip(scaled.vertices()) {
            assert!((a.normal - b.normal).length() < 1e-5);
            assert!((a.normal - rotation.transform_vector3(Vec3::Z)).length() < 1e-5);
        }
    }

    proptest! {
        #[test]
        fn index_count_tracks_faces(batches in prop::collection::vec(prop::collection::vec(0u32..4, 0..5), 0..6)) {
            let (v, _) = quad();
            let mut mesh = Mesh::new("prop");
            for batch in batches {
                let indices: Vec<u32> = batch.iter().flat_map(|&i| [i, (i + 1) % 4, (i + 2) % 4]).collect();
                mesh.add_faces(&v, &indices, None).unwrap();
            }
            prop_assert_eq!(mesh.index_count(), 3 * mesh.face_count());
            prop_assert!(mesh.indices().iter().all(|&i| (i as usize) < mesh.vertex_count()));
        }
    }
}
