//! Scene

use crate::error::*;
use crate::geometry::*;
use crate::light::*;
use crate::mesh::*;
use crate::tracer::*;
use std::fmt;

/// Lifecycle of a `Scene`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneState {
    /// Created, nothing added yet.
    Initial,

    /// Between `begin` and `end`; meshes and lights may be added.
    AddingObjects,

    /// The tracer is built and the scene can be baked.
    ReadyToBake,
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::AddingObjects => write!(f, "adding objects"),
            Self::ReadyToBake => write!(f, "ready to bake"),
        }
    }
}

/// Mesh instances, lights and the tracer built over them.
pub struct Scene {
    /// Mesh instances in world space.
    meshes: Vec<Mesh>,

    /// All light sources in the scene.
    lights: Vec<Light>,

    /// Ray tracer. Only queried in `ReadyToBake`.
    tracer: Box<dyn RayTracer>,

    /// The bounding box of the scene geometry.
    bounds: Bounds3f,

    /// Lifecycle state.
    state: SceneState,
}

impl Scene {
    /// Creates a new empty `Scene`.
    ///
    /// * `tracer` - Ray tracer the scene geometry is loaded into.
    pub fn new(tracer: Box<dyn RayTracer>) -> Self {
        Self {
            meshes: vec![],
            lights: vec![],
            tracer,
            bounds: Bounds3f::EMPTY,
            state: SceneState::Initial,
        }
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> SceneState {
        self.state
    }

    /// Starts adding objects. A baked scene may be reopened; its tracer is
    /// rebuilt on the next `end`.
    pub fn begin(&mut self) -> Result<()> {
        if self.state == SceneState::AddingObjects {
            return Err(RelightError::invalid_call("Scene::begin called twice"));
        }
        self.state = SceneState::AddingObjects;
        Ok(())
    }

    /// Adds a mesh instance and returns its index.
    ///
    /// * `mesh` - Mesh in world space.
    pub fn add_mesh(&mut self, mesh: Mesh) -> Result<usize> {
        self.expect_adding("Scene::add_mesh")?;
        self.bounds = self.bounds.union(&mesh.bounds());
        self.meshes.push(mesh);
        Ok(self.meshes.len() - 1)
    }

    /// Adds a transformed copy of a mesh asset and returns its index.
    ///
    /// * `asset`     - Mesh in object space.
    /// * `transform` - Object to world transform.
    pub fn add_instance(&mut self, asset: &Mesh, transform: &Mat4) -> Result<usize> {
        self.expect_adding("Scene::add_instance")?;
        self.add_mesh(asset.transformed(transform))
    }

    /// Adds a light and returns its index.
    ///
    /// * `light` - The light.
    pub fn add_light(&mut self, light: Light) -> Result<usize> {
        self.expect_adding("Scene::add_light")?;
        self.lights.push(light);
        Ok(self.lights.len() - 1)
    }

    /// Stops adding objects and builds the tracer from every mesh.
    pub fn end(&mut self) -> Result<()> {
        self.expect_adding("Scene::end")?;

        self.tracer.begin();
        for (i, mesh) in self.meshes.iter().enumerate() {
            self.tracer.add_mesh(mesh, i);
        }
        self.tracer.end();

        info!(
            "Scene ready: {} meshes, {} faces, {} lights",
            self.meshes.len(),
            self.face_count(),
            self.lights.len()
        );
        self.state = SceneState::ReadyToBake;
        Ok(())
    }

    fn expect_adding(&self, call: &str) -> Result<()> {
        if self.state != SceneState::AddingObjects {
            return Err(RelightError::invalid_call(format!(
                "{} requires a scene between begin and end, state is {}",
                call, self.state
            )));
        }
        Ok(())
    }

    /// Returns the tracer once the scene is ready to bake.
    pub fn tracer(&self) -> Option<&dyn RayTracer> {
        match self.state {
            SceneState::ReadyToBake => Some(self.tracer.as_ref()),
            _ => None,
        }
    }

    /// Returns the tracer or an `InvalidCall` error naming the caller.
    ///
    /// * `call` - Name of the operation that needs the tracer.
    pub fn require_tracer(&self, call: &str) -> Result<&dyn RayTracer> {
        self.tracer()
            .ok_or_else(|| RelightError::invalid_call(format!("{} requires a scene that is ready to bake", call)))
    }

    /// Returns the mesh instances.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Returns a mesh instance.
    ///
    /// * `i` - Mesh index.
    pub fn mesh(&self, i: usize) -> Result<&Mesh> {
        self.meshes
            .get(i)
            .ok_or_else(|| RelightError::invalid_call(format!("mesh {} out of range for {} meshes", i, self.meshes.len())))
    }

    /// Returns the lights.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Returns the union of the mesh bounds.
    pub fn bounds(&self) -> Bounds3f {
        self.bounds
    }

    /// Returns the total number of faces.
    pub fn face_count(&self) -> usize {
        self.meshes.iter().map(|m| m.face_count()).sum()
    }

    /// Returns a length that spans the whole scene, used for rays that must
    /// leave it.
    pub fn far_distance(&self) -> crate::common::Float {
        if self.bounds.is_empty() {
            0.0
        } else {
            2.0 * self.bounds.bounding_radius() + 1.0
        }
    }

    /// Attaches a lightmap of the given size to every mesh.
    ///
    /// * `width`  - Width in lumels.
    /// * `height` - Height in lumels.
    pub fn attach_lightmaps(&mut self, width: usize, height: usize) {
        self.meshes.iter_mut().for_each(|m| m.attach_lightmap(width, height));
    }

    /// Attaches a photon map of the given size to every mesh.
    ///
    /// * `width`  - Width in lumels.
    /// * `height` - Height in lumels.
    pub fn attach_photonmaps(&mut self, width: usize, height: usize) {
        self.meshes.iter_mut().for_each(|m| m.attach_photonmap(width, height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts the meshes it was built from.
    struct CountingTracer(Arc<AtomicUsize>);

    impl RayTracer for CountingTracer {
        fn begin(&mut self) {
            self.0.store(0, Ordering::SeqCst);
        }
        fn add_mesh(&mut self, _mesh: &Mesh, _index: usize) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn end(&mut self) {}
        fn trace_segment(&self, _start: Vec3, _end: Vec3, _flags: HitFlags) -> Option<Hit> {
            None
        }
    }

    fn triangle(z: f32) -> Mesh {
        let v = |x: f32, y: f32| Vertex::new(Vec3::new(x, y, z), Vec3::Z, Rgb::WHITE, Uv::new(x, y), Uv::ZERO);
        let mut mesh = Mesh::new("triangle");
        mesh.add_faces(&[v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)], &[0, 1, 2], None).unwrap();
        mesh
    }

    #[test]
    fn lifecycle() {
        let added = Arc::new(AtomicUsize::new(0));
        let mut scene = Scene::new(Box::new(CountingTracer(Arc::clone(&added))));
        assert_eq!(scene.state(), SceneState::Initial);
        assert!(scene.tracer().is_none());

        scene.begin().unwrap();
        scene.add_mesh(triangle(0.0)).unwrap();
        scene.add_instance(&triangle(0.0), &Mat4::from_translation(Vec3::new(0.0, 0.0, 2.0))).unwrap();
        scene.add_light(Light::point(Vec3::Z, Rgb::WHITE, 1.0, 10.0, true)).unwrap();
        assert!(scene.tracer().is_none());

        scene.end().unwrap();
        assert_eq!(scene.state(), SceneState::ReadyToBake);
        assert!(scene.tracer().is_some());
        assert_eq!(added.load(Ordering::SeqCst), 2);
        assert_eq!(scene.face_count(), 2);
        assert_eq!(scene.bounds(), Bounds3f::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 2.0)));
    }

    #[test]
    fn begin_twice_is_invalid() {
        let mut scene = Scene::new(Box::new(CountingTracer(Arc::new(AtomicUsize::new(0)))));
        scene.begin().unwrap();
        assert!(matches!(scene.begin(), Err(RelightError::InvalidCall(_))));
    }

    #[test]
    fn adding_outside_begin_end_is_invalid() {
        let mut scene = Scene::new(Box::new(CountingTracer(Arc::new(AtomicUsize::new(0)))));
        assert!(matches!(scene.add_mesh(triangle(0.0)), Err(RelightError::InvalidCall(_))));
        assert!(matches!(scene.end(), Err(RelightError::InvalidCall(_))));

        scene.begin().unwrap();
        scene.end().unwrap();
        let light = Light::directional(-Vec3::Z, Rgb::WHITE, 1.0, true);
        assert!(matches!(scene.add_light(light), Err(RelightError::InvalidCall(_))));
        assert!(scene.meshes().is_empty());
    }

    #[test]
    fn attach_maps_to_every_mesh() {
        let mut scene = Scene::new(Box::new(CountingTracer(Arc::new(AtomicUsize::new(0)))));
        scene.begin().unwrap();
        scene.add_mesh(triangle(0.0)).unwrap();
        scene.add_mesh(triangle(1.0)).unwrap();
        scene.attach_lightmaps(8, 8);
        scene.attach_photonmaps(4, 4);
        assert!(scene.meshes().iter().all(|m| m.lightmap().map(|l| l.width()) == Some(8)));
        assert!(scene.meshes().iter().all(|m| m.photonmap().map(|p| p.height()) == Some(4)));
    }
}
