//! Scenes shared by the baker tests.

use relight_accelerators::*;
use relight_core::color::*;
use relight_core::geometry::*;
use relight_core::light::*;
use relight_core::mesh::*;
use relight_core::scene::*;
use std::sync::Arc;

/// Returns the parallelogram `origin + s u + t v` facing `u × v`, with its
/// lightmap UVs spanning the unit square.
pub fn quad(name: &str, origin: Vec3, u: Vec3, v: Vec3, color: Rgb) -> Mesh {
    let n = u.cross(v).normalize();
    let vertex = |p: Vec3, uv: Uv| Vertex::new(p, n, color, uv, uv);
    let vertices = [
        vertex(origin, Uv::new(0.0, 0.0)),
        vertex(origin + u, Uv::new(1.0, 0.0)),
        vertex(origin + u + v, Uv::new(1.0, 1.0)),
        vertex(origin + v, Uv::new(0.0, 1.0)),
    ];
    let mut mesh = Mesh::new(name);
    mesh.add_faces(&vertices, &[0, 1, 2, 0, 2, 3], None).unwrap();
    mesh
}

/// Returns the triangle `(0,0,0) (1,0,0) (0,1,0)` facing +Z.
pub fn triangle() -> Mesh {
    let vertex = |x: f32, y: f32| Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z, Rgb::WHITE, Uv::new(x, y), Uv::new(x, y));
    let mut mesh = Mesh::new("triangle");
    mesh.add_faces(&[vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(0.0, 1.0)], &[0, 1, 2], None)
        .unwrap();
    mesh
}

/// Returns the 6 inward facing sides of the unit cube. The floor comes
/// first.
pub fn closed_box(color: Rgb) -> Vec<Mesh> {
    vec![
        quad("floor", Vec3::ZERO, Vec3::X, Vec3::Y, color),
        quad("ceiling", Vec3::Z, Vec3::Y, Vec3::X, color),
        quad("left", Vec3::ZERO, Vec3::Y, Vec3::Z, color),
        quad("right", Vec3::X, Vec3::Z, Vec3::Y, color),
        quad("front", Vec3::ZERO, Vec3::Z, Vec3::X, color),
        quad("back", Vec3::Y, Vec3::X, Vec3::Z, color),
    ]
}

/// Returns a scene that is ready to bake with a lightmap attached to every
/// mesh.
///
/// * `meshes` - Meshes in world space.
/// * `lights` - Lights.
/// * `size`   - Lightmap width and height.
pub fn ready_scene(meshes: Vec<Mesh>, lights: Vec<Light>, size: usize) -> Scene {
    let mut scene = Scene::new(Box::new(BvhTracer::new(BvhSettings::default())));
    scene.begin().unwrap();
    for mesh in meshes {
        scene.add_mesh(mesh).unwrap();
    }
    for light in lights {
        scene.add_light(light).unwrap();
    }
    scene.end().unwrap();
    scene.attach_lightmaps(size, size);
    scene
}

/// Same as `ready_scene` with a photon map of the same size attached too.
pub fn ready_photon_scene(meshes: Vec<Mesh>, lights: Vec<Light>, size: usize) -> Arc<Scene> {
    let mut scene = ready_scene(meshes, lights, size);
    scene.attach_photonmaps(size, size);
    Arc::new(scene)
}
