//! Procedural demo scene

use relight_core::color::*;
use relight_core::error::*;
use relight_core::geometry::*;
use relight_core::light::*;
use relight_core::mesh::*;
use relight_core::scene::*;
use std::sync::Arc;

/// Returns the parallelogram `origin + s u + t v` facing `u × v`. Its
/// lightmap UVs cover the unit square.
///
/// * `name`     - Mesh name.
/// * `origin`   - First corner.
/// * `u`        - First edge.
/// * `v`        - Second edge.
/// * `material` - Surface material.
fn quad(name: &str, origin: Vec3, u: Vec3, v: Vec3, material: &ArcMaterial) -> Result<Mesh> {
    let n = u.cross(v).normalize_or_zero();
    let corners = [(origin, Uv::ZERO), (origin + u, Uv::X), (origin + u + v, Uv::ONE), (origin + v, Uv::Y)];
    let vertices: Vec<Vertex> = corners
        .iter()
        .map(|&(p, uv)| Vertex::new(p, n, Rgb::WHITE, uv, uv))
        .collect();

    let mut mesh = Mesh::new(name);
    mesh.add_faces(&vertices, &[0, 1, 2, 0, 2, 3], Some(Arc::clone(material)))?;
    Ok(mesh)
}

/// Returns an outward facing unit cube without a bottom. Each side maps to
/// its own cell of a 3 x 2 lightmap grid.
///
/// * `name`     - Mesh name.
/// * `material` - Surface material.
fn block(name: &str, material: &ArcMaterial) -> Result<Mesh> {
    let sides = [
        (Vec3::new(0.0, 0.0, 1.0), Vec3::X, Vec3::Y),
        (Vec3::ZERO, Vec3::Z, Vec3::Y),
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::ZERO, Vec3::X, Vec3::Z),
        (Vec3::Y, Vec3::Z, Vec3::X),
    ];

    let mut triangles = Vec::with_capacity(sides.len() * 6);
    for (i, &(origin, u, v)) in sides.iter().enumerate() {
        let n = u.cross(v);
        let cell = Uv::new((i % 3) as f32, (i / 3) as f32);
        let uv = |s: f32, t: f32| (cell + Uv::new(0.05 + 0.9 * s, 0.05 + 0.9 * t)) / Uv::new(3.0, 2.0);
        let corner = |s: f32, t: f32| Vertex::new(origin + u * s + v * t, n, Rgb::WHITE, uv(s, t), uv(s, t));
        let (a, b, c, d) = (corner(0.0, 0.0), corner(1.0, 0.0), corner(1.0, 1.0), corner(0.0, 1.0));
        triangles.extend([a.clone(), b, c.clone(), a, c, d]);
    }

    let mut mesh = Mesh::new(name);
    mesh.add_triangles(&triangles, Some(Arc::clone(material)))?;
    Ok(mesh)
}

/// Adds a Cornell box to a scene: an open fronted unit room with a red and
/// a green wall, two blocks, an area light in the ceiling and a dim point
/// light.
///
/// * `scene` - Scene between `begin` and `end` calls.
pub fn cornell_box(scene: &mut Scene) -> Result<()> {
    let white: ArcMaterial = Arc::new(Material::new("white", Rgba::new(0.73, 0.73, 0.73, 1.0)));
    let red: ArcMaterial = Arc::new(Material::new("red", Rgba::new(0.65, 0.05, 0.05, 1.0)));
    let green: ArcMaterial = Arc::new(Material::new("green", Rgba::new(0.12, 0.45, 0.15, 1.0)));

    scene.add_mesh(quad("floor", Vec3::ZERO, Vec3::X, Vec3::Y, &white)?)?;
    scene.add_mesh(quad("ceiling", Vec3::Z, Vec3::Y, Vec3::X, &white)?)?;
    scene.add_mesh(quad("back", Vec3::Y, Vec3::X, Vec3::Z, &white)?)?;
    scene.add_mesh(quad("left", Vec3::ZERO, Vec3::Y, Vec3::Z, &red)?)?;
    scene.add_mesh(quad("right", Vec3::X, Vec3::Z, Vec3::Y, &green)?)?;

    let tall = block("tall_block", &white)?;
    let short = block("short_block", &white)?;
    scene.add_instance(
        &tall,
        &(Mat4::from_translation(Vec3::new(0.2, 0.45, 0.0))
            * Mat4::from_rotation_z(0.3)
            * Mat4::from_scale(Vec3::new(0.3, 0.3, 0.6))),
    )?;
    scene.add_instance(
        &short,
        &(Mat4::from_translation(Vec3::new(0.55, 0.15, 0.0))
            * Mat4::from_rotation_z(-0.3)
            * Mat4::from_scale(Vec3::splat(0.3))),
    )?;

    let panel = quad("panel", Vec3::ZERO, Vec3::Y, Vec3::X, &white)?;
    let placement = Mat4::from_translation(Vec3::new(0.4, 0.4, 0.999)) * Mat4::from_scale(Vec3::new(0.2, 0.2, 1.0));
    scene.add_light(Light::area(
        &panel,
        &placement,
        Rgb::new(1.0, 0.9, 0.75),
        4.0,
        true,
        LightVertexGenerator::Faces { max_area: 0.002 },
    ))?;
    scene.add_light(Light::point(Vec3::new(0.5, 0.1, 0.8), Rgb::WHITE, 0.3, 2.0, true))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_has_five_sides() {
        let white: ArcMaterial = Arc::new(Material::default());
        let mesh = block("block", &white).unwrap();
        assert_eq!(mesh.face_count(), 10);
        assert_eq!(mesh.vertex_count(), 20);
        assert_eq!(mesh.bounds(), Bounds3f::new(Vec3::ZERO, Vec3::ONE));
    }

    #[test]
    fn ceiling_faces_down() {
        let white: ArcMaterial = Arc::new(Material::default());
        let ceiling = quad("ceiling", Vec3::Z, Vec3::Y, Vec3::X, &white).unwrap();
        assert!(ceiling.vertices().iter().all(|v| v.normal == -Vec3::Z));
    }
}
