//! Bounding Volume Hierarchy.

mod common;
mod sah;
mod triangle;

pub use common::*;
pub use triangle::*;

use relight_core::common::*;
use relight_core::geometry::*;
use relight_core::mesh::*;
use relight_core::tracer::*;

/// Bounding Volume Hierarchy ray tracer.
#[derive(Clone, Debug, Default)]
pub struct BvhTracer {
    /// Build parameters.
    pub settings: BvhSettings,

    /// Triangles in leaf order once built.
    triangles: Vec<Triangle>,

    /// The list of nodes.
    nodes: Vec<LinearBVHNode>,
}

impl BvhTracer {
    /// Create a new empty `BvhTracer`.
    ///
    /// * `settings` - Build parameters.
    pub fn new(settings: BvhSettings) -> Self {
        Self {
            settings,
            triangles: vec![],
            nodes: vec![],
        }
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns the number of nodes once built.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the bounding box of the built tree.
    pub fn world_bound(&self) -> Bounds3f {
        self.nodes.first().map_or(Bounds3f::EMPTY, |n| n.bounds)
    }

    /// Flatten the tree to the linear representation.
    ///
    /// * `node`   - The node.
    /// * `nodes`  - Flattened nodes.
    /// * `offset` - Tracks current offset into `nodes`.
    fn flatten_bvh_tree(node: &BVHBuildNode, nodes: &mut [LinearBVHNode], offset: &mut u32) -> u32 {
        let my_offset = *offset;
        *offset += 1;

        match node.children.as_ref() {
            None => {
                nodes[my_offset as usize] =
                    LinearBVHNode::new_leaf_node(node.bounds, node.first_prim_offset as u32, node.n_primitives as u16);
            }
            Some([c0, c1]) => {
                // First child follows its parent.
                Self::flatten_bvh_tree(c0, nodes, offset);
                let second_child_offset = Self::flatten_bvh_tree(c1, nodes, offset);
                nodes[my_offset as usize] =
                    LinearBVHNode::new_interior_node(node.bounds, second_child_offset, node.split_axis.into());
            }
        }

        my_offset
    }

    /// Walks the tree along the segment `o + t d`, `t` in `(0, 1]`, calling
    /// `f(triangle, t, bary)` for every triangle hit closer than the current
    /// bound. `f` returns the new bound, or `None` to stop.
    ///
    /// * `o` - Segment start.
    /// * `d` - Segment end minus start.
    /// * `f` - Hit visitor.
    fn traverse<'s, F>(&'s self, o: Vec3, d: Vec3, mut f: F)
    where
        F: FnMut(&'s Triangle, Float, Vec2) -> Option<Float>,
    {
        if self.nodes.is_empty() || d == Vec3::ZERO {
            return;
        }

        let inv_dir = Vec3::ONE / d;
        let dir_is_neg = [(inv_dir.x < 0.0) as u8, (inv_dir.y < 0.0) as u8, (inv_dir.z < 0.0) as u8];
        let mut t_max: Float = 1.0;

        // Follow ray through BVH nodes to find triangle intersections.
        let (mut to_visit_offset, mut current_node_index) = (0, 0);
        let mut nodes_to_visit = [0_usize; 64];

        loop {
            let node = &self.nodes[current_node_index];
            if node.bounds.intersect_p_inv(o, inv_dir, dir_is_neg, t_max) {
                if node.n_primitives > 0 {
                    // Intersect ray with triangles in leaf BVH node.
                    for i in 0..node.n_primitives as usize {
                        let triangle = &self.triangles[node.offset as usize + i];
                        if let Some((t, bary)) = triangle.intersect(o, d, t_max) {
                            match f(triangle, t, bary) {
                                Some(bound) => t_max = bound,
                                None => return,
                            }
                        }
                    }
                    if to_visit_offset == 0 {
                        break;
                    }
                    to_visit_offset -= 1;
                    current_node_index = nodes_to_visit[to_visit_offset];
                } else if dir_is_neg[node.axis as usize] == 1 {
                    // Put far BVH node on nodes_to_visit stack, advance to near node.
                    nodes_to_visit[to_visit_offset] = current_node_index + 1;
                    to_visit_offset += 1;
                    current_node_index = node.offset as usize;
                } else {
                    nodes_to_visit[to_visit_offset] = node.offset as usize;
                    to_visit_offset += 1;
                    current_node_index += 1;
                }
            } else {
                if to_visit_offset == 0 {
                    break;
                }
                to_visit_offset -= 1;
                current_node_index = nodes_to_visit[to_visit_offset];
            }
        }
    }
}

impl RayTracer for BvhTracer {
    fn begin(&mut self) {
        self.triangles.clear();
        self.nodes.clear();
    }

    fn add_mesh(&mut self, mesh: &Mesh, index: usize) {
        self.triangles.extend(mesh.faces().map(|face| Triangle::new(&face, index)));
    }

    fn end(&mut self) {
        let n_primitives = self.triangles.len();
        if n_primitives == 0 {
            warn!("BVH built without triangles");
            return;
        }

        let mut primitive_info: Vec<BVHPrimitiveInfo> = self
            .triangles
            .iter()
            .enumerate()
            .map(|(i, t)| BVHPrimitiveInfo::new(i, t.bounds()))
            .collect();

        let mut total_nodes = 0;
        let mut ordered_prims = Vec::with_capacity(n_primitives);
        let root = sah::build(
            self.settings.split_method,
            self.settings.max_prims_in_node.max(1),
            &mut primitive_info,
            0,
            n_primitives,
            &mut total_nodes,
            &mut ordered_prims,
        );

        // Compute representation of depth-first traversal of BVH tree.
        let mut nodes = vec![LinearBVHNode::default(); total_nodes];
        let mut offset = 0_u32;
        Self::flatten_bvh_tree(&root, &mut nodes, &mut offset);
        debug_assert!(total_nodes == offset as usize);

        let mut slots: Vec<Option<Triangle>> = std::mem::take(&mut self.triangles).into_iter().map(Some).collect();
        self.triangles = ordered_prims.iter().filter_map(|&i| slots[i].take()).collect();
        self.nodes = nodes;

        info!(
            "BVH ({:?}) created with {} nodes for {} triangles ({:.2} MB)",
            self.settings.split_method,
            total_nodes,
            n_primitives,
            (total_nodes * std::mem::size_of::<LinearBVHNode>() + n_primitives * std::mem::size_of::<Triangle>()) as f32
                / (1024.0 * 1024.0)
        );
    }

    fn trace_segment(&self, start: Vec3, end: Vec3, flags: HitFlags) -> Option<Hit> {
        let d = end - start;
        let mut closest: Option<(&Triangle, Float, Vec2)> = None;
        self.traverse(start, d, |triangle, t, bary| {
            if flags.contains(HitFlags::USE_ALPHA) && triangle.is_cut_out() {
                return closest.map_or(Some(1.0), |(_, t, _)| Some(t));
            }
            closest = Some((triangle, t, bary));
            Some(t)
        });
        closest.map(|(triangle, t, bary)| triangle.hit(start + t * d, t, bary, flags))
    }

    fn test(&self, start: Vec3, end: Vec3) -> bool {
        let mut blocked = false;
        self.traverse(start, end - start, |_, _, _| {
            blocked = true;
            None
        });
        blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;
    use relight_core::color::*;
    use std::sync::Arc;

    fn quad(z: f32, size: f32) -> Mesh {
        let v = |x: f32, y: f32| {
            Vertex::new(Vec3::new(x * size, y * size, z), Vec3::Z, Rgb::WHITE, Uv::new(x, y), Uv::ZERO)
        };
        let mut mesh = Mesh::new("quad");
        mesh.add_faces(&[v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)], &[0, 1, 2, 0, 2, 3], None)
            .unwrap();
        mesh
    }

    fn build(meshes: &[Mesh], settings: BvhSettings) -> BvhTracer {
        let mut tracer = BvhTracer::new(settings);
        tracer.begin();
        meshes.iter().enumerate().for_each(|(i, m)| tracer.add_mesh(m, i));
        tracer.end();
        tracer
    }

    #[test]
    fn empty_tracer_misses() {
        let tracer = build(&[], BvhSettings::default());
        assert!(tracer.trace_segment(Vec3::ZERO, Vec3::ONE, HitFlags::ALL).is_none());
        assert!(!tracer.test(Vec3::ZERO, Vec3::ONE));
        assert_eq!(tracer.world_bound(), Bounds3f::EMPTY);
    }

    #[test]
    fn closest_hit_on_segment() {
        let tracer = build(&[quad(0.0, 1.0), quad(1.0, 1.0)], BvhSettings::default());
        let hit = tracer
            .trace_segment(Vec3::new(0.25, 0.5, 2.0), Vec3::new(0.25, 0.5, -1.0), HitFlags::ALL)
            .unwrap();
        assert_eq!(hit.mesh, 1);
        assert!(approx_eq!(f32, hit.t, 1.0 / 3.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, hit.point.z, 1.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, hit.uv.x, 0.25, epsilon = 1e-5));
        assert!(approx_eq!(f32, hit.uv.y, 0.5, epsilon = 1e-5));
        assert_eq!(hit.normal, Vec3::Z);
        assert_eq!(hit.color, Rgb::WHITE);

        // Segment ends before the lower quad.
        let hit = tracer.trace_segment(Vec3::new(0.25, 0.5, 0.5), Vec3::new(0.25, 0.5, 0.1), HitFlags::empty());
        assert!(hit.is_none());
        assert!(tracer.test(Vec3::new(0.25, 0.5, 0.5), Vec3::new(0.25, 0.5, -0.5)));
        assert!(!tracer.test(Vec3::new(2.0, 0.5, 0.5), Vec3::new(2.0, 0.5, -0.5)));
    }

    #[test]
    fn use_alpha_skips_cut_out_triangles() {
        let material = Arc::new(Material::new("leaves", Rgba::new(1.0, 1.0, 1.0, 0.0)));
        let mut top = quad(1.0, 1.0);
        let vertices = top.vertices().to_vec();
        let indices = top.indices().to_vec();
        top = Mesh::new("cut");
        top.add_faces(&vertices, &indices, Some(material)).unwrap();

        let tracer = build(&[quad(0.0, 1.0), top], BvhSettings::default());
        let (start, end) = (Vec3::new(0.5, 0.25, 2.0), Vec3::new(0.5, 0.25, -1.0));
        assert_eq!(tracer.trace_segment(start, end, HitFlags::empty()).map(|h| h.mesh), Some(1));
        let hit = tracer.trace_segment(start, end, HitFlags::USE_ALPHA).unwrap();
        assert_eq!(hit.mesh, 0);
        assert!(approx_eq!(f32, hit.point.z, 0.0, epsilon = 1e-5));
    }

    #[test]
    fn trace_segment4_matches_single() {
        let tracer = build(&[quad(0.0, 2.0)], BvhSettings::default());
        let segments = [
            (Vec3::new(0.5, 0.5, 1.0), Vec3::new(0.5, 0.5, -1.0)),
            (Vec3::new(3.0, 0.5, 1.0), Vec3::new(3.0, 0.5, -1.0)),
            (Vec3::new(1.5, 1.0, 1.0), Vec3::new(1.5, 1.0, -1.0)),
            (Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 0.5)),
        ];
        let hits = tracer.trace_segment4(&segments, HitFlags::empty());
        for (hit, (start, end)) in hits.iter().zip(segments.iter()) {
            assert_eq!(hit.map(|h| h.face), tracer.trace_segment(*start, *end, HitFlags::empty()).map(|h| h.face));
        }
        assert!(hits[0].is_some());
        assert!(hits[1].is_none());
        assert!(hits[3].is_none());
    }

    proptest! {
        #[test]
        fn matches_brute_force(
            offsets in prop::collection::vec((-4.0f32..4.0, -4.0f32..4.0, -4.0f32..4.0), 1..24),
            start in (-6.0f32..6.0, -6.0f32..6.0, -6.0f32..6.0),
            end in (-6.0f32..6.0, -6.0f32..6.0, -6.0f32..6.0),
            method in prop::sample::select(vec![SplitMethod::SAH, SplitMethod::Middle, SplitMethod::EqualCounts]),
        ) {
            let meshes: Vec<Mesh> = offsets
                .iter()
                .map(|&(x, y, z)| quad(0.0, 1.0).transformed(&Mat4::from_translation(Vec3::new(x, y, z))))
                .collect();
            let tracer = build(&meshes, BvhSettings { max_prims_in_node: 2, split_method: method });
            let (start, end) = (Vec3::new(start.0, start.1, start.2), Vec3::new(end.0, end.1, end.2));

            let brute = meshes
                .iter()
                .enumerate()
                .flat_map(|(i, m)| m.faces().map(move |f| Triangle::new(&f, i)).collect::<Vec<_>>())
                .filter_map(|tri| tri.intersect(start, end - start, 1.0))
                .map(|(t, _)| t)
                .fold(None, |best: Option<f32>, t| Some(best.map_or(t, |b| b.min(t))));

            let hit = tracer.trace_segment(start, end, HitFlags::empty()).map(|h| h.t);
            prop_assert_eq!(hit, brute);
            prop_assert_eq!(tracer.test(start, end), brute.is_some());
        }
    }
}
