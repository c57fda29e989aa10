//! BVH Common

use relight_core::geometry::*;

/// Splitting method to use to subdivide triangles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SplitMethod {
    /// Surface Area Heuristic.
    SAH,

    /// Splitting planes at the midpoint of the centroid bounds.
    Middle,

    /// Partition triangles into equally sized subsets such that the first half
    /// has the smallest centroid coordinates along the chosen axis.
    EqualCounts,
}

impl SplitMethod {
    /// Returns the split method with the given name, falling back to `SAH`.
    ///
    /// * `name` - One of `sah`, `middle` or `equal`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "sah" => Self::SAH,
            "middle" => Self::Middle,
            "equal" => Self::EqualCounts,
            sm => {
                warn!("BVH split method '{}' unknown.  Using 'sah'.", sm);
                Self::SAH
            }
        }
    }
}

/// Build parameters of a `BvhTracer`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BvhSettings {
    /// Maximum number of triangles in a leaf node.
    pub max_prims_in_node: u8,

    /// Splitting method.
    pub split_method: SplitMethod,
}

impl Default for BvhSettings {
    fn default() -> Self {
        Self {
            max_prims_in_node: 4,
            split_method: SplitMethod::SAH,
        }
    }
}

/// SAH bucket information.
#[derive(Copy, Clone, Debug)]
pub struct BucketInfo {
    /// Count of triangles.
    pub count: usize,

    /// Bounding box for the bucket.
    pub bounds: Bounds3f,
}

impl Default for BucketInfo {
    fn default() -> Self {
        Self {
            count: 0,
            bounds: Bounds3f::EMPTY,
        }
    }
}

/// Stores information about a triangle during the build.
#[derive(Copy, Clone, Debug)]
pub struct BVHPrimitiveInfo {
    /// Index of the triangle in insertion order.
    pub primitive_number: usize,

    /// The bounding box of the triangle.
    pub bounds: Bounds3f,

    /// The centroid of the bounding box.
    pub centroid: Vec3,
}

impl BVHPrimitiveInfo {
    /// Create a `BVHPrimitiveInfo`.
    ///
    /// * `primitive_number` - Index of the triangle in insertion order.
    /// * `bounds`           - The bounding box of the triangle.
    pub fn new(primitive_number: usize, bounds: Bounds3f) -> Self {
        Self {
            primitive_number,
            bounds,
            centroid: 0.5 * (bounds.p_min + bounds.p_max),
        }
    }
}

/// Node of the tree built before it is flattened.
#[derive(Debug)]
pub struct BVHBuildNode {
    /// Bounding box of all children beneath this node.
    pub bounds: Bounds3f,

    /// Children of an interior node.
    pub children: Option<[Box<BVHBuildNode>; 2]>,

    /// Axis along which triangles are partitioned between the children.
    pub split_axis: Axis,

    /// Index of the first ordered triangle stored at a leaf.
    pub first_prim_offset: usize,

    /// Number of triangles stored at a leaf.
    pub n_primitives: usize,
}

impl BVHBuildNode {
    /// Create a leaf BVH node.
    ///
    /// * `first`  - Index of the first ordered triangle.
    /// * `n`      - Number of triangles.
    /// * `bounds` - Bounding box.
    pub fn new_leaf_node(first: usize, n: usize, bounds: Bounds3f) -> Self {
        Self {
            bounds,
            children: None,
            split_axis: Axis::default(),
            first_prim_offset: first,
            n_primitives: n,
        }
    }

    /// Create an interior BVH node.
    ///
    /// * `axis` - Axis used for partitioning children.
    /// * `c0`   - First child.
    /// * `c1`   - Second child.
    pub fn new_interior_node(axis: Axis, c0: Box<BVHBuildNode>, c1: Box<BVHBuildNode>) -> Self {
        Self {
            bounds: c0.bounds.union(&c1.bounds),
            children: Some([c0, c1]),
            split_axis: axis,
            first_prim_offset: 0,
            n_primitives: 0,
        }
    }
}

/// Stores information needed to traverse the BVH.
#[derive(Copy, Clone, Debug)]
pub struct LinearBVHNode {
    /// Bounding box for the node.
    pub bounds: Bounds3f,

    /// For leaf nodes, offset for the triangles in the node. For interior
    /// nodes, offset to the second child.
    pub offset: u32,

    /// For leaf nodes, the number of triangles in the node. For interior
    /// nodes, 0.
    pub n_primitives: u16,

    /// For interior nodes, which coordinate axis was used for partitioning.
    pub axis: u8,

    /// Padding used to align everything to 32 byte total size.
    pub pad: u8,
}

impl Default for LinearBVHNode {
    fn default() -> Self {
        Self {
            bounds: Bounds3f::EMPTY,
            offset: 0,
            n_primitives: 0,
            axis: 0,
            pad: 0,
        }
    }
}

impl LinearBVHNode {
    /// Creates a leaf linear bvh node.
    ///
    /// * `bounds`       - Bounding box for the node.
    /// * `offset`       - Offset for triangles in the node.
    /// * `n_primitives` - Number of triangles in the node.
    pub fn new_leaf_node(bounds: Bounds3f, offset: u32, n_primitives: u16) -> Self {
        Self {
            bounds,
            offset,
            n_primitives,
            axis: 0,
            pad: 0,
        }
    }

    /// Creates an interior linear bvh node.
    ///
    /// * `bounds` - Bounding box for the node.
    /// * `offset` - Offset to the second child.
    /// * `axis`   - Axis used for partitioning.
    pub fn new_interior_node(bounds: Bounds3f, offset: u32, axis: u8) -> Self {
        Self {
            bounds,
            offset,
            axis,
            n_primitives: 0,
            pad: 0,
        }
    }
}
