//! Surface Area Heuristic Algorithm

use super::common::*;
use order_stat::kth_by;
use relight_core::common::*;
use relight_core::geometry::*;
use std::cmp::Ordering;

const N_BUCKETS: usize = 12;

/// Recursively build the BVH structure for either Middle, EqualCounts or SAH
/// algorithm.
///
/// * `split_method`      - Middle|EqualCounts|SAH
/// * `max_prims_in_node` - Maximum number of triangles in a leaf.
/// * `primitive_info`    - Triangle information.
/// * `start`             - Starting index. For first call it should be 0.
/// * `end`               - Ending index + 1. For first call it should be number
///                         of triangles.
/// * `total_nodes`       - Used to return total number of nodes.
/// * `ordered_prims`     - Used to return triangle indices ordered such that
///                         the triangles of a leaf occupy a contiguous range.
pub fn build(
    split_method: SplitMethod,
    max_prims_in_node: u8,
    primitive_info: &mut [BVHPrimitiveInfo],
    start: usize,
    end: usize,
    total_nodes: &mut usize,
    ordered_prims: &mut Vec<usize>,
) -> Box<BVHBuildNode> {
    // Compute bounds of all triangles in BVH node.
    let bounds = primitive_info[start..end]
        .iter()
        .fold(Bounds3f::EMPTY, |b, info| b.union(&info.bounds));

    let mut dim = Axis::default();
    let n_primitives = end - start;

    let interior_midpoint = if n_primitives == 1 {
        None
    } else {
        // Compute bound of centroids, choose split dimension dim.
        let centroid_bounds = primitive_info[start..end]
            .iter()
            .fold(Bounds3f::EMPTY, |b, info| b.union_point(info.centroid));
        dim = centroid_bounds.maximum_extent();
        let d = usize::from(dim);

        if centroid_bounds.p_max[d] == centroid_bounds.p_min[d] {
            None
        } else {
            match split_method {
                SplitMethod::Middle => Some(split_middle(primitive_info, start, end, d, &centroid_bounds)),
                SplitMethod::EqualCounts => Some(split_equal_counts(primitive_info, start, end, d)),
                SplitMethod::SAH => split_sah(primitive_info, start, end, d, &centroid_bounds, &bounds, max_prims_in_node),
            }
        }
    };

    *total_nodes += 1;
    match interior_midpoint {
        Some(mid) => {
            let c0 = build(split_method, max_prims_in_node, primitive_info, start, mid, total_nodes, ordered_prims);
            let c1 = build(split_method, max_prims_in_node, primitive_info, mid, end, total_nodes, ordered_prims);
            Box::new(BVHBuildNode::new_interior_node(dim, c0, c1))
        }
        None => {
            let first_prim_offset = ordered_prims.len();
            ordered_prims.extend(primitive_info[start..end].iter().map(|info| info.primitive_number));
            Box::new(BVHBuildNode::new_leaf_node(first_prim_offset, n_primitives, bounds))
        }
    }
}

/// Split at the midpoint of the centroid bounds.
///
/// * `primitive_info`  - Triangle information.
/// * `start`           - Starting index in primitive_info.
/// * `end`             - Ending index + 1 in primitive_info.
/// * `dim`             - Axis used to partition triangles.
/// * `centroid_bounds` - Bounding box of centroids from start to end.
fn split_middle(
    primitive_info: &mut [BVHPrimitiveInfo],
    start: usize,
    end: usize,
    dim: usize,
    centroid_bounds: &Bounds3f,
) -> usize {
    let pmid = (centroid_bounds.p_min[dim] + centroid_bounds.p_max[dim]) / 2.0;
    let infos = primitive_info[start..end].iter_mut();
    let split = itertools::partition(infos, |pi| pi.centroid[dim] < pmid);
    let mid = start + split;

    if mid != start && mid != end {
        mid
    } else {
        // Large overlapping boxes can defeat the midpoint.
        split_equal_counts(primitive_info, start, end, dim)
    }
}

/// Split into equally sized subsets ordered by centroid along `dim`.
///
/// * `primitive_info` - Triangle information.
/// * `start`          - Starting index in primitive_info.
/// * `end`            - Ending index + 1 in primitive_info.
/// * `dim`            - Axis used to partition triangles.
fn split_equal_counts(primitive_info: &mut [BVHPrimitiveInfo], start: usize, end: usize, dim: usize) -> usize {
    let mid = (start + end) / 2;
    kth_by(&mut primitive_info[start..end], mid - start, |a, b| {
        a.centroid[dim].partial_cmp(&b.centroid[dim]).unwrap_or(Ordering::Equal)
    });
    mid
}

/// Returns the SAH bucket of a centroid.
fn bucket(centroid_bounds: &Bounds3f, centroid: Vec3, dim: usize) -> usize {
    let b = (N_BUCKETS as Float * centroid_bounds.offset(centroid)[dim]) as usize;
    b.min(N_BUCKETS - 1)
}

/// Partition triangles using Surface Area Heuristic.
///
/// Returns the pivot index for an interior node, or `None` when a leaf is
/// cheaper.
///
/// * `primitive_info`    - Triangle information.
/// * `start`             - Start index in primitive_info.
/// * `end`               - End index in primitive_info.
/// * `dim`               - Axis used to partition triangles.
/// * `centroid_bounds`   - Bounding box of centroids from start to end.
/// * `bounds`            - Bound box of all triangles in the node.
/// * `max_prims_in_node` - Maximum triangles allowed in a leaf.
fn split_sah(
    primitive_info: &mut [BVHPrimitiveInfo],
    start: usize,
    end: usize,
    dim: usize,
    centroid_bounds: &Bounds3f,
    bounds: &Bounds3f,
    max_prims_in_node: u8,
) -> Option<usize> {
    let n_primitives = end - start;
    if n_primitives <= 2 {
        return Some(split_equal_counts(primitive_info, start, end, dim));
    }

    let mut buckets = [BucketInfo::default(); N_BUCKETS];
    for info in primitive_info[start..end].iter() {
        let b = bucket(centroid_bounds, info.centroid, dim);
        buckets[b].count += 1;
        buckets[b].bounds = buckets[b].bounds.union(&info.bounds);
    }

    // Compute costs for splitting after each bucket.
    let mut cost = [0.0 as Float; N_BUCKETS - 1];
    for (i, cost_i) in cost.iter_mut().enumerate() {
        let (mut b0, mut b1) = (Bounds3f::EMPTY, Bounds3f::EMPTY);
        let (mut count0, mut count1) = (0, 0);

        for bucket in buckets.iter().take(i + 1) {
            b0 = b0.union(&bucket.bounds);
            count0 += bucket.count;
        }
        for bucket in buckets.iter().skip(i + 1) {
            b1 = b1.union(&bucket.bounds);
            count1 += bucket.count;
        }

        let area = |b: &Bounds3f, count: usize| if count == 0 { 0.0 } else { count as Float * b.surface_area() };
        *cost_i = 1.0 + (area(&b0, count0) + area(&b1, count1)) / bounds.surface_area().max(EPSILON);
    }

    // Find bucket to split at that minimizes SAH metric.
    let (min_cost_split_bucket, min_cost) = cost
        .iter()
        .enumerate()
        .fold((0, cost[0]), |best, (i, &c)| if c < best.1 { (i, c) } else { best });

    let leaf_cost = n_primitives as Float;
    if n_primitives > max_prims_in_node as usize || min_cost < leaf_cost {
        let infos = primitive_info[start..end].iter_mut();
        let split = itertools::partition(infos, |pi| bucket(centroid_bounds, pi.centroid, dim) <= min_cost_split_bucket);
        let mid = start + split;
        if mid == start || mid == end {
            Some(split_equal_counts(primitive_info, start, end, dim))
        } else {
            Some(mid)
        }
    } else {
        None
    }
}
