use crate::buffers::{NodePair, NodeRay, RAY_EXPAND_FANOUT, SELF_EXPAND_FANOUT};
use crate::partition::{Partition, MIN_CHUNK};
use crate::traits::{Overlap, RayHit};
use crate::tree::Tree;
use crate::vec3::Vec3;
use crate::parallel;

/// Expands one self-traversal work item into its children, writing up to
/// [`SELF_EXPAND_FANOUT`] items at the front of `out`. Returns the count
/// written.
fn expand_self_item<B: Overlap>(
    tree: &Tree,
    nodes: &[B],
    self_checks: bool,
    item: NodePair,
    out: &mut [NodePair],
) -> usize {
    let NodePair { u, v } = item;

    if u == v {
        let right = 2 * u + 1;
        if tree.is_virtual(right) {
            if self_checks {
                out[0] = NodePair { u: 2 * u, v: 2 * u };
                1
            } else {
                0
            }
        } else if self_checks {
            out[0] = NodePair { u: 2 * u, v: 2 * u };
            out[1] = NodePair {
                u: 2 * u + 1,
                v: 2 * u + 1,
            };
            out[2] = NodePair {
                u: 2 * u,
                v: 2 * u + 1,
            };
            3
        } else {
            out[0] = NodePair {
                u: 2 * u,
                v: 2 * u + 1,
            };
            1
        }
    } else {
        let bv_u = &nodes[tree.memory_index(u) as usize];
        let bv_v = &nodes[tree.memory_index(v) as usize];
        if !bv_u.overlap(bv_v) {
            return 0;
        }

        let right_v = 2 * v + 1;
        if tree.is_virtual(right_v) {
            out[0] = NodePair { u: 2 * u, v: 2 * v };
            out[1] = NodePair {
                u: 2 * u + 1,
                v: 2 * v,
            };
            2
        } else {
            out[0] = NodePair { u: 2 * u, v: 2 * v };
            out[1] = NodePair {
                u: 2 * u,
                v: 2 * v + 1,
            };
            out[2] = NodePair {
                u: 2 * u + 1,
                v: 2 * v,
            };
            out[3] = NodePair {
                u: 2 * u + 1,
                v: 2 * v + 1,
            };
            4
        }
    }
}

/// Expands one level of the self-traversal BVTT in parallel, returning the
/// compacted output count (the new `n`).
pub(crate) fn expand_self<B: Overlap + Sync>(
    tree: &Tree,
    nodes: &[B],
    src: &[NodePair],
    dst: &mut [NodePair],
    self_checks: bool,
    parallelism_hint: usize,
) -> usize {
    let partition = Partition::plan(src.len(), parallelism_hint, MIN_CHUNK);
    parallel::run(src, dst, &partition, SELF_EXPAND_FANOUT, |items, region| {
        let mut w = 0;
        for &item in items {
            w += expand_self_item(tree, nodes, self_checks, item, &mut region[w..]);
        }
        w
    })
}

/// Expands one ray-traversal work item into its children, writing up to
/// [`RAY_EXPAND_FANOUT`] items at the front of `out`. Returns the count
/// written. `node` is always internal here: the driver only calls the
/// expander for levels `< tree.levels`.
fn expand_ray_item<B: RayHit>(
    tree: &Tree,
    nodes: &[B],
    origins: &[Vec3],
    directions: &[Vec3],
    item: NodeRay,
    out: &mut [NodeRay],
) -> usize {
    let NodeRay { node, ray } = item;
    debug_assert!(Tree::level_of(node) < tree.levels, "expand_ray_item called on a leaf");

    let bv = &nodes[tree.memory_index(node) as usize];
    if !bv.ray_hit(origins[ray as usize], directions[ray as usize]) {
        return 0;
    }

    let left = 2 * node;
    let right = 2 * node + 1;
    if tree.is_virtual(right) {
        out[0] = NodeRay { node: left, ray };
        1
    } else {
        out[0] = NodeRay { node: left, ray };
        out[1] = NodeRay { node: right, ray };
        2
    }
}

pub(crate) fn expand_rays<B: RayHit + Sync>(
    tree: &Tree,
    nodes: &[B],
    origins: &[Vec3],
    directions: &[Vec3],
    src: &[NodeRay],
    dst: &mut [NodeRay],
    parallelism_hint: usize,
) -> usize {
    let partition = Partition::plan(src.len(), parallelism_hint, MIN_CHUNK);
    parallel::run(src, dst, &partition, RAY_EXPAND_FANOUT, |items, region| {
        let mut w = 0;
        for &item in items {
            w += expand_ray_item(tree, nodes, origins, directions, item, &mut region[w..]);
        }
        w
    })
}
