//! Shared test fixtures: a tiny bottom-up AABB-tree builder.
//!
//! `bvtt-core` doesn't build trees (that's an external collaborator's
//! job), so the integration tests build their own minimal one: leaves are
//! placed left-to-right at the leaf level's real slots (identity leaf
//! order), and each internal node's AABB is the union of its real
//! children.

use bvtt_core::Tree;
use bvtt_geom::Aabb;

pub fn union(a: Aabb, b: Aabb) -> Aabb {
    Aabb::new(
        bvtt_core::Vec3::new(
            a.min.x.min(b.min.x),
            a.min.y.min(b.min.y),
            a.min.z.min(b.min.z),
        ),
        bvtt_core::Vec3::new(
            a.max.x.max(b.max.x),
            a.max.y.max(b.max.y),
            a.max.z.max(b.max.z),
        ),
    )
}

/// Smallest `levels` such that `2^(levels-1) >= real_leaves`.
pub fn levels_for(real_leaves: u32) -> u32 {
    let mut levels = 1;
    while (1u64 << (levels - 1)) < u64::from(real_leaves) {
        levels += 1;
    }
    levels
}

/// Builds a `Tree` plus its internal-node AABBs (indexed by
/// `Tree::memory_index`) for `leaves` placed in identity order.
pub fn build(leaves: &[Aabb]) -> (Tree, Vec<Aabb>, Vec<u32>) {
    let real_leaves = leaves.len() as u32;
    let levels = levels_for(real_leaves);
    let tree = Tree::new(levels, real_leaves, 1);
    let order: Vec<u32> = (0..real_leaves).collect();

    let mut nodes = vec![Aabb::new(bvtt_core::Vec3::default(), bvtt_core::Vec3::default()); tree.real_internal_nodes() as usize];

    let bv_at = |nodes: &[Aabb], k: u32| -> Aabb {
        if Tree::level_of(k) == tree.levels {
            let leaf_slot = tree.memory_index(k) - tree.real_internal_nodes();
            leaves[order[leaf_slot as usize] as usize]
        } else {
            nodes[tree.memory_index(k) as usize]
        }
    };

    for level in (1..tree.levels).rev() {
        let level_start = Tree::nodes_per_level(level) as u32;
        let real_at_level = tree.real_nodes_at(level) as u32;
        for k in level_start..level_start + real_at_level {
            let left = 2 * k;
            let right = 2 * k + 1;
            let left_bv = bv_at(&nodes, left);
            let bv = if tree.is_virtual(right) {
                left_bv
            } else {
                union(left_bv, bv_at(&nodes, right))
            };
            nodes[tree.memory_index(k) as usize] = bv;
        }
    }

    (tree, nodes, order)
}
