use crate::buffers::{NodePair, NodeRay, COLLECT_FANOUT};
use crate::partition::{Partition, MIN_CHUNK};
use crate::traits::{Overlap, RayHit};
use crate::tree::Tree;
use crate::vec3::Vec3;
use crate::parallel;

/// Resolves a leaf-level implicit index to the caller's leaf id via the
/// physical leaf slot (`memory_index` offset by the internal-node count)
/// and the `order` permutation.
fn leaf_id(tree: &Tree, order: &[u32], k: u32) -> u32 {
    let leaf_slot = tree.memory_index(k) - tree.real_internal_nodes();
    order[leaf_slot as usize]
}

/// Tests one leaf-pair candidate for an actual overlap. `leaves` is indexed
/// by caller-assigned leaf id, `order` maps physical leaf slot to that id.
/// Canonicalizes the emitted pair to `(min, max)`.
fn collect_self_item<B: Overlap>(
    tree: &Tree,
    leaves: &[B],
    order: &[u32],
    item: NodePair,
) -> Option<NodePair> {
    let r1 = leaf_id(tree, order, item.u);
    let r2 = leaf_id(tree, order, item.v);
    if leaves[r1 as usize].overlap(&leaves[r2 as usize]) {
        Some(NodePair {
            u: r1.min(r2),
            v: r1.max(r2),
        })
    } else {
        None
    }
}

/// Tests one (leaf, ray) candidate for an actual hit. The emitted item
/// repurposes `NodeRay`'s fields as `(leaf_id, ray_id)` rather than
/// `(implicit_node, ray_id)`.
fn collect_ray_item<B: RayHit>(
    tree: &Tree,
    leaves: &[B],
    order: &[u32],
    origins: &[Vec3],
    directions: &[Vec3],
    item: NodeRay,
) -> Option<NodeRay> {
    let r = leaf_id(tree, order, item.node);
    if leaves[r as usize].ray_hit(origins[item.ray as usize], directions[item.ray as usize]) {
        Some(NodeRay {
            node: r,
            ray: item.ray,
        })
    } else {
        None
    }
}

pub(crate) fn collect_self<B: Overlap + Sync>(
    tree: &Tree,
    leaves: &[B],
    order: &[u32],
    src: &[NodePair],
    dst: &mut [NodePair],
    parallelism_hint: usize,
) -> usize {
    let partition = Partition::plan(src.len(), parallelism_hint, MIN_CHUNK);
    parallel::run(src, dst, &partition, COLLECT_FANOUT, |items, region| {
        let mut w = 0;
        for &item in items {
            if let Some(contact) = collect_self_item(tree, leaves, order, item) {
                region[w] = contact;
                w += 1;
            }
        }
        w
    })
}

pub(crate) fn collect_rays<B: RayHit + Sync>(
    tree: &Tree,
    leaves: &[B],
    order: &[u32],
    origins: &[Vec3],
    directions: &[Vec3],
    src: &[NodeRay],
    dst: &mut [NodeRay],
    parallelism_hint: usize,
) -> usize {
    let partition = Partition::plan(src.len(), parallelism_hint, MIN_CHUNK);
    parallel::run(src, dst, &partition, COLLECT_FANOUT, |items, region| {
        let mut w = 0;
        for &item in items {
            if let Some(hit) = collect_ray_item(tree, leaves, order, origins, directions, item) {
                region[w] = hit;
                w += 1;
            }
        }
        w
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TaggedOverlap(bool);
    impl Overlap for TaggedOverlap {
        fn overlap(&self, other: &Self) -> bool {
            self.0 && other.0
        }
    }

    #[test]
    fn collect_self_item_canonicalizes_and_maps_through_order() {
        let tree = Tree::new(3, 3, 1);
        // order: physical leaf slot 0,1,2 -> caller leaf ids 2,0,1.
        let order = vec![2u32, 0, 1];
        let leaves = vec![TaggedOverlap(true), TaggedOverlap(true), TaggedOverlap(true)];
        // implicit leaves at level 3 of a 3-real-leaf, 4-slot tree: 4,5,6.
        let item = NodePair { u: 4, v: 6 };
        let contact = collect_self_item(&tree, &leaves, &order, item).unwrap();
        // leaf_slot(4)=0 -> id 2; leaf_slot(6)=2 -> id 1; canonicalized (1,2).
        assert_eq!(contact, NodePair { u: 1, v: 2 });
    }

    #[test]
    fn collect_self_item_returns_none_on_no_overlap() {
        let tree = Tree::new(3, 3, 1);
        let order = vec![0u32, 1, 2];
        let leaves = vec![TaggedOverlap(true), TaggedOverlap(false), TaggedOverlap(true)];
        let item = NodePair { u: 4, v: 5 };
        assert!(collect_self_item(&tree, &leaves, &order, item).is_none());
    }
}
