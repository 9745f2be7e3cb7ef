//! Level-synchronous, double-buffered breadth-first traversal of a
//! bounding-volume traversal tree (BVTT), built on a pre-existing implicit
//! BVH.
//!
//! This crate implements exactly the traversal engine: given a [`Tree`]
//! describing an already-built implicit binary BVH (construction is the
//! caller's concern), it finds every overlapping leaf pair ([`traverse`])
//! or every leaf/ray hit ([`traverse_rays`]) by expanding level-synchronous
//! work queues of node-pair or node-ray candidates, pruning subtrees whose
//! bounding volumes don't overlap (or aren't hit), until only leaf-level
//! candidates remain.
//!
//! Callers supply bounding volumes through the [`Overlap`] / [`RayHit`]
//! traits so the hot expansion loops stay monomorphized rather than going
//! through dynamic dispatch.

mod buffers;
mod collect;
mod error;
mod expand;
mod options;
mod parallel;
mod partition;
mod traits;
mod tree;
mod vec3;

pub use buffers::{BvttCache, NodePair, NodeRay};
pub use error::BvttError;
pub use options::TraversalOptions;
pub use traits::{Overlap, RayHit};
pub use tree::Tree;
pub use vec3::Vec3;

use buffers::{COLLECT_FANOUT, RAY_EXPAND_FANOUT, SELF_EXPAND_FANOUT};

/// The outcome of a `traverse` / `traverse_rays` call.
///
/// `contacts()` borrows the dense contact prefix of the primary buffer;
/// `into_cache` hands both buffers back to the caller for reuse in a
/// subsequent call against the same or a smaller tree.
#[derive(Debug)]
pub struct TraversalResult<T> {
    /// The level the traversal was actually seeded at.
    pub start_level: u32,
    /// Total candidate items processed across all levels (self-checks,
    /// node pairs, and ray candidates combined), for profiling.
    pub num_checks: u64,
    /// Number of items in the contact prefix.
    pub num_contacts: usize,
    cache1: Vec<T>,
    cache2: Vec<T>,
}

impl<T> TraversalResult<T> {
    /// The dense run of contacts this call produced.
    ///
    /// For `traverse`, each item's `(u, v)` fields are a canonicalized
    /// `(min, max)` pair of caller leaf ids. For `traverse_rays`, `(node,
    /// ray)` is `(leaf id, ray id)`.
    pub fn contacts(&self) -> &[T] {
        &self.cache1[..self.num_contacts]
    }

    /// Recovers the scratch buffers backing this result, for reuse in a
    /// later call.
    pub fn into_cache(self) -> BvttCache<T> {
        BvttCache::from_parts(self.cache1, self.cache2)
    }
}

/// Default self-traversal seed level: `max(levels / 2, built_level)`.
pub fn default_self_start_level(tree: &Tree) -> u32 {
    (tree.levels / 2).max(tree.built_level).max(1)
}

/// Default ray-traversal seed level: the root.
pub fn default_ray_start_level(_tree: &Tree) -> u32 {
    1
}

fn validate_start_level(tree: &Tree, start_level: u32) -> Result<(), BvttError> {
    if start_level < tree.built_level || start_level > tree.levels {
        return Err(BvttError::StartLevelOutOfRange {
            start_level,
            built_level: tree.built_level,
            levels: tree.levels,
        });
    }
    Ok(())
}

/// Finds every overlapping leaf pair `(i, j)` with `i < j` in `tree`.
///
/// `nodes` holds internal-node bounding volumes indexed by
/// [`Tree::memory_index`]; `leaves` holds leaf bounding volumes indexed by
/// caller-assigned leaf id; `order` maps physical leaf slot to caller leaf
/// id (see [`Tree::memory_index`] / [`Tree::real_internal_nodes`]).
pub fn traverse<B: Overlap + Sync>(
    tree: &Tree,
    nodes: &[B],
    leaves: &[B],
    order: &[u32],
    options: TraversalOptions,
    cache: Option<BvttCache<NodePair>>,
) -> Result<TraversalResult<NodePair>, BvttError> {
    let start_level = options
        .start_level
        .unwrap_or_else(|| default_self_start_level(tree));
    validate_start_level(tree, start_level)?;

    let span = tracing::debug_span!(
        "bvtt_core::traverse",
        start_level,
        real_nodes = tree.real_nodes
    );
    let _enter = span.enter();

    let mut cache = cache.unwrap_or_default();

    if tree.real_nodes <= 1 {
        cache.a.clear();
        cache.b.clear();
        return Ok(TraversalResult {
            start_level,
            num_checks: 0,
            num_contacts: 0,
            cache1: cache.b,
            cache2: cache.a,
        });
    }

    let mut n = cache.seed_self(tree, start_level);
    let mut num_checks = n as u64;
    let mut level = start_level;

    while level < tree.levels {
        let self_checks = level < tree.levels - 1;
        let needed = SELF_EXPAND_FANOUT * n;
        BvttCache::<NodePair>::ensure_len(&mut cache.b, needed);

        tracing::trace!(level, n, "expanding self-traversal level");
        n = expand::expand_self(
            tree,
            nodes,
            &cache.a[..n],
            &mut cache.b[..needed],
            self_checks,
            options.parallelism_hint,
        );
        num_checks += n as u64;
        cache.swap();
        level += 1;
    }

    let needed = COLLECT_FANOUT * n.max(1);
    BvttCache::<NodePair>::ensure_len(&mut cache.b, needed);
    tracing::trace!(level, n, "collecting leaf contacts");
    let num_contacts = collect::collect_self(
        tree,
        leaves,
        order,
        &cache.a[..n],
        &mut cache.b[..needed],
        options.parallelism_hint,
    );

    Ok(TraversalResult {
        start_level,
        num_checks,
        num_contacts,
        cache1: cache.b,
        cache2: cache.a,
    })
}

/// Finds every `(leaf, ray)` hit pair between `tree`'s leaves and the rays
/// described by parallel `origins` / `directions` arrays.
pub fn traverse_rays<B: RayHit + Sync>(
    tree: &Tree,
    nodes: &[B],
    leaves: &[B],
    order: &[u32],
    origins: &[Vec3],
    directions: &[Vec3],
    options: TraversalOptions,
    cache: Option<BvttCache<NodeRay>>,
) -> Result<TraversalResult<NodeRay>, BvttError> {
    if origins.len() != directions.len() {
        return Err(BvttError::RayArityMismatch {
            origins: origins.len(),
            directions: directions.len(),
        });
    }

    let start_level = options
        .start_level
        .unwrap_or_else(|| default_ray_start_level(tree));
    validate_start_level(tree, start_level)?;

    let span = tracing::debug_span!(
        "bvtt_core::traverse_rays",
        start_level,
        num_rays = origins.len()
    );
    let _enter = span.enter();

    let mut cache = cache.unwrap_or_default();
    let num_rays = origins.len();

    if num_rays == 0 {
        cache.a.clear();
        cache.b.clear();
        return Ok(TraversalResult {
            start_level,
            num_checks: 0,
            num_contacts: 0,
            cache1: cache.b,
            cache2: cache.a,
        });
    }

    let mut n = cache.seed_rays(tree, num_rays, start_level);
    let mut num_checks = n as u64;
    let mut level = start_level;

    while level < tree.levels {
        let needed = RAY_EXPAND_FANOUT * n;
        BvttCache::<NodeRay>::ensure_len(&mut cache.b, needed);

        tracing::trace!(level, n, "expanding ray-traversal level");
        n = expand::expand_rays(
            tree,
            nodes,
            origins,
            directions,
            &cache.a[..n],
            &mut cache.b[..needed],
            options.parallelism_hint,
        );
        num_checks += n as u64;
        cache.swap();
        level += 1;
    }

    let needed = COLLECT_FANOUT * n.max(1);
    BvttCache::<NodeRay>::ensure_len(&mut cache.b, needed);
    tracing::trace!(level, n, "collecting ray hits");
    let num_contacts = collect::collect_rays(
        tree,
        leaves,
        order,
        origins,
        directions,
        &cache.a[..n],
        &mut cache.b[..needed],
        options.parallelism_hint,
    );

    Ok(TraversalResult {
        start_level,
        num_checks,
        num_contacts,
        cache1: cache.b,
        cache2: cache.a,
    })
}
