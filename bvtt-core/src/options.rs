/// Per-call configuration for `traverse` / `traverse_rays`.
#[derive(Debug, Clone, Copy)]
pub struct TraversalOptions {
    /// Level to seed the BVTT at. `None` picks the traversal's documented
    /// default (`max(levels / 2, built_level)` for self-traversal, `1` for
    /// ray traversal).
    pub start_level: Option<u32>,
    /// Upper bound on worker tasks per level (`T_max` in the partitioner).
    /// Defaults to the available hardware parallelism.
    pub parallelism_hint: usize,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            start_level: None,
            parallelism_hint: std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}
