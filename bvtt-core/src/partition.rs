/// Minimum items per task before the partitioner stops splitting further.
/// Fixed for this core rather than tunable at the call site, since it's a
/// floor chosen to amortize thread spawn/join cost, not a caller-facing
/// policy knob.
pub const MIN_CHUNK: usize = 100;

/// A plan for splitting `0..n` into a small number of contiguous,
/// near-equal-size ranges, one per worker task.
///
/// Sizes differ by at most one item: the first `n % task_count` ranges get
/// one extra item over the floor `n / task_count`.
#[derive(Clone, Debug)]
pub struct Partition {
    bounds: Vec<(usize, usize)>,
}

impl Partition {
    /// Plans a partition of `0..n` into at most `worker_cap` tasks, each
    /// with at least `min_chunk` items (except when `n` itself is smaller
    /// than `min_chunk`, in which case there is exactly one task).
    pub fn plan(n: usize, worker_cap: usize, min_chunk: usize) -> Self {
        let worker_cap = worker_cap.max(1);
        let min_chunk = min_chunk.max(1);

        if n == 0 {
            return Self {
                bounds: vec![(0, 0)],
            };
        }

        let wanted = n.div_ceil(min_chunk);
        let task_count = wanted.clamp(1, worker_cap);
        let base = n / task_count;
        let remainder = n % task_count;

        let mut bounds = Vec::with_capacity(task_count);
        let mut start = 0;
        for t in 0..task_count {
            let size = base + usize::from(t < remainder);
            bounds.push((start, start + size));
            start += size;
        }
        Self { bounds }
    }

    /// Number of tasks in this plan. Always at least 1.
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The half-open `[start, end)` range assigned to task `t`.
    pub fn range(&self, t: usize) -> (usize, usize) {
        self.bounds[t]
    }
}
