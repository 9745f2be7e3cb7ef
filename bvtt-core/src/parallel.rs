use crate::partition::Partition;

/// Runs `task` once per partition range, each writing into its own disjoint,
/// worst-case-sized region of `dst` (`fanout * range.len()` slots), then
/// compacts the written prefixes into a dense run at the front of `dst`.
///
/// With a single task (`partition.len() == 1`) `task` is called directly —
/// no work is scheduled on the thread pool. With more than one task, each
/// runs as a `rayon::scope` job over a `split_at_mut`-derived sub-slice of
/// `dst`; no locks or atomics are involved, since the regions never alias.
///
/// Returns the total number of items written to the compacted prefix.
pub(crate) fn run<S, D, F>(
    src: &[S],
    dst: &mut [D],
    partition: &Partition,
    fanout: usize,
    task: F,
) -> usize
where
    S: Sync,
    D: Copy + Send,
    F: Fn(&[S], &mut [D]) -> usize + Sync,
{
    let task_count = partition.len();
    let sizes: Vec<usize> = (0..task_count)
        .map(|t| {
            let (s, e) = partition.range(t);
            fanout * (e - s)
        })
        .collect();

    let mut counts = vec![0usize; task_count];

    if task_count == 1 {
        let (s, e) = partition.range(0);
        counts[0] = task(&src[s..e], &mut dst[..sizes[0]]);
    } else {
        let mut regions: Vec<&mut [D]> = Vec::with_capacity(task_count);
        let mut rest = dst;
        for &size in &sizes {
            let (head, tail) = rest.split_at_mut(size);
            regions.push(head);
            rest = tail;
        }

        let mut count_slots: Vec<&mut usize> = Vec::with_capacity(task_count);
        let mut rest_counts: &mut [usize] = &mut counts;
        for _ in 0..task_count {
            let (head, tail) = rest_counts.split_at_mut(1);
            count_slots.push(&mut head[0]);
            rest_counts = tail;
        }

        rayon::scope(|scope| {
            for (t, (region, count_slot)) in regions.into_iter().zip(count_slots).enumerate() {
                let (s, e) = partition.range(t);
                let task = &task;
                let items = &src[s..e];
                scope.spawn(move |_| {
                    *count_slot = task(items, region);
                });
            }
        });
    }

    let mut offsets = Vec::with_capacity(task_count);
    let mut acc = 0usize;
    for &size in &sizes {
        offsets.push(acc);
        acc += size;
    }

    let mut total = counts[0];
    for t in 1..task_count {
        let k = counts[t];
        if k > 0 {
            dst.copy_within(offsets[t]..offsets[t] + k, total);
        }
        total += k;
    }
    total
}
