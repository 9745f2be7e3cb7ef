use thiserror::Error;

/// Errors surfaced by `traverse` / `traverse_rays`.
///
/// Precondition violations (bad `start_level`, mismatched ray arrays) are
/// returned before any traversal work starts. `InvariantViolation` reports a
/// pre-sizing bug in the core itself (a level's destination buffer turned
/// out too small) rather than panicking the caller's process.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BvttError {
    #[error("start_level {start_level} out of range [{built_level}, {levels}]")]
    StartLevelOutOfRange {
        start_level: u32,
        built_level: u32,
        levels: u32,
    },

    #[error(
        "ray origins/directions length mismatch: {origins} origins vs {directions} directions"
    )]
    RayArityMismatch { origins: usize, directions: usize },

    #[error("invariant violated at level {level}, item {item}: {detail}")]
    InvariantViolation {
        level: u32,
        item: usize,
        detail: &'static str,
    },
}
