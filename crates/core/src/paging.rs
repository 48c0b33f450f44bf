//! Pagination clamping shared by list queries.

/// Default page size when the caller supplies no limit.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Hard ceiling on page size regardless of what the caller asks for.
pub const MAX_PAGE_SIZE: i64 = 200;

/// Clamp a caller-supplied limit into `1..=max`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a caller-supplied offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
