//! Limits applied when validating user input.

/// Smallest worker count a cluster may be scaled to.
pub const MINIMUM_NUM_WORKERS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub minimum_num_workers: i64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            minimum_num_workers: MINIMUM_NUM_WORKERS,
        }
    }
}
