//! Configuration types.

use std::time::Duration;

/// Dispatch pool configuration.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker tasks spawned at initialization. Must be at least 1.
    pub worker_count: usize,
    /// Optional per-task deadline. `None` means a caller waits indefinitely
    /// for its completion.
    pub task_timeout: Option<Duration>,
}

impl PoolConfig {
    /// Config with a specific worker count and defaults elsewhere.
    pub fn with_workers(worker_count: usize) -> Self {
        Self {
            worker_count,
            ..Self::default()
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            task_timeout: None,
        }
    }
}
