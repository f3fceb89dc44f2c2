//! Dispatch pool — task distribution across a fixed set of workers.
//!
//! Core components:
//! - `task` — Task and Completion messages
//! - `executor` — worker-side module loading and operation invocation
//! - `handle` — one executor running in its own tokio task
//! - `dispatcher` — the pool: identity generation, worker selection,
//!   completion correlation

pub mod dispatcher;
pub mod executor;
pub mod handle;
pub mod task;

pub use dispatcher::Pool;
pub use executor::Executor;
pub use handle::WorkerHandle;
pub use task::{Completion, Task};
