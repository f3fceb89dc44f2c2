//! Error types for the dispatch pool.

use std::time::Duration;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Module error: {0}")]
    Module(#[from] ModuleError),

    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Module resolution and loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("Module {reference} not found in registry")]
    NotFound { reference: String },

    #[error("Module {reference} failed to load: {reason}")]
    LoadFailed { reference: String, reason: String },
}

/// Operation lookup and execution errors.
///
/// These are always local to the one task that triggered them; a failing
/// operation never affects other in-flight or future tasks.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error("Operation {name} not found in module")]
    NotFound { name: String },

    #[error("Operation {name} failed: {reason}")]
    Failed { name: String, reason: String },

    #[error("Invalid arguments for operation {name}: {reason}")]
    InvalidArguments { name: String, reason: String },
}

/// Pool lifecycle and dispatch errors.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Pool is not initialized")]
    NotInitialized,

    #[error("Pool is already initialized")]
    AlreadyInitialized,

    #[error("Worker {worker} is no longer accepting tasks")]
    WorkerUnavailable { worker: usize },

    #[error("Task timed out after {timeout:?}")]
    TaskTimeout { timeout: Duration },

    #[error("Pool was shut down before the task completed")]
    Terminated,
}

/// Result type alias for the pool.
pub type Result<T> = std::result::Result<T, Error>;
