//! Task and completion messages exchanged between the pool and its workers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Error;

/// One operation invocation routed to a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Identity correlating this task with its completion. UUIDv4 keeps the
    /// collision probability among in-flight tasks negligible.
    pub id: Uuid,
    /// Name of the operation to invoke.
    pub operation: String,
    /// Positional arguments.
    pub args: Vec<Value>,
}

impl Task {
    /// Create a task with a fresh identity.
    pub fn new(operation: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation: operation.into(),
            args,
        }
    }
}

/// The outcome of executing a task, tagged with the original task identity.
///
/// Produced by a worker, consumed exactly once by the pool's router.
#[derive(Debug)]
pub struct Completion {
    pub id: Uuid,
    pub result: Result<Value, Error>,
}
