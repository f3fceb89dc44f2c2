//! Compute module abstraction — the capability set a worker loads and invokes.
//!
//! A module maps operation names to callable entries. The pool never reaches
//! into a module directly; it only depends on `ModuleLoader::load` and on
//! looking an operation up by name before invoking it.

pub mod builtin;
pub mod registry;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ModuleError, OperationError};

pub use registry::ModuleRegistry;

/// A single named operation exposed by a compute module.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Name under which callers address this operation.
    fn name(&self) -> &str;

    /// Invoke the operation with positional arguments.
    async fn call(&self, args: &[Value]) -> Result<Value, OperationError>;
}

/// A loaded compute module instance.
pub trait ComputeModule: Send + Sync {
    fn name(&self) -> &str;

    /// Look up an operation by name. `None` means the module does not carry
    /// that capability; callers must check membership before invoking.
    fn get(&self, name: &str) -> Option<Arc<dyn Operation>>;

    /// Names of all operations, for diagnostics.
    fn operations(&self) -> Vec<String>;
}

/// Loads a compute module instance.
///
/// Each worker calls `load` once and caches the returned instance for its
/// lifetime, so implementations must be idempotent.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn ComputeModule>, ModuleError>;
}

/// Map-backed module for operation sets known up front.
pub struct StaticModule {
    name: String,
    operations: HashMap<String, Arc<dyn Operation>>,
}

impl StaticModule {
    /// Create an empty module with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: HashMap::new(),
        }
    }

    /// Add an operation, replacing any previous entry with the same name.
    pub fn register(mut self, operation: Arc<dyn Operation>) -> Self {
        self.operations
            .insert(operation.name().to_string(), operation);
        self
    }
}

impl ComputeModule for StaticModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, name: &str) -> Option<Arc<dyn Operation>> {
        self.operations.get(name).cloned()
    }

    fn operations(&self) -> Vec<String> {
        self.operations.keys().cloned().collect()
    }
}

/// Adapter turning a plain function into an `Operation`.
pub struct FnOperation {
    name: &'static str,
    f: fn(&[Value]) -> Result<Value, OperationError>,
}

impl FnOperation {
    pub fn new(
        name: &'static str,
        f: fn(&[Value]) -> Result<Value, OperationError>,
    ) -> Arc<dyn Operation> {
        Arc::new(Self { name, f })
    }
}

#[async_trait]
impl Operation for FnOperation {
    fn name(&self) -> &str {
        self.name
    }

    async fn call(&self, args: &[Value]) -> Result<Value, OperationError> {
        (self.f)(args)
    }
}

/// Extract the required numeric argument at `index`.
pub fn number_arg(operation: &str, args: &[Value], index: usize) -> Result<f64, OperationError> {
    args.get(index)
        .and_then(Value::as_f64)
        .ok_or_else(|| OperationError::InvalidArguments {
            name: operation.to_string(),
            reason: format!("expected a number at position {index}"),
        })
}

/// Extract the required argument at `index` as a numeric sequence.
pub fn numbers_arg(
    operation: &str,
    args: &[Value],
    index: usize,
) -> Result<Vec<f64>, OperationError> {
    let items = args
        .get(index)
        .and_then(Value::as_array)
        .ok_or_else(|| OperationError::InvalidArguments {
            name: operation.to_string(),
            reason: format!("expected an array of numbers at position {index}"),
        })?;

    items
        .iter()
        .map(|item| {
            item.as_f64().ok_or_else(|| OperationError::InvalidArguments {
                name: operation.to_string(),
                reason: format!("expected an array of numbers at position {index}"),
            })
        })
        .collect()
}

/// Wrap a computed number as a JSON value.
///
/// JSON has no NaN or infinity, so non-finite results are reported as
/// operation failures rather than silently corrupting the value channel.
pub fn finite_number(operation: &str, value: f64) -> Result<Value, OperationError> {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| OperationError::Failed {
            name: operation.to_string(),
            reason: format!("produced a non-finite result ({value})"),
        })
}
