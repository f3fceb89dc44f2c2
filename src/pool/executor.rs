//! Worker-side operation execution.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::OnceCell;

use crate::error::{Error, OperationError};
use crate::module::{ComputeModule, ModuleLoader};

/// Executes named operations against a lazily loaded compute module.
///
/// The module is loaded on first use and cached for the executor's lifetime,
/// so a worker pays the load cost once, not once per task.
pub struct Executor {
    loader: Arc<dyn ModuleLoader>,
    module: OnceCell<Arc<dyn ComputeModule>>,
}

impl Executor {
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            loader,
            module: OnceCell::new(),
        }
    }

    async fn module(&self) -> Result<&Arc<dyn ComputeModule>, Error> {
        self.module
            .get_or_try_init(|| async {
                let module = self.loader.load().await?;
                tracing::debug!(module = module.name(), "Loaded compute module");
                Ok(module)
            })
            .await
            .map_err(Error::Module)
    }

    /// Invoke a named operation with positional arguments.
    ///
    /// Membership is checked against the module's capability set before the
    /// call; an absent name fails without touching the module.
    pub async fn execute(&self, operation: &str, args: &[Value]) -> Result<Value, Error> {
        let module = self.module().await?;

        let entry = module
            .get(operation)
            .ok_or_else(|| OperationError::NotFound {
                name: operation.to_string(),
            })?;

        entry.call(args).await.map_err(Error::Operation)
    }
}
