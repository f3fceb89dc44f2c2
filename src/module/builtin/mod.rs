//! Built-in compute modules.
//!
//! The `math` module carries the scalar and aggregate operations of the
//! scientific engine this pool was built to host.

pub mod arithmetic;
pub mod stats;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ModuleError;
use crate::module::{ComputeModule, ModuleLoader, StaticModule};

/// Reference string for the built-in math module.
pub const MATH_MODULE: &str = "math";

/// Assemble the built-in math module.
pub fn math_module() -> Arc<dyn ComputeModule> {
    let module = StaticModule::new(MATH_MODULE);
    let module = arithmetic::register(module);
    let module = stats::register(module);
    Arc::new(module)
}

/// Loader for the built-in math module. `load` just assembles the operation
/// table, so it is trivially idempotent.
pub struct MathLoader;

#[async_trait]
impl ModuleLoader for MathLoader {
    async fn load(&self) -> Result<Arc<dyn ComputeModule>, ModuleError> {
        Ok(math_module())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn math_module_carries_both_operation_sets() {
        let module = MathLoader.load().await.unwrap();
        assert_eq!(module.name(), MATH_MODULE);
        for name in ["add", "identity", "clamp", "mean", "dot"] {
            assert!(module.get(name).is_some(), "missing operation {name}");
        }
        assert!(module.get("missingFn").is_none());
    }
}
