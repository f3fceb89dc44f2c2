//! Module registry mapping reference strings to loaders.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::module::builtin::{self, MATH_MODULE};
use crate::module::ModuleLoader;

/// Registry of loadable compute modules, keyed by reference string.
pub struct ModuleRegistry {
    loaders: RwLock<HashMap<String, Arc<dyn ModuleLoader>>>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            loaders: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry pre-loaded with the built-in modules.
    pub fn with_builtins() -> Self {
        let mut loaders: HashMap<String, Arc<dyn ModuleLoader>> = HashMap::new();
        loaders.insert(MATH_MODULE.to_string(), Arc::new(builtin::MathLoader));
        Self {
            loaders: RwLock::new(loaders),
        }
    }

    /// Register a loader under a reference string, replacing any previous
    /// entry.
    pub async fn register(&self, reference: impl Into<String>, loader: Arc<dyn ModuleLoader>) {
        let reference = reference.into();
        self.loaders.write().await.insert(reference.clone(), loader);
        tracing::debug!("Registered module: {}", reference);
    }

    /// Get a loader by reference.
    pub async fn get(&self, reference: &str) -> Option<Arc<dyn ModuleLoader>> {
        self.loaders.read().await.get(reference).cloned()
    }

    /// Check if a reference is registered.
    pub async fn has(&self, reference: &str) -> bool {
        self.loaders.read().await.contains_key(reference)
    }

    /// List all registered references.
    pub async fn list(&self) -> Vec<String> {
        self.loaders.read().await.keys().cloned().collect()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
