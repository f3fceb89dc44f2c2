//! Dispatch pool — task distribution and completion correlation.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::PoolConfig;
use crate::error::{ConfigError, Error, ModuleError, PoolError, Result};
use crate::module::ModuleRegistry;
use crate::pool::handle::WorkerHandle;
use crate::pool::task::{Completion, Task};

/// In-flight requests: task identity to the caller awaiting its result.
type PendingMap = HashMap<Uuid, oneshot::Sender<Result<Value>>>;

/// Fixed-size pool of workers with asynchronous request/response correlation.
///
/// Lifecycle: `new` (no workers yet) → `initialize` (spawns workers and the
/// completion router) → any number of concurrent `run` calls → `shutdown`.
pub struct Pool {
    config: PoolConfig,
    modules: Arc<ModuleRegistry>,
    workers: RwLock<Vec<WorkerHandle>>,
    pending: Arc<Mutex<PendingMap>>,
    router: Mutex<Option<JoinHandle<()>>>,
}

impl Pool {
    /// Pool over the built-in module registry.
    pub fn new(config: PoolConfig) -> Self {
        Self::with_registry(config, Arc::new(ModuleRegistry::with_builtins()))
    }

    /// Pool over a caller-supplied module registry.
    pub fn with_registry(config: PoolConfig, modules: Arc<ModuleRegistry>) -> Self {
        Self {
            config,
            modules,
            workers: RwLock::new(Vec::new()),
            pending: Arc::new(Mutex::new(HashMap::new())),
            router: Mutex::new(None),
        }
    }

    /// Spawn the worker handles and the completion router.
    ///
    /// Must complete before `run` is used. Each worker loads the referenced
    /// module independently, on its first task.
    pub async fn initialize(&self, module_ref: &str) -> Result<()> {
        if self.config.worker_count == 0 {
            return Err(ConfigError::InvalidValue {
                key: "worker_count".to_string(),
                message: "must be at least 1".to_string(),
            }
            .into());
        }

        let loader = self
            .modules
            .get(module_ref)
            .await
            .ok_or_else(|| ModuleError::NotFound {
                reference: module_ref.to_string(),
            })?;

        let mut workers = self.workers.write().await;
        if !workers.is_empty() {
            return Err(PoolError::AlreadyInitialized.into());
        }

        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        for id in 0..self.config.worker_count {
            workers.push(WorkerHandle::spawn(id, loader.clone(), completion_tx.clone()));
        }
        // Workers now hold the only senders; the router exits once they are
        // all gone.
        drop(completion_tx);

        let router = tokio::spawn(Self::route_completions(
            completion_rx,
            Arc::clone(&self.pending),
        ));
        *self.router.lock().await = Some(router);

        tracing::info!(
            module = module_ref,
            workers = self.config.worker_count,
            "Pool initialized"
        );
        Ok(())
    }

    /// Resolve completions to their registered callers.
    ///
    /// Routing uses the task identity exclusively — arrival order across
    /// workers carries no meaning.
    async fn route_completions(
        mut completion_rx: mpsc::UnboundedReceiver<Completion>,
        pending: Arc<Mutex<PendingMap>>,
    ) {
        while let Some(completion) = completion_rx.recv().await {
            let waiter = pending.lock().await.remove(&completion.id);
            match waiter {
                Some(reply_tx) => {
                    // The caller may have given up (task timeout); a failed
                    // send here is fine.
                    let _ = reply_tx.send(completion.result);
                }
                None => {
                    tracing::debug!(
                        task = %completion.id,
                        "Dropping completion with no pending request"
                    );
                }
            }
        }
    }

    /// Dispatch one operation invocation and await its result.
    ///
    /// Many `run` calls may be outstanding at once; each suspends only the
    /// calling logical task. Completions for different tasks may resolve in
    /// any order relative to submission.
    pub async fn run(&self, operation: &str, args: Vec<Value>) -> Result<Value> {
        let task = Task::new(operation, args);
        let task_id = task.id;

        let reply_rx = {
            let workers = self.workers.read().await;
            if workers.is_empty() {
                return Err(PoolError::NotInitialized.into());
            }

            // Uniform random selection: no load awareness, no affinity.
            let index = rand::thread_rng().gen_range(0..workers.len());
            tracing::debug!(
                task = %task_id,
                operation,
                worker = index,
                "Dispatching task"
            );

            // Register before sending so a completion racing back always
            // finds its entry.
            let (reply_tx, reply_rx) = oneshot::channel();
            self.pending.lock().await.insert(task_id, reply_tx);

            if let Err(e) = workers[index].send(task) {
                self.pending.lock().await.remove(&task_id);
                return Err(e.into());
            }
            reply_rx
        };

        let outcome = match self.config.task_timeout {
            Some(limit) => match tokio::time::timeout(limit, reply_rx).await {
                Ok(received) => received,
                Err(_) => {
                    self.pending.lock().await.remove(&task_id);
                    tracing::warn!(task = %task_id, operation, "Task timed out");
                    return Err(PoolError::TaskTimeout { timeout: limit }.into());
                }
            },
            None => reply_rx.await,
        };

        // A dropped reply channel means the pool was torn down underneath us.
        outcome.unwrap_or_else(|_| Err(PoolError::Terminated.into()))
    }

    /// Number of live workers. Zero until `initialize`.
    pub async fn worker_count(&self) -> usize {
        self.workers.read().await.len()
    }

    /// Number of in-flight tasks awaiting completion.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Tear down the pool: abort the workers, stop the router, and fail
    /// every outstanding request with `Terminated`.
    pub async fn shutdown(&self) {
        let stopped: Vec<JoinHandle<()>> = {
            let mut workers = self.workers.write().await;
            workers.drain(..).map(WorkerHandle::stop).collect()
        };
        if stopped.is_empty() {
            return;
        }
        let worker_total = stopped.len();
        let _ = futures::future::join_all(stopped).await;

        // All worker senders are gone, so the router drains whatever was
        // already completed and exits.
        if let Some(router) = self.router.lock().await.take() {
            let _ = router.await;
        }

        let orphaned: Vec<_> = self.pending.lock().await.drain().collect();
        for (id, reply_tx) in orphaned {
            tracing::debug!(task = %id, "Failing pending request on shutdown");
            let _ = reply_tx.send(Err(PoolError::Terminated.into()));
        }

        tracing::info!(workers = worker_total, "Pool shut down");
    }
}
