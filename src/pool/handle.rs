//! Worker handle — one executor running in its own tokio task.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::PoolError;
use crate::module::ModuleLoader;
use crate::pool::executor::Executor;
use crate::pool::task::{Completion, Task};

/// Owns one worker task and its inbound task channel.
///
/// The worker executes tasks strictly one at a time in arrival order, so
/// completions leave a single handle in the same order its tasks arrived.
/// Handles are independent of each other.
pub struct WorkerHandle {
    id: usize,
    task_tx: mpsc::UnboundedSender<Task>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Spawn a worker task that executes incoming tasks sequentially and
    /// reports each completion on the shared channel.
    pub fn spawn(
        id: usize,
        loader: Arc<dyn ModuleLoader>,
        completion_tx: mpsc::UnboundedSender<Completion>,
    ) -> Self {
        let (task_tx, mut task_rx) = mpsc::unbounded_channel::<Task>();

        let join = tokio::spawn(async move {
            let executor = Executor::new(loader);

            while let Some(task) = task_rx.recv().await {
                let task_id = task.id;
                tracing::debug!(
                    worker = id,
                    task = %task_id,
                    operation = %task.operation,
                    "Executing task"
                );

                let result = executor.execute(&task.operation, &task.args).await;

                let completion = Completion {
                    id: task_id,
                    result,
                };
                if completion_tx.send(completion).is_err() {
                    // The pool dropped its receiver; nothing left to report to.
                    break;
                }
            }

            tracing::debug!(worker = id, "Worker loop exited");
        });

        Self { id, task_tx, join }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Enqueue a task. Never blocks; fails only if the worker task has
    /// already exited.
    pub fn send(&self, task: Task) -> Result<(), PoolError> {
        self.task_tx
            .send(task)
            .map_err(|_| PoolError::WorkerUnavailable { worker: self.id })
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Abort the worker task, releasing its execution context. Returns the
    /// join handle so the caller can await full termination.
    pub fn stop(self) -> JoinHandle<()> {
        self.join.abort();
        self.join
    }
}
