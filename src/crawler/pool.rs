//! Bounded worker pool
//!
//! Both pipeline phases are a fan-out over independent inputs followed by a
//! fan-in once every task has finished. [`WorkerPool::map`] is that shape: at
//! most `workers` tasks run at once, and results come back in completion
//! order.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Fixed-size pool of concurrent workers
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Creates a pool running at most `workers` tasks at once (minimum 1)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Returns the concurrency limit
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Applies `task` to every input and waits for all of them
    ///
    /// Results are returned in the order tasks completed, not input order.
    /// There is no timeout or cancellation: a task that never finishes keeps
    /// its slot and this call keeps waiting. A task that panics is logged and
    /// contributes no result.
    pub async fn map<T, R, F, Fut>(&self, inputs: Vec<T>, mut task: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: FnMut(T) -> Fut,
        Fut: Future<Output = R> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for input in inputs {
            let semaphore = Arc::clone(&semaphore);
            let work = task(input);
            tasks.spawn(async move {
                // The semaphore is never closed, so acquiring cannot fail
                let _permit = semaphore.acquire_owned().await.ok();
                work.await
            });
        }

        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }

        results
    }
}
