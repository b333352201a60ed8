//! Bounded worker pool shared by every level of a walk.
//!
//! Tasks are spawned onto the tokio runtime without limit; what the pool
//! bounds is the number of remote calls in flight. A task holds a permit only
//! while its own call is outstanding, never while it waits on child tasks, so
//! arbitrarily deep fan-out cannot exhaust the pool and deadlock.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Create a pool of `size` workers (at least 1).
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of workers currently idle.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Enqueue a task without waiting for it. Collect it by awaiting the handle.
    pub fn submit<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tokio::spawn(task)
    }

    /// Run one remote call on a worker, waiting for a free slot first.
    pub async fn run<F>(&self, call: F) -> F::Output
    where
        F: Future,
    {
        // The semaphore is owned here and never closed, so acquire cannot fail.
        let _permit = self.permits.acquire().await.ok();
        call.await
    }
}

/// Run a remote call through the pool when one is supplied, directly otherwise.
pub async fn run_on<F>(pool: Option<&WorkerPool>, call: F) -> F::Output
where
    F: Future,
{
    match pool {
        Some(pool) => pool.run(call).await,
        None => call.await,
    }
}
