//! Bounded pool of message workers.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::warn;

/// Runs one task per inbound message, with at most `size` in flight.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Spawn `task` once a worker is free.
    pub fn spawn<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = self.permits.clone();
        tokio::spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                warn!("Worker pool closed, dropping task");
                return;
            };
            task.await;
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Workers not currently running a task.
    pub fn idle(&self) -> usize {
        self.permits.available_permits()
    }

    /// Stop admitting tasks; queued ones are dropped.
    pub fn close(&self) {
        self.permits.close();
    }
}
