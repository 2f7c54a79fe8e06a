// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Bounded-concurrency worker pool (spec.md §5 "The controller hosts a
//! worker pool (default 1 concurrent reconcile for the decision
//! reconciler, 10 for the TTL controller; configurable)").
//!
//! A reusable semaphore-gated pool rather than one fixed-shape background
//! task spawner, since both the reconciler and the TTL controller need
//! their own independent concurrency caps.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Caps the number of concurrently in-flight jobs submitted through it.
/// Each `spawn` call blocks (asynchronously) until a permit is free, then
/// runs the job on its own tokio task.
#[derive(Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
}

impl WorkerPool {
    pub fn new(concurrency: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Runs `job` once a permit is available, returning a handle to its
    /// completion. The permit is held for the job's whole lifetime and
    /// released automatically when it finishes (spec.md §5 "Ordering").
    #[allow(clippy::expect_used)]
    pub fn spawn<F>(&self, job: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let semaphore = self.semaphore.clone();
        tokio::spawn(async move {
            // This pool never calls `Semaphore::close`, so acquisition is infallible.
            let _permit = semaphore.acquire_owned().await.expect("semaphore never closed");
            job.await
        })
    }
}

#[cfg(test)]
#[path = "worker_pool_tests.rs"]
mod tests;
