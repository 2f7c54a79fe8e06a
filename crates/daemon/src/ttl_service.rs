// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Background driver for the TTL controller (C6, spec.md §4.6).
//!
//! Runs the startup sweep once, then keeps one watch task alive per
//! surviving record, each sleeping until its own next-eligible instant
//! before re-checking — rather than a single poll loop over every record,
//! matching spec.md §5 ("TTL controller suspends on: get, list, delete,
//! and the requeue timer").

use crate::worker_pool::WorkerPool;
use fleetsched_core::DecisionId;
use fleetsched_storage::{DecisionStore, StoreError, TtlAction, TtlController};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct Inner {
    controller: TtlController,
    store: Arc<dyn DecisionStore>,
    pool: WorkerPool,
}

/// Owns the worker pool that runs per-record TTL watches (spec.md §5
/// "default ... 10 for the TTL controller; configurable").
#[derive(Clone)]
pub struct TtlService {
    inner: Arc<Inner>,
}

impl TtlService {
    pub fn new(controller: TtlController, store: Arc<dyn DecisionStore>, concurrency: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                controller,
                store,
                pool: WorkerPool::new(concurrency),
            }),
        }
    }

    /// Sweeps every persisted record once (spec.md §4.6 "On process
    /// start"), then spawns a watch for every record that survived with a
    /// future requeue time.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), StoreError> {
        let outcomes = self.inner.controller.startup_sweep(&cancel).await?;
        for (id, action) in outcomes {
            if let TtlAction::RequeueAfter(delay) = action {
                self.spawn_watch(id, delay, cancel.clone());
            }
        }
        Ok(())
    }

    /// Registers a watch for a record created or updated after the
    /// startup sweep already ran (spec.md §3.2 "Decision record: created
    /// on submission").
    pub fn watch(&self, id: DecisionId, delay: Duration, cancel: CancellationToken) {
        self.spawn_watch(id, delay, cancel);
    }

    fn spawn_watch(&self, id: DecisionId, mut delay: Duration, cancel: CancellationToken) {
        let inner = self.inner.clone();
        self.inner.pool.spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(delay) => {}
                }

                let record = match inner.store.get(&id).await {
                    Ok(Some(record)) => record,
                    Ok(None) => return,
                    Err(error) => {
                        tracing::error!(decision_id = %id, %error, "ttl watch: get failed");
                        return;
                    }
                };

                match inner.controller.check_one(&record).await {
                    Ok(TtlAction::Deleted) => {
                        tracing::info!(decision_id = %id, "ttl watch: decision record deleted");
                        return;
                    }
                    Ok(TtlAction::RequeueAfter(next)) => {
                        delay = next;
                    }
                    Err(error) => {
                        tracing::error!(decision_id = %id, %error, "ttl watch: check failed");
                        return;
                    }
                }
            }
        });
    }
}

#[cfg(test)]
#[path = "ttl_service_tests.rs"]
mod tests;
