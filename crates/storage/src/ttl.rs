// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! TTL controller (C6, spec.md §4.6).
//!
//! Computes a decision record's age against the configured TTL and either
//! deletes it or reports how long until it becomes eligible. The startup
//! sweep (spec.md "On process start") drives the same check over every
//! record once, honoring cancellation (spec.md §5 "The startup sweep
//! terminates at the first cancellation").

use crate::error::StoreError;
use crate::store::DecisionStore;
use fleetsched_core::{Clock, DecisionId, DecisionRecord, TtlConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Outcome of checking one record's TTL (spec.md §4.6, P6).
#[derive(Debug, Clone, PartialEq)]
pub enum TtlAction {
    /// `age >= ttl`: the record was deleted (or was already gone).
    Deleted,
    /// `age < ttl`: re-check after this duration.
    RequeueAfter(Duration),
}

#[derive(Clone)]
pub struct TtlController {
    store: Arc<dyn DecisionStore>,
    clock: Arc<dyn Clock>,
    config: TtlConfig,
}

impl TtlController {
    pub fn new(store: Arc<dyn DecisionStore>, clock: Arc<dyn Clock>, config: TtlConfig) -> Self {
        Self { store, clock, config }
    }

    /// Applies the TTL check to one record (spec.md §4.6). Deletion
    /// failures that turn out to be `NotFound` are treated as success
    /// (spec.md §7 "Decision not found in TTL path").
    pub async fn check_one(&self, record: &DecisionRecord) -> Result<TtlAction, StoreError> {
        let reference_time_ms = record.reference_time_ms();
        let now_ms = self.clock.epoch_ms();
        let age_ms = now_ms.saturating_sub(reference_time_ms);
        let ttl_ms = self.config.ttl_after_decision.as_millis() as u64;

        if age_ms >= ttl_ms {
            match self.store.delete(&record.id, record.resource_version).await {
                Ok(()) => Ok(TtlAction::Deleted),
                Err(StoreError::NotFound(_)) => Ok(TtlAction::Deleted),
                Err(other) => Err(other),
            }
        } else {
            Ok(TtlAction::RequeueAfter(Duration::from_millis(ttl_ms - age_ms)))
        }
    }

    /// Lists every record once and runs `check_one` over each, stopping at
    /// the first cancellation and leaving the remaining records for the
    /// steady-state loop (spec.md §5 "Cancellation").
    pub async fn startup_sweep(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<(DecisionId, TtlAction)>, StoreError> {
        let records = self.store.list().await?;
        let mut outcomes = Vec::with_capacity(records.len());
        for record in records {
            if cancel.is_cancelled() {
                tracing::warn!(processed = outcomes.len(), "ttl startup sweep cancelled");
                break;
            }
            let action = self.check_one(&record).await?;
            tracing::info!(decision_id = %record.id, action = ?action, "ttl sweep checked record");
            outcomes.push((record.id.clone(), action));
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
#[path = "ttl_tests.rs"]
mod tests;
