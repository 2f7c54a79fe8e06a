// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Scheduler service: glues the pipeline engine (C2), reconciler (C4) and
//! chain analyser (C5) together into one in-process call a caller makes
//! once per request (spec.md §3.2 "Decision record: created on
//! submission").
//!
//! The request-intake transport that would drive this from the network is
//! an external collaborator (spec.md §1.1) and is not implemented here;
//! the CLI's `schedule` command is today's only caller, invoking this
//! in process as a linked library rather than round-tripping a socket.

use crate::ttl_service::TtlService;
use fleetsched_core::{
    Clock, Decision, DecisionId, DecisionRecord, DecisionStatus, PipelineSpec, Request, TtlConfig,
};
use fleetsched_engine::{
    reconcile, render_chain, CompiledPipeline, InitError, InitErrorSeverity, PipelineEngine,
    PipelineTable, PluginContext, PluginRegistry, RunError,
};
use fleetsched_storage::{DecisionStore, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("pipeline '{0}' has not been compiled")]
    UnknownPipeline(String),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Runs requests through compiled pipelines and persists the reconciled,
/// chain-annotated decision record for each.
///
/// `reconcile_concurrency` bounds how many `schedule` calls run at once
/// (spec.md §5 "default 1 concurrent reconcile for the decision
/// reconciler"); within one call, everything is a single-threaded
/// cooperative sequence.
pub struct Scheduler {
    engine: PipelineEngine,
    table: Arc<PipelineTable>,
    store: Arc<dyn DecisionStore>,
    clock: Arc<dyn Clock>,
    reconcile_permits: Arc<Semaphore>,
    ttl: TtlService,
    ttl_config: TtlConfig,
    shutdown: CancellationToken,
}

impl Scheduler {
    /// `ttl`/`ttl_config` let `schedule` register a steady-state TTL watch
    /// for every decision it creates (spec.md §4.6 P6), not just the ones
    /// the startup sweep already knew about. `shutdown` is the process-wide
    /// cancellation token the watch tasks live under; it is independent of
    /// the per-call `cancel` token `schedule` takes for the pipeline run.
    pub fn new(
        table: Arc<PipelineTable>,
        store: Arc<dyn DecisionStore>,
        clock: Arc<dyn Clock>,
        reconcile_concurrency: usize,
        ttl: TtlService,
        ttl_config: TtlConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            engine: PipelineEngine::new(),
            table,
            store,
            clock,
            reconcile_permits: Arc::new(Semaphore::new(reconcile_concurrency.max(1))),
            ttl,
            ttl_config,
            shutdown,
        }
    }

    /// Compiles `spec` against `registry` and publishes it under its own
    /// name (spec.md §4.2 "Construction", §5 "replace-value"). On failure,
    /// this is "the surrounding controller" spec.md §4.2 point 2 names: it
    /// acts on `InitError::severity()` rather than dropping the
    /// distinction on the floor. A critical error (unknown plugin,
    /// duplicate step name) leaves any previously published pipeline under
    /// this name untouched and not flagged degraded — the descriptor
    /// itself needs fixing before another attempt can help. A non-critical
    /// error (one step's options failed validation) flags the pipeline
    /// degraded in `self.table` so callers can surface that a refresh
    /// failed, while the prior compiled form (if any) keeps serving
    /// `schedule` calls.
    pub fn compile_and_publish(
        &self,
        spec: &PipelineSpec,
        registry: &PluginRegistry,
        ctx: &PluginContext,
    ) -> Result<(), InitError> {
        match CompiledPipeline::compile(spec, registry, ctx) {
            Ok(compiled) => {
                self.table.publish(compiled);
                Ok(())
            }
            Err(error) => {
                match error.severity() {
                    InitErrorSeverity::Critical => {
                        tracing::error!(pipeline = %spec.name, error = %error, "pipeline init failed critically");
                    }
                    InitErrorSeverity::NonCritical => {
                        tracing::warn!(pipeline = %spec.name, error = %error, "pipeline init failed, marking degraded");
                        self.table.mark_degraded(&spec.name);
                    }
                }
                Err(error)
            }
        }
    }

    /// Whether `pipeline_name`'s last init attempt failed non-critically,
    /// leaving a stale compiled form (if any) in place (spec.md §4.2
    /// point 2).
    pub fn is_degraded(&self, pipeline_name: &str) -> bool {
        self.table.is_degraded(pipeline_name)
    }

    /// Runs `request` through `pipeline_name`, reconciles the resulting
    /// trace, persists a new decision record for `request.resource_id()`
    /// and links it into that resource's chain (spec.md §4.4, §4.5).
    #[allow(clippy::expect_used)]
    pub async fn schedule(
        &self,
        pipeline_name: &str,
        request: &Request,
        cancel: &CancellationToken,
    ) -> Result<DecisionRecord, ScheduleError> {
        let _permit = self
            .reconcile_permits
            .acquire()
            .await
            .expect("semaphore never closed");

        let pipeline = self
            .table
            .snapshot(pipeline_name)
            .ok_or_else(|| ScheduleError::UnknownPipeline(pipeline_name.to_string()))?;

        let outcome = self.engine.run(&pipeline, request, cancel).await?;

        let input: HashMap<String, f64> = request
            .hosts
            .iter()
            .map(|h| (h.clone(), request.input_scores.get(h).copied().unwrap_or(0.0)))
            .collect();

        let mut decision = Decision {
            requested_at_ms: self.clock.epoch_ms(),
            event_type: request.intent,
            input,
            pipeline_name: pipeline.name.clone(),
            steps: outcome.step_results,
            status: DecisionStatus::error("unreconciled"),
        };
        decision.status = reconcile(&decision);

        let record = DecisionRecord {
            id: DecisionId::new(Uuid::new_v4().to_string()),
            flavor: request.flavor.clone(),
            availability_zone: request.availability_zone.clone(),
            resource_id: request.resource_id().to_string(),
            created_at_ms: decision.requested_at_ms,
            decisions: vec![decision],
            global_description: None,
            resource_version: 0,
        };

        let record = self.store.create(record).await?;
        self.ttl.watch(record.id.clone(), self.ttl_config.ttl_after_decision, self.shutdown.clone());
        self.annotate_chain(record).await
    }

    /// Recomputes and persists `record`'s chain summary against its peers
    /// (spec.md §4.5). Stores are keyed by id, so this is always a
    /// read-peers-then-update-self operation rather than a cross-record
    /// write.
    async fn annotate_chain(&self, record: DecisionRecord) -> Result<DecisionRecord, ScheduleError> {
        let peers = self.store.peers(&record.resource_id, &record.id).await?;

        let mut history: Vec<(u64, &Decision)> = peers
            .iter()
            .flat_map(|r| r.decisions.iter())
            .chain(record.decisions.iter())
            .map(|d| (d.requested_at_ms, d))
            .collect();
        history.sort_by_key(|(ts, _)| *ts);
        let ordered: Vec<Decision> = history.into_iter().map(|(_, d)| d.clone()).collect();

        let mut record = record;
        record.global_description = render_chain(&ordered);
        Ok(self.store.put(record).await?)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
