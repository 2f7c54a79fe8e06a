// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! End-to-end workspace tests: request → compiled pipeline → reconciled
//! decision record → persisted store → chain analysis → TTL sweep. The
//! per-module unit tests in each crate already cover these algorithms in
//! isolation; this file exercises them wired together the way
//! `fleetsched-daemon::Scheduler` wires them for a real caller.

use fleetsched_adapters::{InMemoryHostCapabilityLookup, InMemoryReservationLookup};
use fleetsched_core::{
    Decision, DecisionId, DecisionRecord, Flavor, Intent, PipelineKind, PipelineSpec, Request,
    StepSpec, SystemClock,
};
use fleetsched_engine::fixtures::{ConstantOffsetWeigher, ThresholdFilter};
use fleetsched_engine::{reconcile, render_chain, CompiledPipeline, PluginContext, PluginRegistry};
use fleetsched_storage::{DecisionStore, InMemoryDecisionStore, TtlController};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register_filter("threshold_filter", Arc::new(ThresholdFilter::factory));
    registry.register_weigher("constant_offset_weigher", Arc::new(ConstantOffsetWeigher::factory));
    registry
}

fn ctx() -> PluginContext {
    PluginContext {
        host_capabilities: Arc::new(InMemoryHostCapabilityLookup::default()),
        reservations: Arc::new(InMemoryReservationLookup::default()),
    }
}

fn pipeline_spec() -> PipelineSpec {
    PipelineSpec {
        name: "placement".to_string(),
        kind: PipelineKind::FilterWeigher,
        create_decisions: true,
        filters: vec![StepSpec {
            plugin_name: "threshold_filter".to_string(),
            alias: "drop_low".to_string(),
            raw_options: serde_json::json!({"below": -1.0}),
            scope: None,
        }],
        weighers: vec![StepSpec {
            plugin_name: "constant_offset_weigher".to_string(),
            alias: "boost_host1".to_string(),
            raw_options: serde_json::json!({"offset": 5.0}),
            scope: None,
        }],
    }
}

fn request(hosts: &[&str], instance_uuid: &str) -> Request {
    Request {
        hosts: hosts.iter().map(|h| h.to_string()).collect(),
        input_scores: hosts.iter().map(|h| (h.to_string(), 1.0)).collect(),
        flavor: Flavor { vcpus: 4, memory_mb: 8192, disk_gb: 80, extra_specs: HashMap::new() },
        image_properties: HashMap::new(),
        project_id: "proj-a".to_string(),
        availability_zone: "nova".to_string(),
        scheduler_hints: HashMap::new(),
        instance_uuid: instance_uuid.to_string(),
        intent: Intent::InitialPlacement,
    }
}

async fn run_and_persist(
    engine: &fleetsched_engine::PipelineEngine,
    pipeline: &CompiledPipeline,
    store: &dyn DecisionStore,
    clock: &SystemClock,
    request: &Request,
    cancel: &CancellationToken,
) -> DecisionRecord {
    let outcome = engine.run(pipeline, request, cancel).await.unwrap();

    let mut decision = Decision {
        requested_at_ms: fleetsched_core::Clock::epoch_ms(clock),
        event_type: request.intent,
        input: request.input_scores.clone(),
        pipeline_name: pipeline.name.clone(),
        steps: outcome.step_results,
        status: fleetsched_core::DecisionStatus::error("unreconciled"),
    };
    decision.status = reconcile(&decision);

    let record = DecisionRecord {
        id: DecisionId::new(format!("{}-{}", request.instance_uuid, decision.requested_at_ms)),
        flavor: request.flavor.clone(),
        availability_zone: request.availability_zone.clone(),
        resource_id: request.resource_id().to_string(),
        created_at_ms: decision.requested_at_ms,
        decisions: vec![decision],
        global_description: None,
        resource_version: 0,
    };

    store.create(record).await.unwrap()
}

#[tokio::test]
async fn a_scheduling_request_produces_a_resolved_decision_with_the_winner_boosted() {
    let registry = registry();
    let ctx = ctx();
    let compiled = CompiledPipeline::compile(&pipeline_spec(), &registry, &ctx).unwrap();
    let engine = fleetsched_engine::PipelineEngine::new();
    let store = InMemoryDecisionStore::default();
    let clock = SystemClock;
    let cancel = CancellationToken::new();

    let req = request(&["host1", "host2"], "inst-a");
    let record = run_and_persist(&engine, &compiled, &store, &clock, &req, &cancel).await;

    let decision = record.latest().unwrap();
    assert_eq!(decision.status.state, fleetsched_core::DecisionState::Resolved);
    // Both hosts survive the filter (neither input score is below -1.0) and
    // both get the same +5.0 boost, so the winner is whichever the
    // lexicographic tie-break picks — host1.
    assert_eq!(decision.status.final_scores.first().map(|(h, _)| h.as_str()), Some("host1"));
}

#[tokio::test]
async fn repeated_requests_for_one_resource_link_into_a_rendered_chain() {
    let registry = registry();
    let ctx = ctx();
    let compiled = CompiledPipeline::compile(&pipeline_spec(), &registry, &ctx).unwrap();
    let engine = fleetsched_engine::PipelineEngine::new();
    let store = InMemoryDecisionStore::default();
    let clock = SystemClock;
    let cancel = CancellationToken::new();

    let first = run_and_persist(&engine, &compiled, &store, &clock, &request(&["host1", "host2"], "inst-b"), &cancel)
        .await;
    let second =
        run_and_persist(&engine, &compiled, &store, &clock, &request(&["host2", "host1"], "inst-b"), &cancel).await;

    let peers = store.peers(&second.resource_id, &second.id).await.unwrap();
    assert_eq!(peers.len(), 1);
    assert_eq!(peers[0].id, first.id);

    let mut ordered: Vec<Decision> = peers.iter().flat_map(|r| r.decisions.iter().cloned()).collect();
    ordered.extend(second.decisions.iter().cloned());
    ordered.sort_by_key(|d| d.requested_at_ms);

    let chain = render_chain(&ordered);
    assert!(chain.is_some());
    assert!(chain.unwrap().starts_with("chain:"));
}

#[tokio::test]
async fn the_ttl_controller_deletes_a_record_once_it_ages_past_the_configured_ttl() {
    let registry = registry();
    let ctx = ctx();
    let compiled = CompiledPipeline::compile(&pipeline_spec(), &registry, &ctx).unwrap();
    let engine = fleetsched_engine::PipelineEngine::new();
    let store = Arc::new(InMemoryDecisionStore::default());
    let clock = SystemClock;
    let cancel = CancellationToken::new();

    let record =
        run_and_persist(&engine, &compiled, store.as_ref(), &clock, &request(&["host1"], "inst-c"), &cancel).await;

    let fake_clock = fleetsched_core::FakeClock::new(record.created_at_ms);
    let controller = TtlController::new(
        store.clone(),
        Arc::new(fake_clock.clone()),
        fleetsched_core::TtlConfig { ttl_after_decision: Duration::from_secs(60) },
    );

    let immediate = controller.check_one(&record).await.unwrap();
    assert!(matches!(immediate, fleetsched_storage::TtlAction::RequeueAfter(_)));

    fake_clock.advance_ms(61_000);
    let after_ttl = controller.check_one(&record).await.unwrap();
    assert_eq!(after_ttl, fleetsched_storage::TtlAction::Deleted);
    assert!(store.get(&record.id).await.unwrap().is_none());
}

#[tokio::test]
async fn an_empty_candidate_host_set_is_reported_as_an_error_decision() {
    let registry = registry();
    let ctx = ctx();
    let compiled = CompiledPipeline::compile(&pipeline_spec(), &registry, &ctx).unwrap();
    let engine = fleetsched_engine::PipelineEngine::new();
    let store = InMemoryDecisionStore::default();
    let clock = SystemClock;
    let cancel = CancellationToken::new();

    let record = run_and_persist(&engine, &compiled, &store, &clock, &request(&[], "inst-d"), &cancel).await;

    let decision = record.latest().unwrap();
    assert_eq!(decision.status.state, fleetsched_core::DecisionState::Error);
    assert!(decision.status.error.is_some());
}
