// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

use super::*;
use crate::fixtures::{ConstantOffsetWeigher, ThresholdFilter};
use crate::registry::{PluginContext, PluginRegistry};
use fleetsched_adapters::{InMemoryHostCapabilityLookup, InMemoryReservationLookup};
use fleetsched_core::{Flavor, Intent, PipelineKind, PipelineSpec, StepSpec};
use serde_json::json;
use std::sync::Arc;

fn ctx() -> PluginContext {
    PluginContext {
        host_capabilities: Arc::new(InMemoryHostCapabilityLookup::new()),
        reservations: Arc::new(InMemoryReservationLookup::new()),
    }
}

fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register_filter("threshold", Arc::new(ThresholdFilter::factory));
    registry.register_weigher("offset", Arc::new(ConstantOffsetWeigher::factory));
    registry
}

fn request(hosts: &[&str], scores: &[(&str, f64)]) -> Request {
    Request {
        hosts: hosts.iter().map(|h| h.to_string()).collect(),
        input_scores: scores.iter().map(|(h, s)| (h.to_string(), *s)).collect(),
        flavor: Flavor {
            vcpus: 1,
            memory_mb: 512,
            disk_gb: 10,
            extra_specs: Default::default(),
        },
        image_properties: Default::default(),
        project_id: "proj".to_string(),
        availability_zone: "az1".to_string(),
        scheduler_hints: Default::default(),
        instance_uuid: "inst-1".to_string(),
        intent: Intent::InitialPlacement,
    }
}

#[tokio::test]
async fn run_applies_filter_then_weigher_and_prunes_survivors() {
    let spec = PipelineSpec {
        name: "default".to_string(),
        kind: PipelineKind::FilterWeigher,
        create_decisions: true,
        filters: vec![StepSpec {
            plugin_name: "threshold".to_string(),
            alias: "filter".to_string(),
            raw_options: json!({"below": 1.5}),
            scope: None,
        }],
        weighers: vec![StepSpec {
            plugin_name: "offset".to_string(),
            alias: "weigher".to_string(),
            raw_options: json!({"offset": 0.5}),
            scope: None,
        }],
    };
    let pipeline = CompiledPipeline::compile(&spec, &registry(), &ctx()).unwrap();
    let engine = PipelineEngine::new();
    let req = request(&["host1", "host2"], &[("host1", 1.0), ("host2", 2.0)]);

    let outcome = engine.run(&pipeline, &req, &CancellationToken::new()).await.unwrap();

    // ThresholdFilter removes hosts scoring *below* the cutoff, so with
    // below=1.5 host1 (1.0) is dropped and host2 (2.0) survives.
    assert!(!outcome.final_activations.contains("host1"));
    assert_eq!(outcome.final_activations.get("host2"), Some(2.5));
    assert_eq!(outcome.step_results.len(), 2);
    assert_eq!(outcome.step_results[0].name, "filter");
    assert_eq!(outcome.step_results[1].name, "weigher");
    // The persisted filter record carries a zero delta for the survivor,
    // not its raw pre-filter score (reconciler.rs `replay` adds every
    // step's output as a delta).
    assert_eq!(outcome.step_results[0].output.get("host2"), Some(&0.0));
    assert_eq!(outcome.step_results[0].output.get("host1"), None);
}

#[tokio::test]
async fn run_is_deterministic_across_repeated_runs() {
    let spec = PipelineSpec {
        name: "default".to_string(),
        kind: PipelineKind::FilterWeigher,
        create_decisions: true,
        filters: vec![],
        weighers: vec![StepSpec {
            plugin_name: "offset".to_string(),
            alias: "weigher".to_string(),
            raw_options: json!({"offset": 0.25}),
            scope: None,
        }],
    };
    let pipeline = CompiledPipeline::compile(&spec, &registry(), &ctx()).unwrap();
    let engine = PipelineEngine::new();
    let req = request(&["host1"], &[("host1", 1.0)]);

    let first = engine.run(&pipeline, &req, &CancellationToken::new()).await.unwrap();
    let second = engine.run(&pipeline, &req, &CancellationToken::new()).await.unwrap();

    assert_eq!(first.final_activations, second.final_activations);
}

#[tokio::test]
async fn cancelled_token_aborts_the_run() {
    let spec = PipelineSpec {
        name: "default".to_string(),
        kind: PipelineKind::FilterWeigher,
        create_decisions: true,
        filters: vec![StepSpec {
            plugin_name: "threshold".to_string(),
            alias: "filter".to_string(),
            raw_options: json!({"below": 1.0}),
            scope: None,
        }],
        weighers: vec![],
    };
    let pipeline = CompiledPipeline::compile(&spec, &registry(), &ctx()).unwrap();
    let engine = PipelineEngine::new();
    let req = request(&["host1"], &[("host1", 1.0)]);

    let token = CancellationToken::new();
    token.cancel();

    let result = engine.run(&pipeline, &req, &token).await;
    assert!(matches!(result, Err(RunError::Cancelled)));
}

#[test]
fn absolute_post_step_scores_adds_a_weigher_delta_to_the_input_snapshot() {
    // input {h1:10,h2:1}, weigher delta {h1:0,h2:5} -> h1 stays ahead at
    // 10 vs h2's 6, even though h2's delta is the larger number.
    let input = Activation::from_iter([("h1".to_string(), 10.0), ("h2".to_string(), 1.0)]);
    let delta = Activation::from_iter([("h1".to_string(), 0.0), ("h2".to_string(), 5.0)]);

    let absolute = absolute_post_step_scores(false, &input, &delta);

    assert_eq!(absolute.get("h1"), Some(10.0));
    assert_eq!(absolute.get("h2"), Some(6.0));
}

#[test]
fn absolute_post_step_scores_passes_a_filters_output_through_unchanged() {
    let input = Activation::from_iter([("h1".to_string(), 10.0), ("h2".to_string(), 1.0)]);
    let survivors = Activation::from_iter([("h1".to_string(), 10.0)]);

    let absolute = absolute_post_step_scores(true, &input, &survivors);

    assert_eq!(absolute.get("h1"), Some(10.0));
    assert_eq!(absolute.get("h2"), None);
}

#[test]
fn compile_rejects_duplicate_step_names() {
    let spec = PipelineSpec {
        name: "default".to_string(),
        kind: PipelineKind::FilterWeigher,
        create_decisions: true,
        filters: vec![
            StepSpec {
                plugin_name: "threshold".to_string(),
                alias: "dup".to_string(),
                raw_options: json!({"below": 1.0}),
                scope: None,
            },
            StepSpec {
                plugin_name: "threshold".to_string(),
                alias: "dup".to_string(),
                raw_options: json!({"below": 1.0}),
                scope: None,
            },
        ],
        weighers: vec![],
    };

    let err = CompiledPipeline::compile(&spec, &registry(), &ctx()).unwrap_err();
    assert!(matches!(err, InitError::DuplicateStepName(name) if name == "dup"));
}
