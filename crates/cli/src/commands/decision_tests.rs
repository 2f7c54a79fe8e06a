// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

use super::*;
use fleetsched_core::{Decision, DecisionRecord, DecisionState, DecisionStatus, Flavor, Intent};
use fleetsched_storage::JsonFileDecisionStore;
use std::collections::HashMap;
use tempfile::tempdir;

fn sample_record(resource_id: &str) -> DecisionRecord {
    DecisionRecord {
        id: DecisionId::new(format!("{resource_id}-decision")),
        flavor: Flavor { vcpus: 1, memory_mb: 512, disk_gb: 10, extra_specs: HashMap::new() },
        availability_zone: "nova".to_string(),
        resource_id: resource_id.to_string(),
        created_at_ms: 1_000,
        decisions: vec![Decision {
            requested_at_ms: 1_000,
            event_type: Intent::InitialPlacement,
            input: HashMap::new(),
            pipeline_name: "demo".to_string(),
            steps: Vec::new(),
            status: DecisionStatus {
                state: DecisionState::Resolved,
                error: None,
                final_scores: vec![("host1".to_string(), 1.0)],
                deleted_hosts: HashMap::new(),
                description: "host1 wins".to_string(),
                critical_steps: Vec::new(),
            },
        }],
        global_description: Some("chain: host1".to_string()),
        resource_version: 0,
    }
}

#[tokio::test]
async fn list_reports_every_persisted_record() {
    let dir = tempdir().unwrap();
    let store = JsonFileDecisionStore::open(dir.path()).unwrap();
    store.create(sample_record("inst-a")).await.unwrap();
    store.create(sample_record("inst-b")).await.unwrap();

    run(
        DecisionArgs { command: DecisionCommand::List },
        dir.path().to_path_buf(),
        OutputFormat::Text,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn show_reports_not_found_for_an_unknown_id() {
    let dir = tempdir().unwrap();
    let result = run(
        DecisionArgs { command: DecisionCommand::Show { id: "missing".to_string() } },
        dir.path().to_path_buf(),
        OutputFormat::Text,
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn chain_prints_the_rendered_global_description() {
    let dir = tempdir().unwrap();
    let store = JsonFileDecisionStore::open(dir.path()).unwrap();
    let record = store.create(sample_record("inst-a")).await.unwrap();

    run(
        DecisionArgs { command: DecisionCommand::Chain { id: record.id.as_str().to_string() } },
        dir.path().to_path_buf(),
        OutputFormat::Text,
    )
    .await
    .unwrap();
}
