// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

use super::*;
use fleetsched_core::{Decision, DecisionId, DecisionRecord, DecisionState, DecisionStatus, Flavor, Intent};
use fleetsched_storage::{DecisionStore, JsonFileDecisionStore};
use std::collections::HashMap;
use tempfile::tempdir;

fn expired_record() -> DecisionRecord {
    DecisionRecord {
        id: DecisionId::new("old-decision"),
        flavor: Flavor { vcpus: 1, memory_mb: 512, disk_gb: 10, extra_specs: HashMap::new() },
        availability_zone: "nova".to_string(),
        resource_id: "inst-old".to_string(),
        created_at_ms: 0,
        decisions: vec![Decision {
            requested_at_ms: 0,
            event_type: Intent::InitialPlacement,
            input: HashMap::new(),
            pipeline_name: "demo".to_string(),
            steps: Vec::new(),
            status: DecisionStatus {
                state: DecisionState::Resolved,
                error: None,
                final_scores: Vec::new(),
                deleted_hosts: HashMap::new(),
                description: String::new(),
                critical_steps: Vec::new(),
            },
        }],
        global_description: None,
        resource_version: 0,
    }
}

#[tokio::test]
async fn gc_deletes_records_older_than_the_configured_ttl() {
    let dir = tempdir().unwrap();
    let store = JsonFileDecisionStore::open(dir.path()).unwrap();
    store.create(expired_record()).await.unwrap();

    run(GcArgs { ttl_seconds: 1 }, dir.path().to_path_buf()).await.unwrap();

    let remaining = store.list().await.unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn gc_reports_no_records_when_the_store_is_empty() {
    let dir = tempdir().unwrap();
    run(GcArgs { ttl_seconds: 3600 }, dir.path().to_path_buf()).await.unwrap();
}
