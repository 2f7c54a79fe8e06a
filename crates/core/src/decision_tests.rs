// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

use super::*;
use crate::id::DecisionId;
use crate::request::{Flavor, Intent};

fn flavor() -> Flavor {
    Flavor {
        vcpus: 2,
        memory_mb: 2048,
        disk_gb: 20,
        extra_specs: HashMap::new(),
    }
}

fn empty_record() -> DecisionRecord {
    DecisionRecord {
        id: DecisionId::new("d1"),
        flavor: flavor(),
        availability_zone: "az1".into(),
        resource_id: "res-1".into(),
        created_at_ms: 1_000,
        decisions: Vec::new(),
        global_description: None,
        resource_version: 0,
    }
}

#[test]
fn reference_time_falls_back_to_creation_when_no_decisions() {
    let record = empty_record();
    assert_eq!(record.reference_time_ms(), 1_000);
}

#[test]
fn reference_time_uses_latest_decision_requested_at() {
    let mut record = empty_record();
    record.decisions.push(Decision {
        requested_at_ms: 2_000,
        event_type: Intent::InitialPlacement,
        input: HashMap::new(),
        pipeline_name: "default".into(),
        steps: Vec::new(),
        status: DecisionStatus::error("No hosts provided in input"),
    });
    record.decisions.push(Decision {
        requested_at_ms: 5_000,
        event_type: Intent::Resize,
        input: HashMap::new(),
        pipeline_name: "default".into(),
        steps: Vec::new(),
        status: DecisionStatus::error("No hosts provided in input"),
    });
    assert_eq!(record.reference_time_ms(), 5_000);
    assert_eq!(record.decision_count(), 2);
}

#[test]
fn certainty_display_matches_lowercase_labels() {
    assert_eq!(Certainty::Perfect.to_string(), "perfect");
    assert_eq!(Certainty::High.to_string(), "high");
    assert_eq!(Certainty::Medium.to_string(), "medium");
    assert_eq!(Certainty::Low.to_string(), "low");
}
