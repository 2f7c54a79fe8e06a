// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

use super::*;
use fleetsched_core::{DecisionState, DecisionStatus, Intent};
use std::collections::HashMap;

fn resolved_decision(requested_at_ms: u64, winner: &str) -> Decision {
    Decision {
        requested_at_ms,
        event_type: Intent::InitialPlacement,
        input: HashMap::new(),
        pipeline_name: "default".to_string(),
        steps: Vec::new(),
        status: DecisionStatus {
            state: DecisionState::Resolved,
            error: None,
            final_scores: vec![(winner.to_string(), 1.0)],
            deleted_hosts: HashMap::new(),
            description: String::new(),
            critical_steps: Vec::new(),
        },
    }
}

#[test]
fn chain_with_loop_renders_expected_string() {
    let decisions = vec![
        resolved_decision(0, "host1"),
        resolved_decision(7_200_000, "host2"),
        resolved_decision(10_800_000, "host1"),
        resolved_decision(18_000_000, "host3"),
    ];

    let rendered = render_chain(&decisions).unwrap();
    assert_eq!(
        rendered,
        "chain (loop detected): host1 (2h) -> host2 (1h) -> host1 (2h) -> host3 (0m)"
    );
}

#[test]
fn chain_without_loop_has_no_prefix_marker() {
    let decisions = vec![
        resolved_decision(0, "host1"),
        resolved_decision(3_600_000, "host2"),
    ];
    let rendered = render_chain(&decisions).unwrap();
    assert!(rendered.starts_with("chain: "));
    assert!(!rendered.contains("loop detected"));
}

#[test]
fn consecutive_identical_winners_collapse_into_one_segment() {
    let decisions = vec![
        resolved_decision(0, "host1"),
        resolved_decision(1_800_000, "host1"),
        resolved_decision(3_600_000, "host2"),
    ];
    let rendered = render_chain(&decisions).unwrap();
    assert_eq!(rendered, "chain: host1 (1h; 2 decisions) -> host2 (0m)");
}

#[test]
fn empty_history_has_no_chain() {
    assert_eq!(render_chain(&[]), None);
}

#[test]
fn single_decision_chain_has_zero_duration() {
    let decisions = vec![resolved_decision(0, "host1")];
    assert_eq!(render_chain(&decisions).unwrap(), "chain: host1 (0m)");
}
