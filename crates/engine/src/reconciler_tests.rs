// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

use super::*;
use fleetsched_core::Intent;
use std::collections::HashMap;

fn decision(input: &[(&str, f64)], steps: Vec<StepOutputRecord>) -> Decision {
    Decision {
        requested_at_ms: 0,
        event_type: Intent::InitialPlacement,
        input: input.iter().map(|(h, s)| (h.to_string(), *s)).collect(),
        pipeline_name: "default".to_string(),
        steps,
        status: DecisionStatus::error("unreconciled"),
    }
}

fn step(name: &str, output: &[(&str, f64)]) -> StepOutputRecord {
    StepOutputRecord {
        name: name.to_string(),
        output: output.iter().map(|(h, s)| (h.to_string(), *s)).collect(),
    }
}

#[test]
fn scenario_basic_filter_and_weigher() {
    let d = decision(
        &[("host1", 1.0), ("host2", 2.0)],
        vec![
            step("weigher", &[("host1", 0.5), ("host2", 0.5)]),
            step("filter", &[("host1", 0.0)]),
        ],
    );

    let status = reconcile(&d);
    assert_eq!(status.state, DecisionState::Resolved);
    assert_eq!(status.final_scores, vec![("host1".to_string(), 1.5)]);
    assert_eq!(
        status.deleted_hosts.get("host2"),
        Some(&vec!["filter".to_string()])
    );
    assert!(status
        .description
        .starts_with("Selected: host1 (score: 1.50), certainty: perfect, 2 hosts evaluated."));
    assert!(status.description.contains(
        "Input favored host2 (score: 2.00, now filtered), final winner was #2 in input (1.00→1.50)."
    ));
    assert!(status
        .description
        .contains("Decision driven by 1/2 pipeline step: filter."));
    assert!(status.description.contains("• weigher +0.50"));
    assert!(status.description.contains("• filter +0.00→#1"));
}

#[test]
fn scenario_empty_input() {
    let d = decision(&[], vec![]);
    let status = reconcile(&d);
    assert_eq!(status.state, DecisionState::Error);
    assert_eq!(status.error.as_deref(), Some("No hosts provided in input"));
}

#[test]
fn scenario_host_mismatch() {
    let d = decision(
        &[("h1", 1.0), ("h2", 2.0)],
        vec![step("weigher", &[("h3", 1.0)])],
    );
    let status = reconcile(&d);
    assert_eq!(status.state, DecisionState::Error);
    assert_eq!(
        status.error.as_deref(),
        Some("Host 'h3' in pipeline output not found in input")
    );
}

#[test]
fn scenario_no_survivors() {
    let d = decision(&[("h1", 1.0), ("h2", 2.0)], vec![step("filter", &[])]);
    let status = reconcile(&d);
    assert_eq!(status.state, DecisionState::Resolved);
    assert!(status.final_scores.is_empty());
    assert_eq!(
        status.description,
        "No hosts remaining after filtering, 2 hosts evaluated"
    );
}

#[test]
fn scenario_certainty_levels() {
    let high = decision(
        &[("h1", 1.0), ("h2", 1.0)],
        vec![step("weigher", &[("h1", 1.0), ("h2", 0.0)])],
    );
    assert_eq!(reconcile(&high).description.split("certainty: ").nth(1).unwrap().split(',').next().unwrap(), "high");

    let medium = decision(
        &[("h1", 1.0), ("h2", 1.0)],
        vec![step("weigher", &[("h1", 0.3), ("h2", 0.0)])],
    );
    assert_eq!(
        reconcile(&medium).description.split("certainty: ").nth(1).unwrap().split(',').next().unwrap(),
        "medium"
    );

    let low = decision(
        &[("h1", 1.0), ("h2", 1.0)],
        vec![step("weigher", &[("h1", 0.1), ("h2", 0.0)])],
    );
    assert_eq!(reconcile(&low).description.split("certainty: ").nth(1).unwrap().split(',').next().unwrap(), "low");
}

#[test]
fn reconcile_is_idempotent() {
    let d = decision(
        &[("host1", 1.0), ("host2", 2.0)],
        vec![
            step("weigher", &[("host1", 0.5), ("host2", 0.5)]),
            step("filter", &[("host1", 0.0)]),
        ],
    );
    let first = reconcile(&d);
    let second = reconcile(&d);
    assert_eq!(first, second);
}

#[test]
fn non_critical_step_removal_preserves_winner() {
    // A weigher that only separates already-non-winning hosts shouldn't be
    // critical to host1's win.
    let d = decision(
        &[("host1", 10.0), ("host2", 1.0), ("host3", 1.0)],
        vec![step("tiebreak", &[("host1", 0.0), ("host2", 0.1), ("host3", 0.0)])],
    );
    let status = reconcile(&d);
    assert!(status.critical_steps.is_empty());
    assert!(status
        .description
        .contains("Decision driven by input only (all 1 steps are non-critical)."));
}
