// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

use super::*;
use fleetsched_core::{Flavor, Intent};

fn order(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
    pairs.iter().map(|(h, s)| (h.to_string(), *s)).collect()
}

fn dummy_request() -> Request {
    Request {
        hosts: vec!["host1".to_string()],
        input_scores: Default::default(),
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

#[test]
fn reordering_origins_tracks_input_position() {
    let input = order(&[("host1", 1.0), ("host2", 2.0), ("host3", 3.0)]);
    let output = order(&[("host3", 3.0), ("host1", 1.5), ("host2", 0.5)]);

    let entries = reordering_origins(&input, &output);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].host, "host3");
    assert_eq!(entries[0].input_position, Some(2));
    assert_eq!(entries[1].host, "host1");
    assert_eq!(entries[1].input_position, Some(0));
}

#[test]
fn statistical_impact_is_zero_when_order_unchanged() {
    let input = order(&[("host1", 2.0), ("host2", 1.0)]);
    let output = input.clone();
    let mut stat = HashMap::new();
    stat.insert("host1".to_string(), 5.0);
    stat.insert("host2".to_string(), 3.0);

    let impact = statistical_impact(&input, &output, &stat).unwrap();
    assert_eq!(impact, 0.0);
}

#[test]
fn statistical_impact_errors_on_unknown_output_host() {
    let input = order(&[("host1", 2.0)]);
    let output = order(&[("host2", 2.0)]);
    let stat = HashMap::new();

    let err = statistical_impact(&input, &output, &stat).unwrap_err();
    assert!(err.contains("host2"));
}

#[test]
fn pipeline_counters_from_request_detects_rebuild_hint() {
    let mut request = dummy_request();
    request
        .scheduler_hints
        .insert("_nova_check_type".to_string(), vec!["rebuild".to_string()]);

    let counters = PipelineCounters::from_request(&request);
    assert!(counters.rebuild);
    assert!(!counters.resize);
}
