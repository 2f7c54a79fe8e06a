// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

use super::*;
use tempfile::tempdir;

fn write_pipeline_file(dir: &std::path::Path, body: &serde_json::Value) -> PathBuf {
    let path = dir.join("pipeline.json");
    std::fs::write(&path, serde_json::to_vec_pretty(body).unwrap()).unwrap();
    path
}

#[test]
fn validate_accepts_a_well_formed_pipeline() {
    let dir = tempdir().unwrap();
    let file = write_pipeline_file(
        &dir.path(),
        &serde_json::json!({
            "name": "demo",
            "kind": "filter-weigher",
            "create_decisions": true,
            "filters": [{"plugin_name": "threshold_filter", "alias": "f1", "raw_options": {"below": 0.0}}],
            "weighers": []
        }),
    );

    validate(&file).unwrap();
}

#[test]
fn validate_rejects_an_unknown_plugin() {
    let dir = tempdir().unwrap();
    let file = write_pipeline_file(
        &dir.path(),
        &serde_json::json!({
            "name": "demo",
            "kind": "filter-weigher",
            "create_decisions": true,
            "filters": [{"plugin_name": "does_not_exist", "alias": "f1", "raw_options": {}}],
            "weighers": []
        }),
    );

    assert!(validate(&file).is_err());
}

#[test]
fn validate_reports_a_missing_file() {
    let missing = PathBuf::from("/nonexistent/pipeline.json");
    assert!(validate(&missing).is_err());
}
