// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Pipeline monitor (C3, spec.md §4.3). Observes but never alters a step's
//! result: duration, host attrition, weight deltas, reordering origin and
//! statistical impact, all exported as `scheduler_pipeline_*` metrics
//! (spec.md §6 "Metrics").

use fleetsched_core::Request;
use std::collections::HashMap;
use std::time::Duration;

/// One entry of the top-k reordering-origin capture (spec.md §4.3
/// "reordering origin").
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderingEntry {
    pub output_position: usize,
    pub host: String,
    pub input_position: Option<usize>,
}

const TOP_K: usize = 5;

fn index_by_host(order: &[(String, f64)]) -> HashMap<&str, usize> {
    order
        .iter()
        .enumerate()
        .map(|(i, (h, _))| (h.as_str(), i))
        .collect()
}

/// Top-k output positions and the index each winner held in the input
/// order (spec.md §4.3). Both orders must be sorted by post-step
/// *absolute score* — for a weigher, that means base + delta, not the
/// delta a step returns on its own.
pub fn reordering_origins(
    input_order: &[(String, f64)],
    output_order: &[(String, f64)],
) -> Vec<ReorderingEntry> {
    let old_idx = index_by_host(input_order);
    output_order
        .iter()
        .take(TOP_K)
        .enumerate()
        .map(|(output_position, (host, _))| ReorderingEntry {
            output_position,
            host: host.clone(),
            input_position: old_idx.get(host.as_str()).copied(),
        })
        .collect()
}

/// Statistical impact for one named statistic (spec.md §4.3):
/// `Σ_{i<k} |oldIdx(host_i) − newIdx(host_i)| · |stat[old@newIdx] − stat[host_i]|`.
/// Errors if an output host is absent from the input order. Like
/// `reordering_origins`, `output_order` must be ranked by post-step
/// absolute score.
pub fn statistical_impact(
    input_order: &[(String, f64)],
    output_order: &[(String, f64)],
    stat: &HashMap<String, f64>,
) -> Result<f64, String> {
    let old_idx = index_by_host(input_order);
    let mut total = 0.0;
    for (new_idx, (host, _)) in output_order.iter().enumerate().take(TOP_K) {
        let old_i = *old_idx
            .get(host.as_str())
            .ok_or_else(|| format!("host '{host}' in output not found in input order"))?;
        let old_host_at_new_idx = input_order.get(new_idx).map(|(h, _)| h.as_str());
        let stat_old = old_host_at_new_idx.and_then(|h| stat.get(h)).copied().unwrap_or(0.0);
        let stat_new = stat.get(host).copied().unwrap_or(0.0);
        total += (old_i as f64 - new_idx as f64).abs() * (stat_old - stat_new).abs();
    }
    Ok(total)
}

/// Top-level per-request characteristic flags (spec.md §4.3 "rebuild?,
/// resize?, live?, vmware?").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineCounters {
    pub rebuild: bool,
    pub resize: bool,
    pub live: bool,
    pub vmware: bool,
}

impl PipelineCounters {
    /// Derives the four flags from the request's scheduler hints and
    /// flavor (spec.md §6's `_nova_check_type` hint and hypervisor-related
    /// extra specs).
    pub fn from_request(request: &Request) -> Self {
        let hint_contains = |needle: &str| {
            request
                .scheduler_hints
                .get("_nova_check_type")
                .map(|values| values.iter().any(|v| v == needle))
                .unwrap_or(false)
        };

        Self {
            rebuild: hint_contains("rebuild"),
            resize: hint_contains("resize"),
            live: hint_contains("live_migration") || hint_contains("live-migration"),
            vmware: request
                .flavor
                .extra_specs
                .get("hypervisor_type")
                .map(|v| v.eq_ignore_ascii_case("vmware"))
                .unwrap_or(false),
        }
    }

    /// Emits the top-level pipeline counter (spec.md §4.3).
    pub fn record(&self, pipeline_name: &str) {
        metrics::counter!(
            "scheduler_pipeline_runs_total",
            "pipeline" => pipeline_name.to_string(),
            "rebuild" => self.rebuild.to_string(),
            "resize" => self.resize.to_string(),
            "live" => self.live.to_string(),
            "vmware" => self.vmware.to_string(),
        )
        .increment(1);
    }
}

/// Records per-step observability data for one pipeline run. Never
/// mutates the activation maps it observes (spec.md §4.3 "Observes but
/// does not alter results").
#[derive(Default)]
pub struct PipelineMonitor;

impl PipelineMonitor {
    pub fn new() -> Self {
        Self
    }

    /// Records one step's duration, attrition and weight-delta metrics.
    /// `output` must be the post-step *absolute* score map (base + delta
    /// for a weigher), not a weigher's raw delta activations — otherwise
    /// the weight-delta gauge below computes `delta - base` instead of
    /// the applied delta.
    pub fn record_step(
        &self,
        step_name: &str,
        duration: Duration,
        input: &fleetsched_core::Activation,
        output: &fleetsched_core::Activation,
    ) {
        metrics::histogram!(
            "scheduler_pipeline_step_duration_seconds",
            "step" => step_name.to_string(),
        )
        .record(duration.as_secs_f64());

        let removed = input.len().saturating_sub(output.len());
        metrics::histogram!(
            "scheduler_pipeline_hosts_removed",
            "step" => step_name.to_string(),
        )
        .record(removed as f64);

        for host in output.keys() {
            let before = input.get(host).unwrap_or(0.0);
            let after = output.get(host).unwrap_or(0.0);
            metrics::gauge!(
                "scheduler_pipeline_weight_delta",
                "step" => step_name.to_string(),
                "host" => host.to_string(),
            )
            .set(after - before);
        }
    }

    /// Records the top-k reordering-origin entries for a step.
    pub fn record_reordering(&self, step_name: &str, entries: &[ReorderingEntry]) {
        for entry in entries {
            metrics::gauge!(
                "scheduler_pipeline_reordering_origin",
                "step" => step_name.to_string(),
                "outidx" => entry.output_position.to_string(),
                "host" => entry.host.clone(),
            )
            .set(entry.input_position.map(|i| i as f64).unwrap_or(-1.0));
        }
    }

    /// Records a named statistic's impact value for a step.
    pub fn record_statistical_impact(&self, step_name: &str, stat_name: &str, value: f64) {
        metrics::histogram!(
            "scheduler_pipeline_statistical_impact",
            "step" => step_name.to_string(),
            "stat" => stat_name.to_string(),
        )
        .record(value);
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
