// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Pipeline configuration (spec.md §3.1 "Pipeline", §6 "Configuration").
//!
//! These are the parsed-but-not-yet-compiled descriptors the pipeline
//! engine (`fleetsched-engine`) resolves against its plugin registry. They
//! carry no behavior of their own.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Type tag for a pipeline. Only one variant exists today but the tag is
/// kept explicit per spec.md §3.1 ("plus a type tag").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineKind {
    FilterWeigher,
}

/// A host selector scope: narrows or bypasses a step based on a host
/// capability lookup (spec.md §4.1 "Host selectors").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSelector {
    pub subject: String,
    pub infix: String,
    pub operation: HostSelectorOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostSelectorOp {
    Intersection,
    Difference,
}

/// A spec (request-attribute) selector scope (spec.md §4.1 "Spec selectors").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecSelector {
    pub subject: String,
    pub infix: String,
    pub action: SpecSelectorAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecSelectorAction {
    Skip,
    Run,
}

/// A step's scope: at most one host selector set and one spec selector
/// set may apply to a step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host_selectors: Vec<HostSelector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spec_selectors: Vec<SpecSelector>,
}

impl ScopeSpec {
    pub fn is_empty(&self) -> bool {
        self.host_selectors.is_empty() && self.spec_selectors.is_empty()
    }
}

/// One step entry in a pipeline descriptor (spec.md §6 "stepSpec").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSpec {
    pub plugin_name: String,
    pub alias: String,
    #[serde(default)]
    pub raw_options: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeSpec>,
}

/// A full pipeline descriptor (spec.md §6 "Pipeline").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSpec {
    pub name: String,
    pub kind: PipelineKind,
    #[serde(default)]
    pub create_decisions: bool,
    pub filters: Vec<StepSpec>,
    pub weighers: Vec<StepSpec>,
}

impl PipelineSpec {
    /// All step specs in execution order: filters then weighers is NOT
    /// assumed — a pipeline interleaves according to declared order within
    /// each list, but spec.md does not mandate filters-before-weighers
    /// globally, only that each step knows whether it filters or weighs.
    /// Callers needing the full ordered step list build it from the
    /// runbook-level ordering metadata; this crate exposes both lists
    /// separately since that's how they're configured (spec.md §6).
    pub fn step_count(&self) -> usize {
        self.filters.len() + self.weighers.len()
    }
}

/// TTL controller configuration (spec.md §6, §4.6). Default 24h.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TtlConfig {
    #[serde(with = "duration_secs")]
    pub ttl_after_decision: Duration,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            ttl_after_decision: Duration::from_secs(24 * 3600),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        d.as_secs().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
