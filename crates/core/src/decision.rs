// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! The decision record (spec.md §3.1 "Decision record (D)").
//!
//! A `DecisionRecord` is the persisted artifact created per scheduled
//! resource (keyed by `resource_id`). Each reconciliation of that resource
//! (an initial placement, then perhaps a resize or live-migration retry)
//! appends one `Decision` entry; `decision_count()` and `results()` read
//! off that list rather than duplicating it in a separate field.

use crate::request::Intent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One step's recorded output within a decision's pipeline trace
/// (spec.md §3.1 "pipeline {name, ordered list of step outputs}").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutputRecord {
    pub name: String,
    pub output: HashMap<String, f64>,
}

/// Qualitative label on the score gap between #1 and #2 (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Certainty {
    Perfect,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Certainty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Certainty::Perfect => "perfect",
            Certainty::High => "high",
            Certainty::Medium => "medium",
            Certainty::Low => "low",
        };
        write!(f, "{}", s)
    }
}

/// Lifecycle state of a single decision (spec.md §3.1 "status: state").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionState {
    Resolved,
    Error,
}

/// The reconciled status subresource of a single decision
/// (spec.md §3.1, §3.2 "mutated once by the reconciler").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionStatus {
    pub state: DecisionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Host -> score, ordered highest-to-lowest (spec.md §3.1 `finalScores`).
    #[serde(default)]
    pub final_scores: Vec<(String, f64)>,
    /// Host -> ordered list of step names that dropped it.
    #[serde(default)]
    pub deleted_hosts: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub critical_steps: Vec<String>,
}

impl DecisionStatus {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            state: DecisionState::Error,
            error: Some(message.into()),
            final_scores: Vec::new(),
            deleted_hosts: HashMap::new(),
            description: String::new(),
            critical_steps: Vec::new(),
        }
    }
}

/// One reconciled scheduling attempt for a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub requested_at_ms: u64,
    pub event_type: Intent,
    /// Host -> initial score (spec.md §3.1 `input`).
    pub input: HashMap<String, f64>,
    pub pipeline_name: String,
    pub steps: Vec<StepOutputRecord>,
    pub status: DecisionStatus,
}

/// The persisted decision record (spec.md §3.1 "Decision record (D)").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: crate::id::DecisionId,
    pub flavor: crate::request::Flavor,
    pub availability_zone: String,
    /// Opaque correlation id for chain analysis (spec.md §3.1 `resource_id`).
    pub resource_id: String,
    pub created_at_ms: u64,
    /// Oldest first.
    pub decisions: Vec<Decision>,
    /// Rendered chain summary across peer records (spec.md §3.1
    /// `globalDescription`); `None` until the chain analyser has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_description: Option<String>,
    /// Optimistic-concurrency version (spec.md §5 "resource version").
    #[serde(default)]
    pub resource_version: u64,
}

impl DecisionRecord {
    pub fn decision_count(&self) -> usize {
        self.decisions.len()
    }

    pub fn results(&self) -> &[Decision] {
        &self.decisions
    }

    /// The most recently appended decision, if any.
    pub fn latest(&self) -> Option<&Decision> {
        self.decisions.last()
    }

    /// Reference time for TTL purposes (spec.md §4.6): the last decision's
    /// `requestedAt`, or the record's creation time when there are none.
    pub fn reference_time_ms(&self) -> u64 {
        self.decisions
            .last()
            .map(|d| d.requested_at_ms)
            .unwrap_or(self.created_at_ms)
    }
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
