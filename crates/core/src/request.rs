// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Request value object (spec.md §3.1).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Purpose of a scheduling request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    InitialPlacement,
    LiveMigration,
    Resize,
    Evacuate,
}

impl Intent {
    /// Derive an intent from the `_nova_check_type` scheduler hint
    /// (spec.md §6, "Request schema"). Unknown or absent hints default to
    /// initial placement.
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint {
            Some("evacuate") => Intent::Evacuate,
            Some("rebuild") | Some("resize") => Intent::Resize,
            Some("live_migration") | Some("live-migration") => Intent::LiveMigration,
            _ => Intent::InitialPlacement,
        }
    }
}

/// Flavor (instance type) attributes carried by a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flavor {
    pub vcpus: u32,
    pub memory_mb: u32,
    pub disk_gb: u32,
    #[serde(default)]
    pub extra_specs: HashMap<String, String>,
}

/// A scheduling request. Immutable once admitted (spec.md §3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Candidate host set.
    pub hosts: Vec<String>,
    /// Initial per-host scores; hosts absent here default to `0.0`.
    pub input_scores: HashMap<String, f64>,
    pub flavor: Flavor,
    #[serde(default)]
    pub image_properties: HashMap<String, String>,
    pub project_id: String,
    pub availability_zone: String,
    #[serde(default)]
    pub scheduler_hints: HashMap<String, Vec<String>>,
    pub instance_uuid: String,
    pub intent: Intent,
}

impl Request {
    /// Correlation id used to group decisions into a chain (spec.md §3.1,
    /// `resource_id`). For the core scheduling request this is the
    /// instance uuid.
    pub fn resource_id(&self) -> &str {
        &self.instance_uuid
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
