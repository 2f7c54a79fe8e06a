// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Compiled-pipeline table (spec.md §5 "Shared resource policy", §9
//! "Compiled-pipeline table uses atomic pointer replacement").
//!
//! Writes occur only from the configuration watcher; readers take an
//! `Arc` snapshot so an in-flight run keeps completing against the
//! pipeline form it started with even if a newer one is published mid-run.

use crate::pipeline_engine::CompiledPipeline;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Pipeline compiled forms keyed by name, published atomically. Also
/// tracks which pipeline names a non-critical init error left running a
/// stale compiled form under (spec.md §4.2 point 2, §7 "controller marks
/// pipeline degraded").
#[derive(Default)]
pub struct PipelineTable {
    pipelines: RwLock<HashMap<String, Arc<CompiledPipeline>>>,
    degraded: RwLock<HashSet<String>>,
}

impl PipelineTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes (or replaces) a pipeline's compiled form. A successful
    /// compile always clears any prior degraded flag for this name.
    pub fn publish(&self, pipeline: CompiledPipeline) {
        let name = pipeline.name.clone();
        self.degraded.write().remove(&name);
        self.pipelines.write().insert(name, Arc::new(pipeline));
    }

    /// Takes a snapshot of the named pipeline's current compiled form.
    pub fn snapshot(&self, name: &str) -> Option<Arc<CompiledPipeline>> {
        self.pipelines.read().get(name).cloned()
    }

    pub fn remove(&self, name: &str) -> Option<Arc<CompiledPipeline>> {
        self.degraded.write().remove(name);
        self.pipelines.write().remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.pipelines.read().keys().cloned().collect()
    }

    /// Flags `name` degraded: a non-critical init error failed to refresh
    /// its compiled form, but any pipeline already published under this
    /// name keeps running.
    pub fn mark_degraded(&self, name: &str) {
        self.degraded.write().insert(name.to_string());
    }

    pub fn is_degraded(&self, name: &str) -> bool {
        self.degraded.read().contains(name)
    }
}

#[cfg(test)]
#[path = "pipeline_table_tests.rs"]
mod tests;
