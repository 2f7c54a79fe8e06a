// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Plugin registry (spec.md §6 "Plugin registry", §4.2 "Resolves each
//! plugin name against a registry").
//!
//! Concrete filter/weigher policies are an external collaborator
//! (spec.md §1.1): this registry only holds factories, so a policy crate
//! built outside this workspace can register its plugins the same way the
//! two test-fixture plugins in `fixtures.rs` do.

use crate::error::InitError;
use crate::step::{Filter, Weigher};
use fleetsched_adapters::{HostCapabilityLookup, ReservationLookup};
use std::collections::HashMap;
use std::sync::Arc;

/// Context handed to every plugin factory at init time, carrying the
/// external collaborators plugins may consult (spec.md §6 "Inventory
/// lookups"). The core itself never calls these lookups directly.
#[derive(Clone)]
pub struct PluginContext {
    pub host_capabilities: Arc<dyn HostCapabilityLookup>,
    pub reservations: Arc<dyn ReservationLookup>,
}

pub type FilterFactory =
    Arc<dyn Fn(&str, &serde_json::Value, &PluginContext) -> Result<Box<dyn Filter>, InitError> + Send + Sync>;
pub type WeigherFactory =
    Arc<dyn Fn(&str, &serde_json::Value, &PluginContext) -> Result<Box<dyn Weigher>, InitError> + Send + Sync>;

/// Name -> factory map populated at process init (spec.md §6). Read-only
/// after startup (spec.md §5 "Shared resource policy").
#[derive(Default, Clone)]
pub struct PluginRegistry {
    filters: HashMap<String, FilterFactory>,
    weighers: HashMap<String, WeigherFactory>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_filter(&mut self, plugin_name: impl Into<String>, factory: FilterFactory) {
        self.filters.insert(plugin_name.into(), factory);
    }

    pub fn register_weigher(&mut self, plugin_name: impl Into<String>, factory: WeigherFactory) {
        self.weighers.insert(plugin_name.into(), factory);
    }

    pub fn build_filter(
        &self,
        plugin_name: &str,
        alias: &str,
        raw_options: &serde_json::Value,
        ctx: &PluginContext,
    ) -> Result<Box<dyn Filter>, InitError> {
        let factory = self
            .filters
            .get(plugin_name)
            .ok_or_else(|| InitError::UnknownPlugin(plugin_name.to_string()))?;
        factory(alias, raw_options, ctx)
    }

    pub fn build_weigher(
        &self,
        plugin_name: &str,
        alias: &str,
        raw_options: &serde_json::Value,
        ctx: &PluginContext,
    ) -> Result<Box<dyn Weigher>, InitError> {
        let factory = self
            .weighers
            .get(plugin_name)
            .ok_or_else(|| InitError::UnknownPlugin(plugin_name.to_string()))?;
        factory(alias, raw_options, ctx)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
