// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Demo plugin pack and inventory stand-ins for the `fleetsched` CLI.
//!
//! spec.md §1.1 treats concrete filter/weigher policies and the fleet
//! inventory source as external collaborators the core never ships. This
//! module is the CLI's own small reference pack — grounded on
//! `fleetsched-engine`'s `fixtures` test plugins but written as its own
//! code rather than pulling in a test-only feature from a production
//! binary — so `fleetsched schedule` has something runnable to demo
//! against without depending on a real placement-policy crate.

use async_trait::async_trait;
use fleetsched_adapters::{HostCapabilities, HostCapabilityLookup, Reservation, ReservationLookup};
use fleetsched_core::{Activation, CoreError, Request};
use fleetsched_engine::{Filter, InitError, PluginContext, PluginRegistry, StepOutput, StepRunError, Weigher};
use std::sync::Arc;

/// Drops every host scoring below a configured threshold. Options:
/// `{"below": <f64>}`.
pub struct ThresholdFilter {
    name: String,
    below: f64,
}

impl ThresholdFilter {
    fn new(alias: impl Into<String>, options: &serde_json::Value) -> Result<Self, CoreError> {
        let below = options
            .get("below")
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| CoreError::InvalidStepOptions {
                step: "threshold_filter".to_string(),
                message: "missing numeric 'below' option".to_string(),
            })?;
        Ok(Self { name: alias.into(), below })
    }

    fn factory(
        alias: &str,
        options: &serde_json::Value,
        _ctx: &PluginContext,
    ) -> Result<Box<dyn Filter>, InitError> {
        Self::new(alias, options)
            .map(|f| Box::new(f) as Box<dyn Filter>)
            .map_err(|e| InitError::InvalidOptions { step: alias.to_string(), message: e.to_string() })
    }
}

#[async_trait]
impl Filter for ThresholdFilter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, _request: &Request, input: &Activation) -> Result<StepOutput, StepRunError> {
        let mut out = input.clone();
        for host in input.keys().map(str::to_string).collect::<Vec<_>>() {
            if input.get(&host).unwrap_or(0.0) < self.below {
                out.remove(&host);
            }
        }
        Ok(StepOutput::new(out))
    }
}

/// Adds a constant offset to every surviving host's score. Options:
/// `{"offset": <f64>}`.
pub struct ConstantOffsetWeigher {
    name: String,
    offset: f64,
}

impl ConstantOffsetWeigher {
    fn new(alias: impl Into<String>, options: &serde_json::Value) -> Result<Self, CoreError> {
        let offset = options
            .get("offset")
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| CoreError::InvalidStepOptions {
                step: "constant_offset_weigher".to_string(),
                message: "missing numeric 'offset' option".to_string(),
            })?;
        Ok(Self { name: alias.into(), offset })
    }

    fn factory(
        alias: &str,
        options: &serde_json::Value,
        _ctx: &PluginContext,
    ) -> Result<Box<dyn Weigher>, InitError> {
        Self::new(alias, options)
            .map(|w| Box::new(w) as Box<dyn Weigher>)
            .map_err(|e| InitError::InvalidOptions { step: alias.to_string(), message: e.to_string() })
    }
}

#[async_trait]
impl Weigher for ConstantOffsetWeigher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, _request: &Request, input: &Activation) -> Result<StepOutput, StepRunError> {
        let mut out = Activation::new();
        for host in input.keys() {
            out.set(host, self.offset);
        }
        Ok(StepOutput::new(out))
    }
}

/// Scales every surviving host's score into `[out_low, out_high]` using
/// `fleetsched-engine`'s `MinMaxScale` utility (spec.md §4.1). Options:
/// `{"in_low", "in_high", "out_low", "out_high"}`.
pub struct MinMaxScaleWeigher {
    name: String,
    in_low: f64,
    in_high: f64,
    out_low: f64,
    out_high: f64,
}

impl MinMaxScaleWeigher {
    fn new(alias: impl Into<String>, options: &serde_json::Value) -> Result<Self, CoreError> {
        let get = |key: &str| {
            options
                .get(key)
                .and_then(serde_json::Value::as_f64)
                .ok_or_else(|| CoreError::InvalidStepOptions {
                    step: "min_max_scale_weigher".to_string(),
                    message: format!("missing numeric '{key}' option"),
                })
        };
        let in_low = get("in_low")?;
        let in_high = get("in_high")?;
        let out_low = get("out_low")?;
        let out_high = get("out_high")?;
        // Validate eagerly so a degenerate range is rejected at load time
        // rather than on the first request (spec.md §4.1 invariants).
        fleetsched_engine::MinMaxScale::apply(in_low, in_low, in_high, out_low, out_high)?;
        Ok(Self { name: alias.into(), in_low, in_high, out_low, out_high })
    }

    fn factory(
        alias: &str,
        options: &serde_json::Value,
        _ctx: &PluginContext,
    ) -> Result<Box<dyn Weigher>, InitError> {
        Self::new(alias, options)
            .map(|w| Box::new(w) as Box<dyn Weigher>)
            .map_err(|e| InitError::InvalidOptions { step: alias.to_string(), message: e.to_string() })
    }
}

#[async_trait]
impl Weigher for MinMaxScaleWeigher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, _request: &Request, input: &Activation) -> Result<StepOutput, StepRunError> {
        // A weigher's output is a delta the engine adds to the running
        // score (`pipeline_engine::run`'s Weigher arm), so this reports
        // `scaled - score` rather than the scaled value itself.
        let mut out = Activation::new();
        for (host, score) in input.iter() {
            let scaled =
                fleetsched_engine::MinMaxScale::apply(score, self.in_low, self.in_high, self.out_low, self.out_high)
                    .map_err(|e| StepRunError::Fatal(e.to_string()))?;
            out.set(host, scaled - score);
        }
        Ok(StepOutput::new(out))
    }
}

/// Registers the demo pack under the plugin names `fleetsched schedule`
/// documents in its `--pipeline-file` help text.
pub fn register_demo_plugins(registry: &mut PluginRegistry) {
    registry.register_filter("threshold_filter", Arc::new(ThresholdFilter::factory));
    registry.register_weigher("constant_offset_weigher", Arc::new(ConstantOffsetWeigher::factory));
    registry.register_weigher("min_max_scale_weigher", Arc::new(MinMaxScaleWeigher::factory));
}

/// A host-capability lookup with nothing in it: every host selector scope
/// simply finds no match. Good enough for a CLI that has no real fleet
/// inventory to query (spec.md §1.1 lists the inventory source as an
/// external collaborator).
#[derive(Debug, Default)]
pub struct NullHostCapabilityLookup;

#[async_trait]
impl HostCapabilityLookup for NullHostCapabilityLookup {
    async fn capabilities(&self, _host: &str) -> Option<HostCapabilities> {
        None
    }
}

#[derive(Debug, Default)]
pub struct NullReservationLookup;

#[async_trait]
impl ReservationLookup for NullReservationLookup {
    async fn reservations_for_host(&self, _host: &str) -> Vec<Reservation> {
        Vec::new()
    }
}

pub fn demo_plugin_context() -> PluginContext {
    PluginContext {
        host_capabilities: Arc::new(NullHostCapabilityLookup),
        reservations: Arc::new(NullReservationLookup),
    }
}

#[cfg(test)]
#[path = "plugins_tests.rs"]
mod tests;
