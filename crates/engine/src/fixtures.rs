// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Test-fixture plugins (spec.md §1.1 Non-goal: "Defining individual
//! placement policies" is the core's job to avoid, not this test
//! harness's). These exist only to exercise the engine end to end without
//! depending on a concrete placement policy crate.

use crate::registry::PluginContext;
use crate::step::{Filter, StepOutput, StepRunError, Weigher};
use async_trait::async_trait;
use fleetsched_core::{Activation, CoreError, Request};

/// Removes every host whose score is below a configured threshold.
/// Options: `{"below": <f64>}`.
pub struct ThresholdFilter {
    name: String,
    below: f64,
}

impl ThresholdFilter {
    pub fn new(alias: impl Into<String>, options: &serde_json::Value) -> Result<Self, CoreError> {
        let below = options
            .get("below")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| CoreError::InvalidStepOptions {
                step: "threshold_filter".to_string(),
                message: "missing numeric 'below' option".to_string(),
            })?;
        Ok(Self {
            name: alias.into(),
            below,
        })
    }

    pub fn factory(
        alias: &str,
        options: &serde_json::Value,
        _ctx: &PluginContext,
    ) -> Result<Box<dyn Filter>, crate::error::InitError> {
        Self::new(alias, options)
            .map(|f| Box::new(f) as Box<dyn Filter>)
            .map_err(|e| crate::error::InitError::InvalidOptions {
                step: alias.to_string(),
                message: e.to_string(),
            })
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
    pub fn new(alias: impl Into<String>, options: &serde_json::Value) -> Result<Self, CoreError> {
        let offset = options
            .get("offset")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| CoreError::InvalidStepOptions {
                step: "constant_offset_weigher".to_string(),
                message: "missing numeric 'offset' option".to_string(),
            })?;
        Ok(Self {
            name: alias.into(),
            offset,
        })
    }

    pub fn factory(
        alias: &str,
        options: &serde_json::Value,
        _ctx: &PluginContext,
    ) -> Result<Box<dyn Weigher>, crate::error::InitError> {
        Self::new(alias, options)
            .map(|w| Box::new(w) as Box<dyn Weigher>)
            .map_err(|e| crate::error::InitError::InvalidOptions {
                step: alias.to_string(),
                message: e.to_string(),
            })
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

/// A no-effect weigher that emits each host's scaled score as a named
/// "utilization" statistic, exercising the pipeline monitor's statistical
/// impact computation (spec.md §4.3). Options: `{"scale": <f64>}`.
pub struct UtilizationWeigher {
    name: String,
    scale: f64,
}

impl UtilizationWeigher {
    pub fn new(alias: impl Into<String>, options: &serde_json::Value) -> Result<Self, CoreError> {
        let scale = options
            .get("scale")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| CoreError::InvalidStepOptions {
                step: "utilization_weigher".to_string(),
                message: "missing numeric 'scale' option".to_string(),
            })?;
        Ok(Self {
            name: alias.into(),
            scale,
        })
    }

    pub fn factory(
        alias: &str,
        options: &serde_json::Value,
        _ctx: &PluginContext,
    ) -> Result<Box<dyn Weigher>, crate::error::InitError> {
        Self::new(alias, options)
            .map(|w| Box::new(w) as Box<dyn Weigher>)
            .map_err(|e| crate::error::InitError::InvalidOptions {
                step: alias.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl Weigher for UtilizationWeigher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, _request: &Request, input: &Activation) -> Result<StepOutput, StepRunError> {
        let mut deltas = Activation::new();
        let mut utilization = std::collections::HashMap::new();
        for (host, score) in input.iter() {
            deltas.set(host, 0.0);
            utilization.insert(host.to_string(), score * self.scale);
        }
        let mut stats = std::collections::HashMap::new();
        stats.insert("utilization".to_string(), utilization);
        Ok(StepOutput::with_stats(deltas, stats))
    }
}

#[cfg(test)]
#[path = "fixtures_tests.rs"]
mod tests;
