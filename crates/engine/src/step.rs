// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Step abstraction (C1): the `Filter` and `Weigher` capability sets and
//! the helpers their implementations use to satisfy spec.md §4.1's
//! post-conditions.

use async_trait::async_trait;
use fleetsched_core::{Activation, CoreError, Request};
use std::collections::HashMap;

/// A recoverable or fatal error raised by a step's `run` (spec.md §4.1
/// "run(traceLog, request) → StepResult | {RecoverableErr, FatalErr}").
#[derive(Debug, Clone, PartialEq)]
pub enum StepRunError {
    /// Logged and skipped; the pipeline continues with unchanged activations.
    Recoverable(String),
    /// Aborts the pipeline run.
    Fatal(String),
}

impl std::fmt::Display for StepRunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepRunError::Recoverable(m) => write!(f, "recoverable: {m}"),
            StepRunError::Fatal(m) => write!(f, "fatal: {m}"),
        }
    }
}

/// A step's run outcome: its activation map plus any named per-host
/// statistics it chooses to emit for the pipeline monitor's statistical
/// impact computation (spec.md §3.1 "per-named-statistic host-value
/// maps", §4.3 "statistical impact"). Most steps emit no statistics;
/// `StepOutput::new` covers that common case.
#[derive(Debug, Clone, Default)]
pub struct StepOutput {
    pub activations: Activation,
    pub stats: HashMap<String, HashMap<String, f64>>,
}

impl StepOutput {
    pub fn new(activations: Activation) -> Self {
        Self { activations, stats: HashMap::new() }
    }

    pub fn with_stats(activations: Activation, stats: HashMap<String, HashMap<String, f64>>) -> Self {
        Self { activations, stats }
    }
}

/// A pruning step. `run` MUST only remove keys from its input; surviving
/// values MUST be unchanged (spec.md §4.1 "Filter subtype").
#[async_trait]
pub trait Filter: Send + Sync {
    fn name(&self) -> &str;
    async fn run(&self, request: &Request, input: &Activation) -> Result<StepOutput, StepRunError>;
}

/// A ranking step. `run` MUST return an activation map with the same keys
/// as its input; values may be adjusted (spec.md §4.1 "Weigher subtype").
#[async_trait]
pub trait Weigher: Send + Sync {
    fn name(&self) -> &str;
    async fn run(&self, request: &Request, input: &Activation) -> Result<StepOutput, StepRunError>;
}

/// Helper for filter implementations: a copy of the current activations to
/// mutate by deletion (spec.md §4.1 "IncludeAllHostsFromRequest").
pub fn include_all_hosts_from_request(input: &Activation) -> Activation {
    input.clone()
}

/// The weigher sentinel for "no effect on this host's score" (spec.md §4.1
/// "NoEffect()").
pub fn no_effect() -> f64 {
    0.0
}

/// Linear interpolation from `[in_low, in_high]` onto `[out_low, out_high]`,
/// clamped outside the input range. Returns `CoreError::DegenerateScale`
/// when `in_low == in_high` (spec.md §4.1 "ValidationError when
/// inLow==inHigh").
pub fn min_max_scale(
    x: f64,
    in_low: f64,
    in_high: f64,
    out_low: f64,
    out_high: f64,
) -> Result<f64, CoreError> {
    if in_low == in_high {
        return Err(CoreError::DegenerateScale { in_low });
    }
    let clamped = x.clamp(in_low.min(in_high), in_low.max(in_high));
    let t = (clamped - in_low) / (in_high - in_low);
    Ok(out_low + t * (out_high - out_low))
}

/// Marker type naming the `MinMaxScale`/`NoEffect` free functions above, kept
/// as a namespacing handle so callers can write `step::MinMaxScale::apply`
/// the way spec.md §4.1 names the utility.
pub struct MinMaxScale;

impl MinMaxScale {
    pub fn apply(
        x: f64,
        in_low: f64,
        in_high: f64,
        out_low: f64,
        out_high: f64,
    ) -> Result<f64, CoreError> {
        min_max_scale(x, in_low, in_high, out_low, out_high)
    }
}

/// Marker type naming the `NoEffect` sentinel.
pub struct NoEffect;

impl NoEffect {
    pub fn value() -> f64 {
        no_effect()
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
