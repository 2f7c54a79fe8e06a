// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Pipeline engine (C2, spec.md §4.2).
//!
//! Compiles a `PipelineSpec` against a `PluginRegistry` into a
//! `CompiledPipeline`, then runs requests through it, threading the
//! activation map through each step and collecting a step result record
//! per step.

use crate::error::{InitError, RunError};
use crate::monitor::{reordering_origins, statistical_impact, PipelineCounters, PipelineMonitor};
use crate::registry::{PluginContext, PluginRegistry};
use crate::scope::ScopedStep;
use crate::step::{Filter, StepOutput, StepRunError, Weigher};
use fleetsched_core::{Activation, PipelineSpec, Request, StepOutputRecord};
use std::collections::HashSet;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// A single compiled step: either a filter or a weigher, already
/// initialized and wrapped in its scoper (spec.md §4.2 "Wraps each step in
/// its scoper (if any) and in a monitor").
pub enum CompiledStep {
    Filter(Box<dyn Filter>),
    Weigher(Box<dyn Weigher>),
}

impl CompiledStep {
    pub fn name(&self) -> &str {
        match self {
            CompiledStep::Filter(f) => f.name(),
            CompiledStep::Weigher(w) => w.name(),
        }
    }
}

/// A pipeline resolved against a registry and ready to run (spec.md §4.2
/// "Construction"). Immutable once built; published atomically by
/// `PipelineTable` per spec.md §5's "Shared resource policy".
pub struct CompiledPipeline {
    pub name: String,
    pub create_decisions: bool,
    steps: Vec<CompiledStep>,
}

impl CompiledPipeline {
    /// Resolves every step spec against `registry`, building scoped,
    /// initialized steps in declared order: filters first, then weighers,
    /// matching real-world filter/weigher scheduler pipelines (spec.md
    /// §4.2's construction order is left implicit; see DESIGN.md).
    pub fn compile(
        spec: &PipelineSpec,
        registry: &PluginRegistry,
        ctx: &PluginContext,
    ) -> Result<Self, InitError> {
        let mut seen = HashSet::new();
        let mut steps = Vec::with_capacity(spec.step_count());

        for step_spec in &spec.filters {
            if !seen.insert(step_spec.alias.clone()) {
                return Err(InitError::DuplicateStepName(step_spec.alias.clone()));
            }
            let filter = registry.build_filter(
                &step_spec.plugin_name,
                &step_spec.alias,
                &step_spec.raw_options,
                ctx,
            )?;
            let compiled = match &step_spec.scope {
                Some(scope) if !scope.is_empty() => {
                    CompiledStep::Filter(Box::new(ScopedStep::new(
                        filter,
                        scope.clone(),
                        ctx.host_capabilities.clone(),
                    )))
                }
                _ => CompiledStep::Filter(filter),
            };
            steps.push(compiled);
        }

        for step_spec in &spec.weighers {
            if !seen.insert(step_spec.alias.clone()) {
                return Err(InitError::DuplicateStepName(step_spec.alias.clone()));
            }
            let weigher = registry.build_weigher(
                &step_spec.plugin_name,
                &step_spec.alias,
                &step_spec.raw_options,
                ctx,
            )?;
            let compiled = match &step_spec.scope {
                Some(scope) if !scope.is_empty() => {
                    CompiledStep::Weigher(Box::new(ScopedStep::new(
                        weigher,
                        scope.clone(),
                        ctx.host_capabilities.clone(),
                    )))
                }
                _ => CompiledStep::Weigher(weigher),
            };
            steps.push(compiled);
        }

        Ok(Self {
            name: spec.name.clone(),
            create_decisions: spec.create_decisions,
            steps,
        })
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

/// Outcome of one pipeline run (spec.md §4.2 "Execution").
pub struct StepOutcome {
    pub final_activations: Activation,
    pub step_results: Vec<StepOutputRecord>,
}

/// Turns a step's raw output into the post-step *absolute* score map C3
/// observes (spec.md §4.3 "Observes ... inputs and outputs by score"). A
/// filter's raw output is already absolute (unchanged survivor scores,
/// spec.md §4.1); a weigher's raw output is a delta, so each surviving
/// host's absolute score is `input_snapshot + delta`. Sorting a weigher's
/// raw delta would rank a host by how much it moved, not where it landed.
fn absolute_post_step_scores(is_filter: bool, input_snapshot: &Activation, raw_output: &Activation) -> Activation {
    if is_filter {
        raw_output.clone()
    } else {
        raw_output
            .iter()
            .map(|(host, delta)| {
                let base = input_snapshot.get(host).unwrap_or(0.0);
                (host.to_string(), base + delta)
            })
            .collect()
    }
}

/// Runs compiled pipelines over requests, driving C1 steps and recording
/// observations via the C3 monitor.
pub struct PipelineEngine {
    monitor: PipelineMonitor,
}

impl Default for PipelineEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineEngine {
    pub fn new() -> Self {
        Self {
            monitor: PipelineMonitor::new(),
        }
    }

    /// Runs `request` through `pipeline`, threading the activation map
    /// through each step in order (spec.md §4.2 "Execution").
    pub async fn run(
        &self,
        pipeline: &CompiledPipeline,
        request: &Request,
        cancel: &CancellationToken,
    ) -> Result<StepOutcome, RunError> {
        let mut current = Activation::from_input(&request.hosts, &request.input_scores);
        let mut step_results = Vec::with_capacity(pipeline.steps.len());

        tracing::info!(pipeline = %pipeline.name, hosts = request.hosts.len(), "pipeline run started");

        for step in &pipeline.steps {
            if cancel.is_cancelled() {
                return Err(RunError::Cancelled);
            }

            let input_snapshot = current.clone();
            let started = Instant::now();

            let run_result = match step {
                CompiledStep::Filter(f) => f.run(request, &input_snapshot).await,
                CompiledStep::Weigher(w) => w.run(request, &input_snapshot).await,
            };

            let elapsed = started.elapsed();

            let step_output = match run_result {
                Ok(output) => output,
                Err(StepRunError::Recoverable(message)) => {
                    tracing::warn!(pipeline = %pipeline.name, step = step.name(), error = %message, "recoverable step error, continuing");
                    StepOutput::new(input_snapshot.clone())
                }
                Err(StepRunError::Fatal(message)) => {
                    tracing::warn!(pipeline = %pipeline.name, step = step.name(), error = %message, "fatal step error, aborting pipeline");
                    return Err(RunError::StepFatal {
                        step: step.name().to_string(),
                        message,
                    });
                }
            };

            let is_filter = matches!(step, CompiledStep::Filter(_));
            let post_step_absolute =
                absolute_post_step_scores(is_filter, &input_snapshot, &step_output.activations);

            self.monitor
                .record_step(step.name(), elapsed, &input_snapshot, &post_step_absolute);

            let input_order = input_snapshot.sorted_by_score_desc();
            let output_order = post_step_absolute.sorted_by_score_desc();
            self.monitor
                .record_reordering(step.name(), &reordering_origins(&input_order, &output_order));

            for (stat_name, stat) in &step_output.stats {
                match statistical_impact(&input_order, &output_order, stat) {
                    Ok(impact) => self.monitor.record_statistical_impact(step.name(), stat_name, impact),
                    Err(message) => {
                        tracing::warn!(pipeline = %pipeline.name, step = step.name(), stat = %stat_name, error = %message, "skipping statistical impact");
                    }
                }
            }

            // The persisted `StepOutputRecord.output` the reconciler
            // replays (reconciler.rs `replay`) is always a delta, so a
            // filter step's record must carry 0.0 for every survivor, not
            // its raw score.
            let recorded_output = match step {
                CompiledStep::Filter(_) => {
                    for host in input_snapshot.keys().map(str::to_string).collect::<Vec<_>>() {
                        if !step_output.activations.contains(&host) {
                            current.remove(&host);
                        }
                    }
                    step_output
                        .activations
                        .keys()
                        .map(|host| (host.to_string(), 0.0))
                        .collect()
                }
                CompiledStep::Weigher(_) => {
                    for host in input_snapshot.keys() {
                        if let Some(absolute) = post_step_absolute.get(host) {
                            current.set(host, absolute);
                        }
                    }
                    step_output.activations.to_map()
                }
            };

            step_results.push(StepOutputRecord {
                name: step.name().to_string(),
                output: recorded_output,
            });

            tracing::debug!(pipeline = %pipeline.name, step = step.name(), duration_ms = elapsed.as_millis() as u64, "step completed");
        }

        PipelineCounters::from_request(request).record(&pipeline.name);

        tracing::info!(pipeline = %pipeline.name, survivors = current.len(), "pipeline run finished");

        Ok(StepOutcome {
            final_activations: current,
            step_results,
        })
    }
}

#[cfg(test)]
#[path = "pipeline_engine_tests.rs"]
mod tests;
