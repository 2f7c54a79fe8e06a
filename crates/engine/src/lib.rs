// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fleetsched-engine: the scheduling pipeline engine.
//!
//! Implements the step abstraction and scoping (C1), the pipeline engine
//! (C2), the pipeline monitor (C3), the decision reconciler (C4) and the
//! decision chain analyser (C5). The TTL controller (C6) lives in
//! `fleetsched-storage`, which owns the decision store it sweeps.

mod chain;
mod error;
mod monitor;
mod pipeline_engine;
mod pipeline_table;
mod reconciler;
mod registry;
mod scope;
mod step;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

pub use chain::{render_chain, ChainSegment};
pub use error::{InitError, InitErrorSeverity, ReconcileError, RunError};
pub use monitor::{PipelineCounters, PipelineMonitor, ReorderingEntry};
pub use pipeline_engine::{CompiledPipeline, CompiledStep, PipelineEngine, StepOutcome};
pub use pipeline_table::PipelineTable;
pub use reconciler::{reconcile, StepImpact};
pub use registry::{FilterFactory, PluginContext, PluginRegistry, WeigherFactory};
pub use scope::ScopedStep;
pub use step::{Filter, MinMaxScale, NoEffect, StepOutput, StepRunError, Weigher};
