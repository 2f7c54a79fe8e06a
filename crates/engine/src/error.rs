// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Error types for the pipeline engine and reconciler.

use thiserror::Error;

/// Errors raised while compiling a pipeline descriptor (spec.md §4.2
/// "Construction").
#[derive(Debug, Error)]
pub enum InitError {
    #[error("unknown plugin: {0}")]
    UnknownPlugin(String),
    #[error("duplicate step name: {0}")]
    DuplicateStepName(String),
    #[error("invalid options for step {step}: {message}")]
    InvalidOptions { step: String, message: String },
}

/// Whether an init error leaves the pipeline descriptor itself broken, or
/// only one step's configuration (spec.md §4.2 point 2: "reports critical
/// vs non-critical init errors separately so that the surrounding
/// controller can decide whether to mark the pipeline degraded").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitErrorSeverity {
    /// The descriptor references a plugin that doesn't exist, or reuses a
    /// step name — no compiled form can be produced until the descriptor
    /// itself is fixed; any previously published pipeline under this name
    /// is left running untouched rather than marked degraded.
    Critical,
    /// A known plugin's options failed validation — fixable by editing
    /// that step's configuration alone; the controller may keep a prior
    /// compiled form running and flag the pipeline degraded rather than
    /// treat it as entirely unusable.
    NonCritical,
}

impl InitError {
    pub fn severity(&self) -> InitErrorSeverity {
        match self {
            InitError::UnknownPlugin(_) | InitError::DuplicateStepName(_) => InitErrorSeverity::Critical,
            InitError::InvalidOptions { .. } => InitErrorSeverity::NonCritical,
        }
    }
}

/// Errors raised while running a compiled pipeline (spec.md §4.2
/// "Execution").
#[derive(Debug, Error)]
pub enum RunError {
    #[error("step {step} failed: {message}")]
    StepFatal { step: String, message: String },
    #[error("cancelled")]
    Cancelled,
}

/// Errors raised by the decision reconciler (C4) and chain analyser (C5).
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("decision record not found: {0}")]
    NotFound(String),
    #[error("concurrent status update conflict for {0}")]
    Conflict(String),
    #[error("cancelled")]
    Cancelled,
}
