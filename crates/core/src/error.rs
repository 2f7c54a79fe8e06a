// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Shared error taxonomy.
//!
//! `CoreError` covers failures within domain-type construction
//! (spec.md §3.1 invariants). `BoundaryError` is the four-way
//! classification from spec.md §6/§7 that adapter and storage errors are
//! expected to collapse into, so callers can dispatch on kind instead of
//! string-matching.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("step option validation failed for '{step}': {message}")]
    InvalidStepOptions { step: String, message: String },
    #[error("MinMaxScale requires inLow != inHigh, got {in_low}")]
    DegenerateScale { in_low: f64 },
    #[error("duplicate step name '{0}' in pipeline")]
    DuplicateStepName(String),
}

/// Boundary error classes from spec.md §6.
///
/// Adapters and the persistence layer are expected to report failures in
/// one of these shapes so the daemon's retry policy (spec.md §7) can
/// dispatch on `kind` rather than parsing error strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("transient error: {0}")]
    Transient(String),
    #[error("fatal error: {0}")]
    Fatal(String),
}

impl BoundaryError {
    /// Whether the daemon should requeue with backoff rather than give up.
    pub fn is_retriable(&self) -> bool {
        matches!(self, BoundaryError::Transient(_) | BoundaryError::Fatal(_))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
