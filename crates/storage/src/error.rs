// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Storage error taxonomy (spec.md §6 "Error classes at the boundary").

use fleetsched_core::BoundaryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("decision record '{0}' not found")]
    NotFound(String),
    #[error("resource version conflict for decision record '{0}'")]
    Conflict(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Collapses into the boundary taxonomy so callers (the daemon's retry
    /// policy) can dispatch on kind (spec.md §6, §7).
    pub fn to_boundary(&self) -> BoundaryError {
        match self {
            StoreError::NotFound(id) => BoundaryError::NotFound(id.clone()),
            StoreError::Conflict(id) => BoundaryError::Conflict(id.clone()),
            StoreError::Io(e) => BoundaryError::Transient(e.to_string()),
            StoreError::Json(e) => BoundaryError::Fatal(e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
