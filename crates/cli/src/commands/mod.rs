// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

pub mod decision;
pub mod gc;
pub mod pipeline;
pub mod schedule;

use fleetsched_storage::{DecisionStore, JsonFileDecisionStore};
use std::path::Path;
use std::sync::Arc;

/// Opens the JSON-file decision store every subcommand shares, so
/// `fleetsched schedule` and a later `fleetsched decision list` against the
/// same `--decisions-dir` see each other's records without a daemon
/// process in between (spec.md §1.1 treats the transport connecting them
/// as an external collaborator).
pub fn open_store(dir: &Path) -> anyhow::Result<Arc<dyn DecisionStore>> {
    Ok(Arc::new(JsonFileDecisionStore::open(dir)?))
}
