// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! `fleetsched gc`: a manual, one-shot TTL sweep (spec.md §4.6 "On process
//! start: list all decision records once"), for operators who don't want
//! to wait on `fleetschedd`'s background watches.

use crate::commands::open_store;
use anyhow::Result;
use clap::Args;
use fleetsched_core::{SystemClock, TtlConfig};
use fleetsched_storage::TtlController;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug)]
pub struct GcArgs {
    /// TTL to check records against, in seconds (spec.md §6 "{
    /// ttlAfterDecision: duration }", default 24h).
    #[arg(long, default_value_t = 24 * 3600)]
    pub ttl_seconds: u64,
}

pub async fn run(args: GcArgs, decisions_dir: PathBuf) -> Result<()> {
    let store = open_store(&decisions_dir)?;
    let config = TtlConfig { ttl_after_decision: Duration::from_secs(args.ttl_seconds) };
    let controller = TtlController::new(store, Arc::new(SystemClock), config);

    let outcomes = controller.startup_sweep(&CancellationToken::new()).await?;
    if outcomes.is_empty() {
        println!("no decision records");
    }
    for (id, action) in &outcomes {
        println!("{id}  {action:?}");
    }

    Ok(())
}

#[cfg(test)]
#[path = "gc_tests.rs"]
mod tests;
