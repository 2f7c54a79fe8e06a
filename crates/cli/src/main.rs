// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fleetsched - administrative CLI for the compute workload scheduler.
//!
//! Drives the pipeline engine, reconciler and chain analyser in process
//! against a shared `--decisions-dir`, the same way `fleetschedd` does
//! (spec.md §1.1 puts the request-intake transport that would otherwise
//! connect them out of scope).

mod commands;
mod output;
mod plugins;

use clap::{Parser, Subcommand};
use commands::{decision, gc, pipeline, schedule};
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fleetsched", version, about = "Compute workload scheduler CLI")]
struct Cli {
    /// Directory holding one JSON file per decision record, shared with
    /// `fleetschedd` (spec.md §4.6).
    #[arg(long, global = true, env = "FLEETSCHED_DECISIONS_DIR", default_value = "fleetsched-decisions")]
    decisions_dir: PathBuf,

    /// Output format.
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one request through a pipeline and persist the result.
    Schedule(schedule::ScheduleArgs),
    /// Pipeline descriptor management.
    Pipeline(pipeline::PipelineArgs),
    /// Decision record inspection.
    Decision(decision::DecisionArgs),
    /// Manual TTL sweep over the decision store.
    Gc(gc::GcArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Schedule(args) => schedule::run(args, cli.decisions_dir, cli.output).await,
        Commands::Pipeline(args) => pipeline::run(args),
        Commands::Decision(args) => decision::run(args, cli.decisions_dir, cli.output).await,
        Commands::Gc(args) => gc::run(args, cli.decisions_dir).await,
    };

    if let Err(error) = result {
        eprintln!("error: {}", format_error(&error));
        std::process::exit(1);
    }
}

/// Collapses an anyhow error chain into one line when every cause is
/// already mentioned in the top-level message, otherwise renders each
/// link on its own line.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err.chain().skip(1).all(|cause| top.contains(&cause.to_string()));
    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {i}: {cause}"));
    }
    buf
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
