// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! `fleetsched pipeline validate`: compiles a pipeline descriptor against
//! the demo plugin pack without running any request through it (spec.md
//! §4.2 "Construction").

use crate::plugins::{demo_plugin_context, register_demo_plugins};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use fleetsched_core::PipelineSpec;
use fleetsched_engine::{CompiledPipeline, PluginRegistry};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct PipelineArgs {
    #[command(subcommand)]
    pub command: PipelineCommand,
}

#[derive(Subcommand, Debug)]
pub enum PipelineCommand {
    /// Compile a pipeline descriptor and report success or the first
    /// compile error.
    Validate {
        /// Path to a pipeline descriptor JSON file.
        file: PathBuf,
    },
}

pub fn run(args: PipelineArgs) -> Result<()> {
    match args.command {
        PipelineCommand::Validate { file } => validate(&file),
    }
}

fn validate(file: &PathBuf) -> Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("reading pipeline file {}", file.display()))?;
    let spec: PipelineSpec =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing pipeline file {}", file.display()))?;

    let mut registry = PluginRegistry::new();
    register_demo_plugins(&mut registry);
    let ctx = demo_plugin_context();

    let compiled = CompiledPipeline::compile(&spec, &registry, &ctx).context("compiling pipeline")?;
    println!("pipeline '{}' OK ({} steps)", compiled.name, compiled.step_count());
    Ok(())
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
