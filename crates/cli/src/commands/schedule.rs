// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! `fleetsched schedule`: runs one request through a pipeline and persists
//! the reconciled, chain-annotated decision record (spec.md §3.2, §4.4,
//! §4.5).

use crate::commands::open_store;
use crate::output::OutputFormat;
use crate::plugins::{demo_plugin_context, register_demo_plugins};
use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use fleetsched_core::{Flavor, Intent, PipelineSpec, Request, SystemClock, TtlConfig};
use fleetsched_daemon::config::DEFAULT_TTL_CONCURRENCY;
use fleetsched_daemon::{Scheduler, TtlService};
use fleetsched_engine::{PipelineTable, PluginRegistry};
use fleetsched_storage::TtlController;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum IntentArg {
    #[default]
    InitialPlacement,
    LiveMigration,
    Resize,
    Evacuate,
}

impl std::fmt::Display for IntentArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IntentArg::InitialPlacement => "initial-placement",
            IntentArg::LiveMigration => "live-migration",
            IntentArg::Resize => "resize",
            IntentArg::Evacuate => "evacuate",
        };
        write!(f, "{s}")
    }
}

impl From<IntentArg> for Intent {
    fn from(value: IntentArg) -> Self {
        match value {
            IntentArg::InitialPlacement => Intent::InitialPlacement,
            IntentArg::LiveMigration => Intent::LiveMigration,
            IntentArg::Resize => Intent::Resize,
            IntentArg::Evacuate => Intent::Evacuate,
        }
    }
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Path to a pipeline descriptor JSON file (spec.md §6 "Pipeline").
    #[arg(long)]
    pub pipeline_file: PathBuf,

    /// Candidate host, optionally with its initial score: `host1` or
    /// `host1=2.5`. Repeatable.
    #[arg(long = "host", value_name = "HOST[=SCORE]", required = true)]
    pub hosts: Vec<String>,

    #[arg(long, default_value_t = 1)]
    pub vcpus: u32,
    #[arg(long = "memory-mb", default_value_t = 1024)]
    pub memory_mb: u32,
    #[arg(long = "disk-gb", default_value_t = 10)]
    pub disk_gb: u32,

    #[arg(long, default_value = "demo-project")]
    pub project: String,
    #[arg(long = "az", default_value = "nova")]
    pub availability_zone: String,

    /// Correlation id for chain analysis (spec.md §3.1 `resource_id`).
    /// Generated if omitted.
    #[arg(long)]
    pub instance_uuid: Option<String>,

    #[arg(long, value_enum, default_value_t)]
    pub intent: IntentArg,
}

fn parse_host(raw: &str) -> (String, f64) {
    match raw.split_once('=') {
        Some((host, score)) => (host.to_string(), score.parse().unwrap_or(0.0)),
        None => (raw.to_string(), 0.0),
    }
}

pub async fn run(args: ScheduleArgs, decisions_dir: PathBuf, output: OutputFormat) -> Result<()> {
    let spec_bytes = std::fs::read(&args.pipeline_file)
        .with_context(|| format!("reading pipeline file {}", args.pipeline_file.display()))?;
    let spec: PipelineSpec = serde_json::from_slice(&spec_bytes)
        .with_context(|| format!("parsing pipeline file {}", args.pipeline_file.display()))?;

    let mut registry = PluginRegistry::new();
    register_demo_plugins(&mut registry);
    let ctx = demo_plugin_context();

    let table = Arc::new(PipelineTable::new());
    let store = open_store(&decisions_dir)?;
    let clock = Arc::new(SystemClock);
    let ttl_config = TtlConfig::default();
    let ttl_controller = TtlController::new(store.clone(), clock.clone(), ttl_config);
    let ttl_service = TtlService::new(ttl_controller, store.clone(), DEFAULT_TTL_CONCURRENCY);
    let shutdown = CancellationToken::new();
    let scheduler = Scheduler::new(table, store, clock, 1, ttl_service, ttl_config, shutdown);
    scheduler.compile_and_publish(&spec, &registry, &ctx).context("compiling pipeline")?;

    let mut hosts = Vec::with_capacity(args.hosts.len());
    let mut input_scores: HashMap<String, f64> = HashMap::new();
    for raw in &args.hosts {
        let (host, score) = parse_host(raw);
        hosts.push(host.clone());
        input_scores.insert(host, score);
    }

    let request = Request {
        hosts,
        input_scores,
        flavor: Flavor {
            vcpus: args.vcpus,
            memory_mb: args.memory_mb,
            disk_gb: args.disk_gb,
            extra_specs: HashMap::new(),
        },
        image_properties: HashMap::new(),
        project_id: args.project,
        availability_zone: args.availability_zone,
        scheduler_hints: HashMap::new(),
        instance_uuid: args.instance_uuid.unwrap_or_else(|| Uuid::new_v4().to_string()),
        intent: args.intent.into(),
    };

    let cancel = CancellationToken::new();
    let record = match scheduler.schedule(&spec.name, &request, &cancel).await {
        Ok(record) => record,
        Err(error) => bail!("scheduling failed: {error}"),
    };

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Text => {
            let decision = record.latest().context("decision record has no decisions")?;
            println!("decision {} for resource {}", record.id, record.resource_id);
            println!("  state: {:?}", decision.status.state);
            if let Some(error) = &decision.status.error {
                println!("  error: {error}");
            }
            println!("  description: {}", decision.status.description);
            if let Some(chain) = &record.global_description {
                println!("  {chain}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
