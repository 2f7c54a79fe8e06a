// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! `fleetsched decision`: reads decision records back out of the shared
//! store (spec.md §3.1 "Decision record (D)", §4.5 "globalDescription").

use crate::commands::open_store;
use crate::output::{format_time_ago, OutputFormat};
use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use fleetsched_core::DecisionId;
use fleetsched_storage::DecisionStore;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct DecisionArgs {
    #[command(subcommand)]
    pub command: DecisionCommand,
}

#[derive(Subcommand, Debug)]
pub enum DecisionCommand {
    /// List every persisted decision record.
    List,
    /// Show one decision record in full.
    Show { id: String },
    /// Print a decision record's rendered chain summary.
    Chain { id: String },
}

pub async fn run(args: DecisionArgs, decisions_dir: PathBuf, output: OutputFormat) -> Result<()> {
    let store = open_store(&decisions_dir)?;

    match args.command {
        DecisionCommand::List => {
            let mut records = store.list().await?;
            records.sort_by_key(|r| r.created_at_ms);

            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
                OutputFormat::Text => {
                    if records.is_empty() {
                        println!("no decision records");
                    }
                    for record in &records {
                        let state = record
                            .latest()
                            .map(|d| format!("{:?}", d.status.state))
                            .unwrap_or_else(|| "-".to_string());
                        println!(
                            "{}  resource={}  decisions={}  state={}  age={}",
                            record.id,
                            record.resource_id,
                            record.decision_count(),
                            state,
                            format_time_ago(record.reference_time_ms()),
                        );
                    }
                }
            }
        }
        DecisionCommand::Show { id } => {
            let record = store
                .get(&DecisionId::new(id.clone()))
                .await?
                .with_context(|| format!("no decision record with id {id}"))?;

            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                OutputFormat::Text => {
                    println!("decision {} for resource {}", record.id, record.resource_id);
                    for (i, decision) in record.decisions.iter().enumerate() {
                        println!("  [{i}] {:?} pipeline={}", decision.status.state, decision.pipeline_name);
                        println!("      {}", decision.status.description);
                    }
                    if let Some(chain) = &record.global_description {
                        println!("  {chain}");
                    }
                }
            }
        }
        DecisionCommand::Chain { id } => {
            let record = store
                .get(&DecisionId::new(id.clone()))
                .await?
                .with_context(|| format!("no decision record with id {id}"))?;

            match &record.global_description {
                Some(chain) => println!("{chain}"),
                None => bail!("decision {id} has no rendered chain yet"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
