// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! fleetschedd: the long-running scheduler process.
//!
//! Starts the Prometheus exporter and the TTL controller's startup sweep
//! plus steady-state watches (C6, spec.md §4.6). The request-intake
//! transport is an external collaborator (spec.md §1.1) and isn't started
//! here; `fleetsched` (the CLI) drives the pipeline engine and reconciler
//! in process against the same decision store directory.

use fleetsched_core::SystemClock;
use fleetsched_daemon::ttl_service::TtlService;
use fleetsched_daemon::{metrics, Config};
use fleetsched_storage::{DecisionStore, InMemoryDecisionStore, JsonFileDecisionStore, TtlController};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    init_logging();

    let config = Config::from_env();
    tracing::info!(
        reconcile_concurrency = config.reconcile_concurrency,
        ttl_concurrency = config.ttl_concurrency,
        ttl_secs = config.ttl.ttl_after_decision.as_secs(),
        metrics_addr = %config.metrics_addr,
        "fleetschedd starting"
    );

    if let Err(error) = metrics::install(&config.metrics_addr) {
        tracing::error!(%error, "failed to install metrics exporter, continuing without it");
    }

    let store: Arc<dyn DecisionStore> = match &config.decisions_dir {
        Some(dir) => match JsonFileDecisionStore::open(dir) {
            Ok(store) => Arc::new(store),
            Err(error) => {
                tracing::error!(%error, dir = %dir.display(), "failed to open decision store");
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("FLEETSCHED_DECISIONS_DIR unset; decisions will not survive a restart");
            Arc::new(InMemoryDecisionStore::new())
        }
    };

    let clock = Arc::new(SystemClock);
    let controller = TtlController::new(store.clone(), clock, config.ttl);
    let ttl_service = TtlService::new(controller, store, config.ttl_concurrency);

    let cancel = CancellationToken::new();
    if let Err(error) = ttl_service.run(cancel.clone()).await {
        tracing::error!(%error, "ttl startup sweep failed");
    }

    shutdown_signal().await;
    tracing::info!("shutdown signal received, cancelling background work");
    cancel.cancel();
}

fn init_logging() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
