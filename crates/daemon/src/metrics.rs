// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Prometheus exporter wiring (spec.md §6 "Metrics. Histograms and
//! counters named `scheduler_pipeline_*`...").
//!
//! The core crates only call `metrics::histogram!`/`counter!`/`gauge!`;
//! this module is the one place that decides where those recordings end
//! up, installed once from `main` alongside logging setup.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("invalid metrics listen address '{0}': {1}")]
    InvalidAddr(String, std::net::AddrParseError),
    #[error("failed to install prometheus recorder: {0}")]
    Install(#[from] metrics_exporter_prometheus::BuildError),
}

/// Installs the global Prometheus recorder and starts its HTTP exporter.
/// Call exactly once at process startup.
pub fn install(addr: &str) -> Result<(), MetricsError> {
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| MetricsError::InvalidAddr(addr.to_string(), e))?;

    PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .install()?;

    Ok(())
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
