// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Daemon configuration (spec.md §5 "Scheduling model", §6 "TTL controller:
//! `{ ttlAfterDecision: duration }`").
//!
//! Loaded from environment variables with the `FLEETSCHED_` prefix, all
//! read in one place rather than scattered `std::env::var` calls across
//! the daemon.

use fleetsched_core::TtlConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Default concurrency for the reconcile worker pool (spec.md §5: "default
/// 1 concurrent reconcile").
pub const DEFAULT_RECONCILE_CONCURRENCY: usize = 1;
/// Default concurrency for the TTL worker pool (spec.md §5: "10 for the
/// TTL controller").
pub const DEFAULT_TTL_CONCURRENCY: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub reconcile_concurrency: usize,
    pub ttl_concurrency: usize,
    pub ttl: TtlConfig,
    /// Directory holding one JSON file per decision record, swept on
    /// startup (spec.md §4.6). `None` runs with an in-memory-only store.
    pub decisions_dir: Option<PathBuf>,
    pub metrics_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reconcile_concurrency: DEFAULT_RECONCILE_CONCURRENCY,
            ttl_concurrency: DEFAULT_TTL_CONCURRENCY,
            ttl: TtlConfig::default(),
            decisions_dir: None,
            metrics_addr: "127.0.0.1:9090".to_string(),
        }
    }
}

impl Config {
    /// Loads overrides from `FLEETSCHED_*` environment variables, falling
    /// back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(n) = env_usize("FLEETSCHED_RECONCILE_CONCURRENCY") {
            config.reconcile_concurrency = n;
        }
        if let Some(n) = env_usize("FLEETSCHED_TTL_CONCURRENCY") {
            config.ttl_concurrency = n;
        }
        if let Some(secs) = env_u64("FLEETSCHED_TTL_SECONDS") {
            config.ttl.ttl_after_decision = Duration::from_secs(secs);
        }
        if let Ok(dir) = std::env::var("FLEETSCHED_DECISIONS_DIR") {
            config.decisions_dir = Some(PathBuf::from(dir));
        }
        if let Ok(addr) = std::env::var("FLEETSCHED_METRICS_ADDR") {
            config.metrics_addr = addr;
        }

        config
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
