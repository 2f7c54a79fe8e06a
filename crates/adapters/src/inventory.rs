// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Fleet inventory lookup contracts (spec.md §6).
//!
//! Implementations are adapters to a concrete inventory backend, which is
//! an external collaborator per spec.md §1.1 — this crate only pins the
//! trait shape so host/spec selector scoping (spec.md §4.1) and future
//! placement plugins have something stable to depend on.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Capacity figures for a host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capacity {
    pub vcpus_total: u32,
    pub vcpus_used: u32,
    pub memory_mb_total: u32,
    pub memory_mb_used: u32,
    pub disk_gb_total: u32,
    pub disk_gb_used: u32,
}

/// Per-instance allocation on a host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Allocation {
    pub by_instance: HashMap<String, HashMap<String, f64>>,
}

/// Host capability attributes (spec.md §6, "Host capabilities by name").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostCapabilities {
    pub traits: HashSet<String>,
    pub hypervisor_type: String,
    pub aggregates: Vec<String>,
    pub cpu_arch: String,
    pub supported_features: Vec<String>,
    pub supported_devices: Vec<String>,
    pub in_maintenance: bool,
    pub conditions: Vec<String>,
    pub allowed_projects: Option<Vec<String>>,
    pub capacity: Capacity,
    pub allocation: Allocation,
}

/// Looks up host capabilities by name.
#[async_trait]
pub trait HostCapabilityLookup: Send + Sync {
    async fn capabilities(&self, host: &str) -> Option<HostCapabilities>;
}

/// The reservation kind (spec.md §6, "Active reservations (typed:
/// committed-resource | failover)").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationKind {
    CommittedResource,
    Failover,
}

/// An active reservation against a host.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub kind: ReservationKind,
    pub target_host: String,
    pub observed_host: Option<String>,
    pub resource_deltas: HashMap<String, f64>,
    pub per_instance_allocation: HashMap<String, HashMap<String, f64>>,
}

/// Looks up active reservations touching a host.
#[async_trait]
pub trait ReservationLookup: Send + Sync {
    async fn reservations_for_host(&self, host: &str) -> Vec<Reservation>;
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;
