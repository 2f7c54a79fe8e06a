// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! In-memory fakes for tests (spec.md §1.1's "external collaborators"),
//! standing in for a real fleet inventory backend in engine tests.

use crate::inventory::{HostCapabilities, HostCapabilityLookup, Reservation, ReservationLookup};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory host capability lookup, seeded by the test.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHostCapabilityLookup {
    hosts: Arc<RwLock<HashMap<String, HostCapabilities>>>,
}

impl InMemoryHostCapabilityLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, host: impl Into<String>, caps: HostCapabilities) {
        self.hosts.write().insert(host.into(), caps);
    }
}

#[async_trait]
impl HostCapabilityLookup for InMemoryHostCapabilityLookup {
    async fn capabilities(&self, host: &str) -> Option<HostCapabilities> {
        self.hosts.read().get(host).cloned()
    }
}

/// In-memory reservation lookup, seeded by the test.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReservationLookup {
    by_host: Arc<RwLock<HashMap<String, Vec<Reservation>>>>,
}

impl InMemoryReservationLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, host: impl Into<String>, reservation: Reservation) {
        self.by_host
            .write()
            .entry(host.into())
            .or_default()
            .push(reservation);
    }
}

#[async_trait]
impl ReservationLookup for InMemoryReservationLookup {
    async fn reservations_for_host(&self, host: &str) -> Vec<Reservation> {
        self.by_host.read().get(host).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
