// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

use super::*;
use crate::inventory::ReservationKind;
use std::collections::HashMap;

#[tokio::test]
async fn lookup_returns_none_for_unseeded_host() {
    let lookup = InMemoryHostCapabilityLookup::new();
    assert!(lookup.capabilities("compute-1").await.is_none());
}

#[tokio::test]
async fn lookup_returns_seeded_capabilities() {
    let lookup = InMemoryHostCapabilityLookup::new();
    let mut caps = HostCapabilities::default();
    caps.hypervisor_type = "qemu".to_string();
    lookup.insert("compute-1", caps.clone());

    let found = lookup.capabilities("compute-1").await.unwrap();
    assert_eq!(found.hypervisor_type, "qemu");
}

#[tokio::test]
async fn reservation_lookup_accumulates_per_host() {
    let lookup = InMemoryReservationLookup::new();
    let reservation = Reservation {
        kind: ReservationKind::Failover,
        target_host: "compute-1".to_string(),
        observed_host: None,
        resource_deltas: HashMap::new(),
        per_instance_allocation: HashMap::new(),
    };
    lookup.insert("compute-1", reservation.clone());
    lookup.insert("compute-1", reservation);

    assert_eq!(lookup.reservations_for_host("compute-1").await.len(), 2);
    assert!(lookup.reservations_for_host("compute-2").await.is_empty());
}
