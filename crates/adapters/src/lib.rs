// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! fleetsched-adapters: external collaborator contracts (spec.md §6).
//!
//! These traits are the boundary of "the core" as defined in spec.md §1.1:
//! the fleet inventory source is explicitly out of scope, so this crate
//! only pins down the shape callers (scoping predicates, future placement
//! plugins) depend on, plus in-memory fakes so the engine's test suite can
//! exercise scoping without a real inventory backend.

pub mod inventory;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use inventory::{
    Allocation, Capacity, HostCapabilities, HostCapabilityLookup, Reservation, ReservationKind,
    ReservationLookup,
};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{InMemoryHostCapabilityLookup, InMemoryReservationLookup};
