// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! The decision record persistence seam (spec.md §5 "the persistence layer
//! must provide optimistic concurrency control", §9 "secondary index on
//! resource_id").

use crate::error::StoreError;
use async_trait::async_trait;
use fleetsched_core::{DecisionId, DecisionRecord};

/// Persists decision records with optimistic-concurrency status updates.
///
/// Every method is a suspension point (spec.md §5): implementations may
/// perform blocking I/O or network calls under this trait.
#[async_trait]
pub trait DecisionStore: Send + Sync {
    /// Creates a brand-new record. `Conflict` if `record.id` already exists.
    async fn create(&self, record: DecisionRecord) -> Result<DecisionRecord, StoreError>;

    async fn get(&self, id: &DecisionId) -> Result<Option<DecisionRecord>, StoreError>;

    /// Replaces the stored record, enforcing that `record.resource_version`
    /// matches what is currently stored before bumping it (spec.md §5,
    /// §7 "Status update conflict"). Returns the stored record with its
    /// version incremented.
    async fn put(&self, record: DecisionRecord) -> Result<DecisionRecord, StoreError>;

    /// Deletes a record if its version matches. Absence is reported as
    /// `NotFound`; callers in the TTL path (spec.md §4.6) treat that as
    /// success rather than an error.
    async fn delete(&self, id: &DecisionId, expected_version: u64) -> Result<(), StoreError>;

    /// All persisted records, for the TTL controller's startup sweep
    /// (spec.md §4.6 "On process start: list all decision records once").
    async fn list(&self) -> Result<Vec<DecisionRecord>, StoreError>;

    /// Peer records sharing `resource_id`, excluding `exclude_id`, for the
    /// chain analyser (spec.md §4.5, §9 "lookup via a secondary index on
    /// resource_id").
    async fn peers(&self, resource_id: &str, exclude_id: &DecisionId) -> Result<Vec<DecisionRecord>, StoreError>;
}
