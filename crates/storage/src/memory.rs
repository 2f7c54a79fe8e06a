// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! In-memory `DecisionStore`, keyed by id with a secondary index on
//! `resource_id` (spec.md §9 "lookup via a secondary index on
//! resource_id"). Backs the reconciler/TTL controller tests and the admin
//! CLI's one-shot runs.

use crate::error::StoreError;
use crate::store::DecisionStore;
use async_trait::async_trait;
use fleetsched_core::{DecisionId, DecisionRecord};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub struct InMemoryDecisionStore {
    records: RwLock<HashMap<DecisionId, DecisionRecord>>,
    by_resource: RwLock<HashMap<String, HashSet<DecisionId>>>,
}

impl InMemoryDecisionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DecisionStore for InMemoryDecisionStore {
    async fn create(&self, record: DecisionRecord) -> Result<DecisionRecord, StoreError> {
        let mut records = self.records.write();
        if records.contains_key(&record.id) {
            return Err(StoreError::Conflict(record.id.to_string()));
        }
        self.by_resource
            .write()
            .entry(record.resource_id.clone())
            .or_default()
            .insert(record.id.clone());
        records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: &DecisionId) -> Result<Option<DecisionRecord>, StoreError> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn put(&self, record: DecisionRecord) -> Result<DecisionRecord, StoreError> {
        let mut records = self.records.write();
        match records.get(&record.id) {
            None => return Err(StoreError::NotFound(record.id.to_string())),
            Some(stored) if stored.resource_version != record.resource_version => {
                return Err(StoreError::Conflict(record.id.to_string()));
            }
            Some(_) => {}
        }
        let mut updated = record;
        updated.resource_version += 1;
        records.insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &DecisionId, expected_version: u64) -> Result<(), StoreError> {
        let mut records = self.records.write();
        match records.get(id) {
            None => Err(StoreError::NotFound(id.to_string())),
            Some(stored) if stored.resource_version != expected_version => {
                Err(StoreError::Conflict(id.to_string()))
            }
            Some(stored) => {
                let resource_id = stored.resource_id.clone();
                records.remove(id);
                if let Some(ids) = self.by_resource.write().get_mut(&resource_id) {
                    ids.remove(id);
                }
                Ok(())
            }
        }
    }

    async fn list(&self) -> Result<Vec<DecisionRecord>, StoreError> {
        Ok(self.records.read().values().cloned().collect())
    }

    async fn peers(&self, resource_id: &str, exclude_id: &DecisionId) -> Result<Vec<DecisionRecord>, StoreError> {
        let records = self.records.read();
        let ids = self.by_resource.read();
        let Some(peer_ids) = ids.get(resource_id) else {
            return Ok(Vec::new());
        };
        Ok(peer_ids
            .iter()
            .filter(|id| *id != exclude_id)
            .filter_map(|id| records.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
