// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! JSON-file-per-record `DecisionStore`, used by the TTL controller's
//! startup sweep to prove records survive a process restart (spec.md
//! §4.6 "On process start").
//!
//! Writes go to a `.tmp` path and then rename atomically, so a crash
//! mid-write can't corrupt a record; simplified to one file per record
//! since no WAL replay is in scope here (see DESIGN.md).

use crate::error::StoreError;
use crate::store::DecisionStore;
use async_trait::async_trait;
use fleetsched_core::{DecisionId, DecisionRecord};
use std::fs;
use std::path::{Path, PathBuf};

pub struct JsonFileDecisionStore {
    dir: PathBuf,
}

impl JsonFileDecisionStore {
    /// Opens (creating if absent) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: &DecisionId) -> PathBuf {
        self.dir.join(format!("{}.json", id.as_str()))
    }

    fn write_atomic(&self, record: &DecisionRecord) -> Result<(), StoreError> {
        let path = self.path_for(&record.id);
        let tmp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(record)?;
        fs::write(&tmp_path, bytes)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn read_record(path: &Path) -> Result<DecisionRecord, StoreError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl DecisionStore for JsonFileDecisionStore {
    async fn create(&self, record: DecisionRecord) -> Result<DecisionRecord, StoreError> {
        if self.path_for(&record.id).exists() {
            return Err(StoreError::Conflict(record.id.to_string()));
        }
        self.write_atomic(&record)?;
        Ok(record)
    }

    async fn get(&self, id: &DecisionId) -> Result<Option<DecisionRecord>, StoreError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::read_record(&path)?))
    }

    async fn put(&self, record: DecisionRecord) -> Result<DecisionRecord, StoreError> {
        let path = self.path_for(&record.id);
        if !path.exists() {
            return Err(StoreError::NotFound(record.id.to_string()));
        }
        let stored = Self::read_record(&path)?;
        if stored.resource_version != record.resource_version {
            return Err(StoreError::Conflict(record.id.to_string()));
        }
        let mut updated = record;
        updated.resource_version += 1;
        self.write_atomic(&updated)?;
        Ok(updated)
    }

    async fn delete(&self, id: &DecisionId, expected_version: u64) -> Result<(), StoreError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let stored = Self::read_record(&path)?;
        if stored.resource_version != expected_version {
            return Err(StoreError::Conflict(id.to_string()));
        }
        fs::remove_file(&path)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DecisionRecord>, StoreError> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                out.push(Self::read_record(&path)?);
            }
        }
        Ok(out)
    }

    async fn peers(&self, resource_id: &str, exclude_id: &DecisionId) -> Result<Vec<DecisionRecord>, StoreError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|r| r.resource_id == resource_id && &r.id != exclude_id)
            .collect())
    }
}

#[cfg(test)]
#[path = "json_file_tests.rs"]
mod tests;
