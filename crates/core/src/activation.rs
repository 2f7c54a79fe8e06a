// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! The activation map (spec.md §3.1): host -> running score.
//!
//! Backed by an `IndexMap` so that insertion order survives filtering and
//! weighing — the pipeline engine's final host ordering breaks score ties
//! by "insertion order of the input" (spec.md §4.2), which is only
//! well-defined if removals don't reshuffle the remaining keys the way a
//! `HashMap` would.

use indexmap::IndexMap;
use std::collections::HashMap;

/// Host name -> current score. Entries are removed (not zeroed) to signal
/// that a filter eliminated a host; absent keys stay gone for the rest of
/// the pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Activation(IndexMap<String, f64>);

impl Activation {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Build an activation map from a request's input scores, defaulting
    /// any host present in `hosts` but absent from `scores` to `0.0`.
    pub fn from_input(hosts: &[String], scores: &HashMap<String, f64>) -> Self {
        let mut map = IndexMap::with_capacity(hosts.len());
        for host in hosts {
            map.insert(host.clone(), scores.get(host).copied().unwrap_or(0.0));
        }
        Self(map)
    }

    pub fn get(&self, host: &str) -> Option<f64> {
        self.0.get(host).copied()
    }

    pub fn set(&mut self, host: impl Into<String>, score: f64) {
        self.0.insert(host.into(), score);
    }

    pub fn remove(&mut self, host: &str) -> Option<f64> {
        self.0.shift_remove(host)
    }

    pub fn contains(&self, host: &str) -> bool {
        self.0.contains_key(host)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(h, s)| (h.as_str(), *s))
    }

    /// Hosts ordered by descending score, ties broken by insertion order
    /// (spec.md §4.2's final-ordering rule).
    pub fn sorted_by_score_desc(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(usize, String, f64)> = self
            .0
            .iter()
            .enumerate()
            .map(|(i, (h, s))| (i, h.clone(), *s))
            .collect();
        entries.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        entries.into_iter().map(|(_, h, s)| (h, s)).collect()
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        self.0.iter().map(|(h, s)| (h.clone(), *s)).collect()
    }
}

impl FromIterator<(String, f64)> for Activation {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "activation_tests.rs"]
mod tests;
