// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Decision chain analyser (C5, spec.md §4.5).
//!
//! Walks the reconciled decisions for one resource (oldest first, the
//! reference decision last), collapses consecutive identical-winner runs
//! into segments, and renders the `chain:` / `chain (loop detected):` text
//! with loop detection (spec.md §4.5, P7).

use fleetsched_core::{format_chain_duration, Decision};
use std::collections::HashSet;

/// One collapsed run of consecutive decisions that picked the same host
/// (spec.md §4.5 "Collapse consecutive records").
#[derive(Debug, Clone, PartialEq)]
pub struct ChainSegment {
    pub host: String,
    /// Time this host held the decision before the next segment replaced
    /// it; `0` for the final (most recent) segment.
    pub duration_ms: u64,
    pub count: usize,
}

/// Builds segments from an ordered (oldest-first) sequence of
/// `(requested_at_ms, winner_host)` pairs.
fn build_segments(entries: &[(u64, String)]) -> Vec<ChainSegment> {
    let mut segment_starts: Vec<(usize, usize)> = Vec::new(); // (start_idx, end_idx inclusive)
    let mut i = 0;
    while i < entries.len() {
        let host = &entries[i].1;
        let mut j = i;
        while j + 1 < entries.len() && &entries[j + 1].1 == host {
            j += 1;
        }
        segment_starts.push((i, j));
        i = j + 1;
    }

    segment_starts
        .iter()
        .enumerate()
        .map(|(seg_idx, &(start, end))| {
            let duration_ms = if seg_idx + 1 < segment_starts.len() {
                let (next_start, _) = segment_starts[seg_idx + 1];
                entries[next_start].0.saturating_sub(entries[start].0)
            } else {
                0
            };
            ChainSegment {
                host: entries[start].1.clone(),
                duration_ms,
                count: end - start + 1,
            }
        })
        .collect()
}

/// `true` iff a host appears in more than one non-consecutive segment
/// (spec.md §4.5 "Loop detection", P7).
fn has_loop(segments: &[ChainSegment]) -> bool {
    let mut seen = HashSet::new();
    for segment in segments {
        if !seen.insert(segment.host.clone()) {
            return true;
        }
    }
    false
}

fn render_segment(segment: &ChainSegment) -> String {
    let duration = format_chain_duration(segment.duration_ms);
    if segment.count == 1 {
        format!("{} ({duration})", segment.host)
    } else {
        format!("{} ({duration}; {} decisions)", segment.host, segment.count)
    }
}

/// Renders the chain text for a resource's full decision history
/// (oldest first, reference decision last — spec.md §3.1 "Chain (Ch)").
/// Decisions without a resolved winner (errors, no survivors) contribute
/// no segment. Returns `None` if no decision in the history has a winner.
pub fn render_chain(decisions: &[Decision]) -> Option<String> {
    let entries: Vec<(u64, String)> = decisions
        .iter()
        .filter_map(|d| d.status.final_scores.first().map(|(h, _)| (d.requested_at_ms, h.clone())))
        .collect();

    if entries.is_empty() {
        return None;
    }

    let segments = build_segments(&entries);
    let prefix = if has_loop(&segments) {
        "chain (loop detected): "
    } else {
        "chain: "
    };
    let body = segments.iter().map(render_segment).collect::<Vec<_>>().join(" -> ");
    Some(format!("{prefix}{body}"))
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
