// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Decision reconciler (C4, spec.md §4.4).
//!
//! A pure function of `(input, pipeline trace)` — no wall-clock
//! observation during rendering (spec.md §9 "Explanations as pure
//! functions"), so re-running on an already-resolved decision with the
//! same trace produces byte-identical output (spec.md §7, idempotence).

use fleetsched_core::{Decision, DecisionState, DecisionStatus, StepOutputRecord};
use std::collections::{HashMap, HashSet};

/// One step's impact on the final winner, used to render the
/// winner-centric bullet list (spec.md §4.4 point 7).
#[derive(Debug, Clone, PartialEq)]
pub struct StepImpact {
    pub step_name: String,
    pub delta: f64,
    pub removed_count: usize,
    pub promoted_to_first: bool,
}

impl StepImpact {
    fn render(&self) -> String {
        let delta_str = format!("{:+.2}", self.delta);
        if self.promoted_to_first {
            format!("• {} {}→#1", self.step_name, delta_str)
        } else if self.removed_count > 0 {
            format!("• {} {} (removed {})", self.step_name, delta_str, self.removed_count)
        } else {
            format!("• {} {}", self.step_name, delta_str)
        }
    }
}

/// Replays a pipeline trace from `input`, returning the surviving hosts'
/// final scores and the steps that dropped each eliminated host (spec.md
/// §4.4 point 2 "Score replay").
#[allow(clippy::expect_used)]
fn replay(
    input: &HashMap<String, f64>,
    steps: &[StepOutputRecord],
) -> (HashMap<String, f64>, HashMap<String, Vec<String>>) {
    let mut scores = input.clone();
    let mut alive: HashSet<String> = input.keys().cloned().collect();
    let mut deleted_hosts: HashMap<String, Vec<String>> = HashMap::new();

    for step in steps {
        let mut still_alive = HashSet::with_capacity(alive.len());
        for host in &alive {
            match step.output.get(host) {
                Some(delta) => {
                    *scores.get_mut(host).expect("alive host has a score") += delta;
                    still_alive.insert(host.clone());
                }
                None => {
                    deleted_hosts.entry(host.clone()).or_default().push(step.name.clone());
                }
            }
        }
        alive = still_alive;
    }

    let final_scores = alive.into_iter().map(|h| (h.clone(), scores[&h])).collect();
    (final_scores, deleted_hosts)
}

/// Sorts hosts by descending score, ties broken lexicographically by name
/// (spec.md §9's Open Question: "this spec mandates lexicographic for
/// determinism").
fn rank(scores: &HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut entries: Vec<(String, f64)> = scores.iter().map(|(h, s)| (h.clone(), *s)).collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
    entries
}

fn winner_of(scores: &HashMap<String, f64>) -> Option<(String, f64)> {
    rank(scores).into_iter().next()
}

fn certainty_for(ranked: &[(String, f64)]) -> fleetsched_core::Certainty {
    use fleetsched_core::Certainty;
    if ranked.len() <= 1 {
        return Certainty::Perfect;
    }
    let gap = ranked[0].1 - ranked[1].1;
    if gap >= 0.5 {
        Certainty::High
    } else if gap >= 0.2 {
        Certainty::Medium
    } else {
        Certainty::Low
    }
}

fn join_with_and(names: &[String]) -> String {
    match names.len() {
        0 => String::new(),
        1 => names[0].clone(),
        2 => format!("{} and {}", names[0], names[1]),
        n => {
            let head = names[..n - 1].join(", ");
            format!("{} and {}", head, names[n - 1])
        }
    }
}

fn critical_path_clause(critical: &[String], total: usize) -> String {
    if critical.is_empty() {
        format!("Decision driven by input only (all {total} steps are non-critical).")
    } else if critical.len() == total {
        format!("Decision requires all {total} pipeline steps.")
    } else {
        let noun = if critical.len() == 1 { "step" } else { "steps" };
        format!(
            "Decision driven by {}/{} pipeline {}: {}.",
            critical.len(),
            total,
            noun,
            join_with_and(critical)
        )
    }
}

/// Winner-centric per-step impact trace (spec.md §4.4 point 7). Replays
/// the pipeline once more, this time tracking the final winner's score and
/// #1 status before and after each step.
#[allow(clippy::expect_used)]
fn step_impacts(
    input: &HashMap<String, f64>,
    steps: &[StepOutputRecord],
    winner: &str,
) -> Vec<StepImpact> {
    let mut scores = input.clone();
    let mut alive: HashSet<String> = input.keys().cloned().collect();
    let mut impacts = Vec::with_capacity(steps.len());

    for step in steps {
        let before_rank = rank(&scores.iter().filter(|(h, _)| alive.contains(*h)).map(|(h, s)| (h.clone(), *s)).collect());
        let was_first_before = before_rank.first().map(|(h, _)| h == winner).unwrap_or(false);
        let score_before = scores.get(winner).copied().unwrap_or(0.0);

        let mut still_alive = HashSet::with_capacity(alive.len());
        for host in &alive {
            if let Some(delta) = step.output.get(host) {
                *scores.get_mut(host).expect("alive host has a score") += delta;
                still_alive.insert(host.clone());
            }
        }
        let removed_count = alive.len() - still_alive.len();
        alive = still_alive;

        let score_after = scores.get(winner).copied().unwrap_or(score_before);
        let after_rank = rank(&scores.iter().filter(|(h, _)| alive.contains(*h)).map(|(h, s)| (h.clone(), *s)).collect());
        let was_first_after = after_rank.first().map(|(h, _)| h == winner).unwrap_or(false);

        impacts.push(StepImpact {
            step_name: step.name.clone(),
            delta: score_after - score_before,
            removed_count,
            promoted_to_first: !was_first_before && was_first_after,
        });
    }

    impacts
}

/// Validates, replays and renders the explanation for one decision
/// (spec.md §4.4). Returns the finished status subresource; never mutates
/// `decision`.
pub fn reconcile(decision: &Decision) -> DecisionStatus {
    if decision.input.is_empty() {
        return DecisionStatus::error("No hosts provided in input");
    }

    for step in &decision.steps {
        for host in step.output.keys() {
            if !decision.input.contains_key(host) {
                return DecisionStatus::error(format!(
                    "Host '{host}' in pipeline output not found in input"
                ));
            }
        }
    }

    let (final_scores, deleted_hosts) = replay(&decision.input, &decision.steps);
    let total_evaluated = decision.input.len();

    let Some((winner, winner_score)) = winner_of(&final_scores) else {
        return DecisionStatus {
            state: DecisionState::Resolved,
            error: None,
            final_scores: Vec::new(),
            deleted_hosts,
            description: format!("No hosts remaining after filtering, {total_evaluated} hosts evaluated"),
            critical_steps: Vec::new(),
        };
    };

    let ranked_final = rank(&final_scores);
    let certainty = certainty_for(&ranked_final);

    let ranked_input = rank(&decision.input);
    let input_winner = ranked_input[0].0.clone();
    let input_winner_score = ranked_input[0].1;

    let input_vs_final = if input_winner == winner {
        format!(
            "Input choice confirmed: {winner} ({:.2}→{:.2}, remained #1).",
            decision.input[&winner], winner_score
        )
    } else {
        let final_winner_input_pos = ranked_input
            .iter()
            .position(|(h, _)| h == &winner)
            .map(|i| i + 1)
            .unwrap_or(0);
        let final_winner_input_score = decision.input.get(&winner).copied().unwrap_or(0.0);

        if let Some(final_pos) = ranked_final.iter().position(|(h, _)| h == &input_winner) {
            format!(
                "Input favored {input_winner} (score: {:.2}, now #{} with {:.2}), final winner was #{} in input ({:.2}→{:.2}).",
                input_winner_score,
                final_pos + 1,
                ranked_final[final_pos].1,
                final_winner_input_pos,
                final_winner_input_score,
                winner_score
            )
        } else {
            format!(
                "Input favored {input_winner} (score: {:.2}, now filtered), final winner was #{} in input ({:.2}→{:.2}).",
                input_winner_score, final_winner_input_pos, final_winner_input_score, winner_score
            )
        }
    };

    let mut critical_steps = Vec::new();
    for (idx, _) in decision.steps.iter().enumerate() {
        let without: Vec<StepOutputRecord> = decision
            .steps
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, s)| s.clone())
            .collect();
        let (scores_without, _) = replay(&decision.input, &without);
        let winner_without = winner_of(&scores_without).map(|(h, _)| h);
        if winner_without.as_deref() != Some(winner.as_str()) {
            critical_steps.push(decision.steps[idx].name.clone());
        }
    }
    let critical_clause = critical_path_clause(&critical_steps, decision.steps.len());

    let mut impacts = step_impacts(&decision.input, &decision.steps, &winner);
    impacts.sort_by(|a, b| {
        b.delta
            .abs()
            .partial_cmp(&a.delta.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.promoted_to_first.cmp(&a.promoted_to_first))
            .then(a.step_name.cmp(&b.step_name))
    });

    let mut description = vec![format!(
        "Selected: {winner} (score: {:.2}), certainty: {certainty}, {total_evaluated} hosts evaluated.",
        winner_score
    )];
    description.push(input_vs_final);
    description.push(critical_clause);
    description.extend(impacts.iter().map(StepImpact::render));

    DecisionStatus {
        state: DecisionState::Resolved,
        error: None,
        final_scores: ranked_final,
        deleted_hosts,
        description: description.join("\n"),
        critical_steps,
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
