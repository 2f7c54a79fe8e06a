// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Step scoping (C1, spec.md §4.1 "Scoping").
//!
//! Wraps a `Filter` or `Weigher` with host-selector and spec-selector
//! evaluation. The scoper never removes hosts itself: it only narrows
//! which hosts the wrapped step is allowed to affect, or raises
//! `StepSkipped` to turn the whole step into a no-op for this request.

use crate::step::{Filter, StepOutput, StepRunError, Weigher};
use async_trait::async_trait;
use fleetsched_adapters::HostCapabilityLookup;
use fleetsched_core::{
    Activation, HostSelector, HostSelectorOp, Request, ScopeSpec, SpecSelector, SpecSelectorAction,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Raised when a spec selector matches and the step must be treated as a
/// no-op for this request (spec.md §4.1 "Spec selectors").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSkipped;

/// Evaluates a single spec selector against the request, per spec.md §6's
/// "Request schema" attributes (subject names a request field; `infix` is
/// the value compared against it).
fn spec_selector_matches(selector: &SpecSelector, request: &Request) -> bool {
    match selector.subject.as_str() {
        "flavor" => request.flavor.extra_specs.values().any(|v| v == &selector.infix),
        "availability_zone" => request.availability_zone == selector.infix,
        "project_id" => request.project_id == selector.infix,
        "intent" => format!("{:?}", request.intent).eq_ignore_ascii_case(&selector.infix),
        _ => false,
    }
}

/// Whether the spec selectors cause this step to be skipped entirely
/// (spec.md §4.1: `action=skip` skips on match, `action=run` skips on
/// non-match — the step only runs when explicitly selected).
pub fn spec_selectors_skip(selectors: &[SpecSelector], request: &Request) -> bool {
    selectors.iter().any(|selector| {
        let matched = spec_selector_matches(selector, request);
        match selector.action {
            SpecSelectorAction::Skip => matched,
            SpecSelectorAction::Run => !matched,
        }
    })
}

/// Resolves the in-scope host set for a list of host selectors, against a
/// host-capability lookup (spec.md §4.1 "Host selectors").
pub async fn resolve_in_scope_hosts(
    selectors: &[HostSelector],
    all_hosts: &[String],
    lookup: &Arc<dyn HostCapabilityLookup>,
) -> HashSet<String> {
    if selectors.is_empty() {
        return all_hosts.iter().cloned().collect();
    }

    let mut in_scope: HashSet<String> = all_hosts.iter().cloned().collect();
    for selector in selectors {
        let mut matching: HashSet<String> = HashSet::new();
        for host in all_hosts {
            let caps = lookup.capabilities(host).await;
            let matches = match (&caps, selector.subject.as_str()) {
                (Some(c), "trait") => c.traits.contains(&selector.infix),
                (Some(c), "hypervisortype") => c.hypervisor_type == selector.infix,
                (Some(c), "cpuarch") => c.cpu_arch == selector.infix,
                (Some(c), "aggregate") => c.aggregates.iter().any(|a| a == &selector.infix),
                _ => false,
            };
            if matches {
                matching.insert(host.clone());
            }
        }
        in_scope = match selector.operation {
            HostSelectorOp::Intersection => in_scope.intersection(&matching).cloned().collect(),
            HostSelectorOp::Difference => in_scope.difference(&matching).cloned().collect(),
        };
    }
    in_scope
}

/// A filter wrapped with scoping behavior.
pub struct ScopedStep<S> {
    inner: S,
    scope: ScopeSpec,
    host_capabilities: Arc<dyn HostCapabilityLookup>,
}

impl<S> ScopedStep<S> {
    pub fn new(inner: S, scope: ScopeSpec, host_capabilities: Arc<dyn HostCapabilityLookup>) -> Self {
        Self {
            inner,
            scope,
            host_capabilities,
        }
    }
}

#[async_trait]
impl<S: Filter> Filter for ScopedStep<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn run(&self, request: &Request, input: &Activation) -> Result<StepOutput, StepRunError> {
        if spec_selectors_skip(&self.scope.spec_selectors, request) {
            return Ok(StepOutput::new(input.clone()));
        }

        let all_hosts: Vec<String> = input.keys().map(str::to_string).collect();
        let in_scope =
            resolve_in_scope_hosts(&self.scope.host_selectors, &all_hosts, &self.host_capabilities).await;

        let inner_output = self.inner.run(request, input).await?;

        let mut result = Activation::new();
        for host in &all_hosts {
            if in_scope.contains(host) {
                if inner_output.activations.contains(host) {
                    result.set(host, input.get(host).unwrap_or(0.0));
                }
            } else {
                // Out-of-scope hosts pass through unfiltered.
                result.set(host, input.get(host).unwrap_or(0.0));
            }
        }
        Ok(StepOutput::with_stats(result, inner_output.stats))
    }
}

#[async_trait]
impl<S: Weigher> Weigher for ScopedStep<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn run(&self, request: &Request, input: &Activation) -> Result<StepOutput, StepRunError> {
        if spec_selectors_skip(&self.scope.spec_selectors, request) {
            let mut zeroed = Activation::new();
            for host in input.keys() {
                zeroed.set(host, 0.0);
            }
            return Ok(StepOutput::new(zeroed));
        }

        let all_hosts: Vec<String> = input.keys().map(str::to_string).collect();
        let in_scope =
            resolve_in_scope_hosts(&self.scope.host_selectors, &all_hosts, &self.host_capabilities).await;

        let inner_output = self.inner.run(request, input).await?;

        let mut result = Activation::new();
        for host in &all_hosts {
            if in_scope.contains(host) {
                result.set(host, inner_output.activations.get(host).unwrap_or(0.0));
            } else {
                // Out-of-scope hosts are frozen at NoEffect.
                result.set(host, 0.0);
            }
        }
        Ok(StepOutput::with_stats(result, inner_output.stats))
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
