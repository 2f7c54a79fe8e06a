// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fleetsched-core: domain types shared by the scheduling pipeline engine,
//! the decision reconciler and the TTL controller.
//!
//! This crate has no I/O and no knowledge of any concrete filter/weigher
//! policy, fleet inventory backend or persistence fabric — it only
//! describes the data the rest of the workspace agrees on.

pub mod activation;
pub mod clock;
pub mod decision;
pub mod error;
pub mod id;
pub mod pipeline;
pub mod request;
pub mod time_fmt;

pub use activation::Activation;
pub use clock::{Clock, FakeClock, SystemClock};
pub use decision::{
    Certainty, Decision, DecisionRecord, DecisionState, DecisionStatus, StepOutputRecord,
};
pub use error::{BoundaryError, CoreError};
pub use id::{DecisionId, ShortId};
pub use pipeline::{
    HostSelector, HostSelectorOp, PipelineKind, PipelineSpec, ScopeSpec, SpecSelector,
    SpecSelectorAction, StepSpec, TtlConfig,
};
pub use request::{Flavor, Intent, Request};
pub use time_fmt::format_chain_duration;
