// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

use super::*;

#[test]
fn transient_and_fatal_are_retriable() {
    assert!(BoundaryError::Transient("x".into()).is_retriable());
    assert!(BoundaryError::Fatal("x".into()).is_retriable());
}

#[test]
fn validation_not_found_conflict_are_not_retriable() {
    assert!(!BoundaryError::Validation("x".into()).is_retriable());
    assert!(!BoundaryError::NotFound("x".into()).is_retriable());
    assert!(!BoundaryError::Conflict("x".into()).is_retriable());
}
