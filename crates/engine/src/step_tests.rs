// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

use super::*;

#[test]
fn min_max_scale_interpolates_linearly() {
    let v = min_max_scale(5.0, 0.0, 10.0, 0.0, 1.0).unwrap();
    assert!((v - 0.5).abs() < 1e-9);
}

#[test]
fn min_max_scale_clamps_below_range() {
    let v = min_max_scale(-5.0, 0.0, 10.0, 0.0, 1.0).unwrap();
    assert_eq!(v, 0.0);
}

#[test]
fn min_max_scale_clamps_above_range() {
    let v = min_max_scale(50.0, 0.0, 10.0, 0.0, 1.0).unwrap();
    assert_eq!(v, 1.0);
}

#[test]
fn min_max_scale_rejects_degenerate_range() {
    let err = min_max_scale(5.0, 3.0, 3.0, 0.0, 1.0).unwrap_err();
    assert!(matches!(err, CoreError::DegenerateScale { in_low } if in_low == 3.0));
}

#[test]
fn no_effect_is_zero() {
    assert_eq!(no_effect(), 0.0);
}

#[test]
fn include_all_hosts_from_request_is_a_copy() {
    let mut input = Activation::new();
    input.set("host1", 1.0);
    let copy = include_all_hosts_from_request(&input);
    assert_eq!(copy.get("host1"), Some(1.0));
}
