// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

use super::*;

#[test]
fn fake_clock_holds_time_until_advanced() {
    let clock = FakeClock::new(1_000);
    assert_eq!(clock.epoch_ms(), 1_000);
    assert_eq!(clock.epoch_ms(), 1_000);
    clock.advance_ms(500);
    assert_eq!(clock.epoch_ms(), 1_500);
}

#[test]
fn fake_clock_set_ms_overrides_value() {
    let clock = FakeClock::new(1_000);
    clock.set_ms(42);
    assert_eq!(clock.epoch_ms(), 42);
}

#[test]
fn system_clock_is_nonzero_after_epoch() {
    let clock = SystemClock;
    assert!(clock.epoch_ms() > 0);
}
