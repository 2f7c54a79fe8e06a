// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the fleetsched contributors

//! Human-readable duration formatting for chain segment rendering.

/// Format a duration in milliseconds as the coarsest of `{h, m}`, per
/// spec.md §4.5: `"0m"` when zero, minutes below an hour, whole hours
/// (truncated, not rounded) at or above an hour.
///
/// Examples: `0 -> "0m"`, `59_999 -> "0m"`, `60_000 -> "1m"`,
/// `3_600_000 -> "1h"`, `5_400_000 -> "1h"` (90m truncates to 1h).
pub fn format_chain_duration(ms: u64) -> String {
    let minutes = ms / 60_000;
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        format!("{}h", minutes / 60)
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
