//! Process-wide tunables for the measurement pipeline.
//!
//! Every constant here has an environment-variable override consumed at
//! startup by the embedding binary (see `bench-cli`); `bench-core` itself
//! never reads the environment, it only exposes the defaults and a small
//! helper for parsing overrides so callers don't duplicate the parsing logic.

use std::env;

/// Minimum raw cycle delta (candidate − baseline) required before a
/// calibration round is considered reliable.
pub const SIGNAL_THRESHOLD: f64 = 100.0;

/// Sleep duration while the Executor gates on a missing control group.
pub const GATE_SLEEP_MS: u64 = 100;

/// Measurement rounds run per Executor maintenance cycle.
pub const ROUNDS_PER_CYCLE: usize = 4;

/// Minimum spacing between dashboard renders.
pub const RENDER_INTERVAL_MS: u64 = 1_000;

/// Repeat count never grows past this power of two. A candidate that cannot
/// clear `SIGNAL_THRESHOLD` by the time `count` reaches this cap is logged
/// and measured at the capped count instead of stalling calibration forever.
pub const REPEAT_COUNT_CAP: u64 = 1 << 40;

/// Sample count above which a 95% confidence interval is considered defined.
pub const MIN_SAMPLES_FOR_CI: u64 = 30;

/// t-digest compression factor: `maxWeight = total_weight / COMPRESSION`.
pub const TDIGEST_COMPRESSION: f64 = 100.0;

/// t-digest centroid count that triggers a compression pass.
pub const TDIGEST_COMPRESS_AT: usize = 4 * TDIGEST_COMPRESSION as usize;

/// Read an environment variable as `u64`, falling back to `default` if unset
/// or unparsable. Used by `bench-cli` to let operators tune cadence without a
/// rebuild; `bench-core` does not call this itself.
pub fn env_u64(var: &str, default: u64) -> u64 {
    env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_u64_falls_back_on_missing() {
        assert_eq!(env_u64("BENCH_CORE_TEST_DOES_NOT_EXIST", 42), 42);
    }

    #[test]
    fn repeat_count_cap_is_power_of_two() {
        assert!(REPEAT_COUNT_CAP.is_power_of_two());
    }
}
