//! Adaptive repeat-count calibration.
//!
//! `count` is a single value shared across every registered snippet: once it
//! grows to clear the signal threshold for the slowest-to-calibrate snippet,
//! every other measurement benefits from the same headroom. It only ever
//! grows (I3 in the design doc).
//!
//! The buffer-of-snippets-awaiting-a-baseline described in the design doc is
//! owned by the [`crate::executor::Executor`], not by this type: it only ever
//! holds `Id`s (safe, copyable), never pointers into regions that might be
//! cancelled before the baseline arrives. This calibrator itself only ever
//! borrows raw pointers for the duration of a single `calibrate` call, so it
//! never stores a view across maintenance cycles.

use crate::config::{REPEAT_COUNT_CAP, SIGNAL_THRESHOLD};
use crate::trampoline;

/// Global, monotonically non-decreasing repeat-count state.
pub struct RepeatCountCalibrator {
    count: u64,
}

impl Default for RepeatCountCalibrator {
    fn default() -> Self {
        Self::new()
    }
}

impl RepeatCountCalibrator {
    pub fn new() -> Self {
        Self { count: 1 }
    }

    pub fn get_count(&self) -> u64 {
        self.count
    }

    /// Grow `count` by doubling until `(candidate − baseline) ≥
    /// SIGNAL_THRESHOLD` at the current count, or until `count` reaches
    /// `REPEAT_COUNT_CAP`.
    ///
    /// # Safety
    /// `baseline_ptr` and `candidate_ptr` must point at live, executable,
    /// ABI-conformant snippet bodies for the entire call — the caller (the
    /// Executor, during its maintenance phase, before either region can be
    /// removed from the registry) upholds this.
    pub unsafe fn calibrate(&mut self, baseline_ptr: *const (), candidate_ptr: *const ()) {
        loop {
            // SAFETY: forwarded from this function's safety contract.
            let b = unsafe { trampoline::measure(baseline_ptr, self.count) };
            // SAFETY: forwarded from this function's safety contract.
            let r = unsafe { trampoline::measure(candidate_ptr, self.count) } - b;

            if r as f64 >= SIGNAL_THRESHOLD {
                return;
            }
            if self.count >= REPEAT_COUNT_CAP {
                log::warn!(
                    "repeat count capped at {} without clearing signal threshold \
                     (delta={r}); candidate may be dead-code-eliminated",
                    self.count
                );
                return;
            }
            self.count = self.count.saturating_mul(2).min(REPEAT_COUNT_CAP);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::ExecutableRegion;
    use crate::trampoline::RET_ONLY;

    #[test]
    fn count_never_decreases_across_calibrations() {
        let baseline = ExecutableRegion::new(&RET_ONLY);
        let candidate = ExecutableRegion::new(&RET_ONLY);
        let mut cal = RepeatCountCalibrator::new();
        let mut last = cal.get_count();
        for _ in 0..5 {
            // SAFETY: both regions live for the duration of this call.
            unsafe { cal.calibrate(baseline.exec_ptr(), candidate.exec_ptr()) };
            assert!(cal.get_count() >= last);
            last = cal.get_count();
        }
    }

    #[test]
    fn calibration_terminates_and_respects_cap() {
        let baseline = ExecutableRegion::new(&RET_ONLY);
        let candidate = ExecutableRegion::new(&RET_ONLY);
        let mut cal = RepeatCountCalibrator::new();
        // SAFETY: both regions live for the duration of this call.
        unsafe { cal.calibrate(baseline.exec_ptr(), candidate.exec_ptr()) };
        assert!(cal.get_count() <= REPEAT_COUNT_CAP);
        assert!(cal.get_count().is_power_of_two());
    }
}
