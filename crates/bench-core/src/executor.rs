//! The measurement scheduler: drains the input queues, owns the registry of
//! live snippets, runs randomized measurement rounds, and emits samples.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::seq::SliceRandom;

use crate::calibrator::RepeatCountCalibrator;
use crate::config::{GATE_SLEEP_MS, ROUNDS_PER_CYCLE};
use crate::queue::MpmcQueue;
use crate::region::ExecutableRegion;
use crate::snippet::{Cancel, Id, Sample, Snippet, SnippetRole, CONTROL_ID};
use crate::trampoline;

struct RegistryEntry {
    role: SnippetRole,
    region: ExecutableRegion,
}

/// Owns the snippet registry and the single global [`RepeatCountCalibrator`],
/// and runs the measurement loop described in the design doc's § 4.4.
///
/// Single-threaded by design: all registry and calibrator state is
/// thread-local to whichever thread calls [`Executor::run`]. The only shared
/// state is the three queues it was built with.
pub struct Executor {
    code_queue: Arc<MpmcQueue<Snippet>>,
    cancel_queue: Arc<MpmcQueue<Cancel>>,
    sample_queue: Arc<MpmcQueue<Sample>>,
    registry: HashMap<Id, RegistryEntry>,
    calibrator: RepeatCountCalibrator,
    /// Candidate ids registered before a baseline existed; calibrated in a
    /// later maintenance pass once one shows up. Holds only `Id`s, never
    /// pointers, so nothing here can dangle across cycles.
    awaiting_baseline: Vec<Id>,
}

impl Executor {
    pub fn new(
        code_queue: Arc<MpmcQueue<Snippet>>,
        cancel_queue: Arc<MpmcQueue<Cancel>>,
        sample_queue: Arc<MpmcQueue<Sample>>,
    ) -> Self {
        Self {
            code_queue,
            cancel_queue,
            sample_queue,
            registry: HashMap::new(),
            calibrator: RepeatCountCalibrator::new(),
            awaiting_baseline: Vec::new(),
        }
    }

    /// Run the measurement loop until the process exits. Never returns.
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// One maintenance pass plus (if a baseline is registered)
    /// `ROUNDS_PER_CYCLE` measurement rounds. Exposed separately from
    /// [`Executor::run`] so tests can drive a bounded number of cycles.
    pub fn step(&mut self) {
        self.maintenance();

        if !self.registry.contains_key(&CONTROL_ID) {
            thread::sleep(Duration::from_millis(GATE_SLEEP_MS));
            return;
        }

        let mut samples = Vec::new();
        for _ in 0..ROUNDS_PER_CYCLE {
            self.run_round(&mut samples);
        }
        self.sample_queue.push_all(samples);
    }

    fn maintenance(&mut self) {
        for snippet in self.code_queue.pop_all() {
            self.register(snippet);
        }
        for Cancel(id) in self.cancel_queue.pop_all() {
            self.registry.remove(&id);
            self.awaiting_baseline.retain(|&pending| pending != id);
        }
    }

    fn register(&mut self, snippet: Snippet) {
        let role = SnippetRole::of(snippet.id);
        let region = ExecutableRegion::new(&snippet.bytes);
        if self.registry.insert(snippet.id, RegistryEntry { role, region }).is_some() {
            log::debug!("id {} re-registered, dropping prior region", snippet.id);
        }

        match role {
            SnippetRole::Baseline => self.calibrate_awaiting(),
            SnippetRole::Candidate(id) => {
                if let Some(baseline_ptr) = self.baseline_ptr() {
                    let candidate_ptr = self.registry[&id].region.exec_ptr();
                    // SAFETY: both regions were just inserted into the
                    // registry and are not removed until a later
                    // maintenance pass.
                    unsafe { self.calibrator.calibrate(baseline_ptr, candidate_ptr) };
                } else {
                    self.awaiting_baseline.push(id);
                }
            }
        }
    }

    fn calibrate_awaiting(&mut self) {
        let Some(baseline_ptr) = self.baseline_ptr() else {
            return;
        };
        for id in std::mem::take(&mut self.awaiting_baseline) {
            let Some(entry) = self.registry.get(&id) else {
                continue; // cancelled before its baseline arrived
            };
            let candidate_ptr = entry.region.exec_ptr();
            // SAFETY: both regions are live registry entries at this point.
            unsafe { self.calibrator.calibrate(baseline_ptr, candidate_ptr) };
        }
    }

    fn baseline_ptr(&self) -> Option<*const ()> {
        self.registry.get(&CONTROL_ID).map(|e| e.region.exec_ptr())
    }

    fn run_round(&self, samples: &mut Vec<Sample>) {
        let Some(baseline_ptr) = self.baseline_ptr() else {
            return;
        };

        let mut candidate_ids: Vec<Id> = self
            .registry
            .iter()
            .filter(|(_, e)| matches!(e.role, SnippetRole::Candidate(_)))
            .map(|(&id, _)| id)
            .collect();
        candidate_ids.shuffle(&mut rand::rng());

        let repeat_count = self.calibrator.get_count();

        // SAFETY: baseline_ptr comes from a live registry entry for the
        // duration of this round.
        let raw_baseline = unsafe { measured(baseline_ptr, repeat_count) };

        for id in candidate_ids {
            let Some(entry) = self.registry.get(&id) else {
                continue; // cancelled mid-round; skip rather than panic
            };
            let candidate_ptr = entry.region.exec_ptr();
            // SAFETY: candidate_ptr comes from a live registry entry looked
            // up just above, within this same round.
            let raw = unsafe { measured(candidate_ptr, repeat_count) };
            let cycles = (raw - raw_baseline) as f64 / repeat_count as f64;
            samples.push(Sample::new(id, cycles));
        }
    }

    /// Current shared repeat count, exposed for diagnostics and tests.
    pub fn repeat_count(&self) -> u64 {
        self.calibrator.get_count()
    }

    /// Number of entries currently in the registry (baseline + candidates),
    /// exposed for diagnostics and tests.
    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }
}

/// Invoke the trampoline three times, yielding between the second and third
/// call to bleed scheduler pressure, and keep only the last measurement.
///
/// # Safety
/// `ptr` must point at a live, executable, ABI-conformant snippet body for
/// the duration of this call.
unsafe fn measured(ptr: *const (), repeat_count: u64) -> i64 {
    // SAFETY: forwarded from this function's safety contract.
    unsafe { trampoline::measure(ptr, repeat_count) };
    // SAFETY: forwarded from this function's safety contract.
    unsafe { trampoline::measure(ptr, repeat_count) };
    thread::yield_now();
    // SAFETY: forwarded from this function's safety contract.
    unsafe { trampoline::measure(ptr, repeat_count) }
}
