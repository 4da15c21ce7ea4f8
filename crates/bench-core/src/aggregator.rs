//! Statistics consumer: folds samples into per-snippet Welford moments and
//! t-digests, and renders the dashboard on a monotonic-clock cadence.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RENDER_INTERVAL_MS;
use crate::dashboard;
use crate::queue::MpmcQueue;
use crate::snippet::{Id, Sample};
use crate::stats::Stat;
use crate::tdigest::TDigest;

/// Owns all per-snippet aggregation state. Single-threaded: only the sample
/// queue it was built with is shared with the Executor.
pub struct StatsAggregator {
    sample_queue: Arc<MpmcQueue<Sample>>,
    stats: BTreeMap<Id, Stat>,
    digests: BTreeMap<Id, TDigest>,
    last_render: Option<Instant>,
}

impl StatsAggregator {
    pub fn new(sample_queue: Arc<MpmcQueue<Sample>>) -> Self {
        Self {
            sample_queue,
            stats: BTreeMap::new(),
            digests: BTreeMap::new(),
            last_render: None,
        }
    }

    /// Consume samples and render forever. Never returns.
    pub fn run(&mut self) -> ! {
        loop {
            self.step_blocking();
        }
    }

    /// Block for at least one sample, drain whatever else is pending, fold
    /// it all in, and render if the cadence allows. Exposed for tests.
    pub fn step_blocking(&mut self) {
        let first = self.sample_queue.pop();
        self.ingest(first);
        for sample in self.sample_queue.pop_all() {
            self.ingest(sample);
        }
        let _ = self.maybe_render(&mut io::stdout());
    }

    /// Drain whatever is currently queued without blocking, fold it in, and
    /// render if due. Used by the demo CLI's poll loop and by tests that
    /// don't want to block on an empty queue.
    pub fn drain_and_maybe_render(&mut self, out: &mut impl Write) -> io::Result<()> {
        for sample in self.sample_queue.pop_all() {
            self.ingest(sample);
        }
        self.maybe_render(out)
    }

    fn ingest(&mut self, sample: Sample) {
        self.stats.entry(sample.id).or_default().update(sample.cycles);
        self.digests.entry(sample.id).or_default().add(sample.cycles);
    }

    /// Render at most once per `RENDER_INTERVAL_MS`, measured against a
    /// monotonic clock so wall-clock adjustments can't trigger a double
    /// render or starve one.
    fn maybe_render(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.stats.is_empty() {
            return Ok(());
        }
        let now = Instant::now();
        let due = match self.last_render {
            None => true,
            Some(last) => now.duration_since(last) >= Duration::from_millis(RENDER_INTERVAL_MS),
        };
        if !due {
            return Ok(());
        }
        self.last_render = Some(now);
        dashboard::render(out, &self.stats, &self.digests)
    }

    /// Snapshot of the current mean for `id`, if any samples have arrived
    /// for it yet. Exposed for tests and for an embedding binary that wants
    /// programmatic access alongside the dashboard.
    pub fn mean(&self, id: Id) -> Option<f64> {
        self.stats.get(&id).map(|s| s.mean())
    }

    pub fn sample_count(&self, id: Id) -> u64 {
        self.stats.get(&id).map(|s| s.count()).unwrap_or(0)
    }
}
