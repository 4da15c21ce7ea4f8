//! The `run` subcommand: wires up the three queues, spawns the Executor and
//! Statistics threads, pushes the demo snippet table, and lets the dashboard
//! run until the configured duration elapses.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bench_core::{Executor, MpmcQueue, StatsAggregator};

use crate::demos;

pub struct RunConfig {
    pub duration_secs: u64,
}

pub fn run(config: RunConfig) {
    let code_queue = Arc::new(MpmcQueue::new());
    let cancel_queue = Arc::new(MpmcQueue::new());
    let sample_queue = Arc::new(MpmcQueue::new());

    let mut executor = Executor::new(code_queue.clone(), cancel_queue.clone(), sample_queue.clone());
    let executor_handle = thread::spawn(move || executor.run());

    let mut aggregator = StatsAggregator::new(sample_queue);
    let stats_handle = thread::spawn(move || aggregator.run());

    code_queue.push(bench_core::Snippet::baseline());
    for demo in demos::table() {
        log::info!("registering demo snippet {} ({})", demo.id, demo.label);
        code_queue.push(bench_core::Snippet::new(demo.id, demo.bytes.to_vec()));
    }

    let deadline = Instant::now() + Duration::from_secs(config.duration_secs);
    while Instant::now() < deadline {
        thread::sleep(Duration::from_millis(100));
    }

    log::info!("run duration elapsed, exiting");
    // Both worker threads loop forever (`Executor::run`, `StatsAggregator::run`
    // never return); there is nothing to join on a clean shutdown, matching
    // § 6's "exit code 0 on clean shutdown" contract for the demo driver.
    let _ = (executor_handle, stats_handle);
}
