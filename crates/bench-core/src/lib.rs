//! Core runtime for a micro-architectural instruction-sequence benchmark
//! harness: turns a stream of opaque machine-code blobs into calibrated,
//! denoised per-iteration cycle measurements relative to an empty control
//! group.
//!
//! ```text
//! insn-bench-core
//! ├── region       executable-memory manager (mmap → copy → mprotect RX)
//! ├── trampoline   architecture-specific cycle-counter invocation stub
//! ├── calibrator   adaptive repeat-count selection
//! ├── queue        mutex+condvar MPMC FIFO linking the three stages
//! ├── executor     measurement scheduler: registry + randomized rounds
//! ├── stats        Welford running moments per snippet
//! ├── tdigest      bounded-memory quantile/CDF sketch per snippet
//! ├── aggregator   statistics consumer: folds samples, drives rendering
//! └── dashboard    ASCII dashboard renderer
//! ```
//!
//! The assembler front-end that turns text into the byte blobs this crate
//! consumes, and the CLI/driver that decides what to benchmark, are both
//! external collaborators — out of scope here by design. See `SPEC_FULL.md`
//! at the repository root.

pub mod aggregator;
pub mod calibrator;
pub mod config;
pub mod dashboard;
pub mod executor;
pub mod queue;
pub mod region;
pub mod snippet;
pub mod stats;
pub mod tdigest;
pub mod trampoline;

pub use aggregator::StatsAggregator;
pub use calibrator::RepeatCountCalibrator;
pub use executor::Executor;
pub use queue::MpmcQueue;
pub use region::ExecutableRegion;
pub use snippet::{Cancel, Id, Sample, Snippet, SnippetRole, CONTROL_ID};
pub use stats::Stat;
pub use tdigest::TDigest;
