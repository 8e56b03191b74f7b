//! Parallel brute-force search.
//!
//! This module provides:
//! - Search spaces (candidate generation + address derivation)
//! - CPU workers polling a shared cancellation token
//! - A result collector implementing the stop-after-N protocol
//! - A throughput reporter fed by batched guess counts
//! - The worker pool tying them together

mod collector;
mod cpu;
mod pool;
mod reporter;
mod space;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use collector::{MatchSink, ResultCollector};
pub use cpu::{CpuWorker, OnMatch, WorkerExit, BATCH_SIZE, MAX_CONSECUTIVE_FAILURES};
pub use pool::{RunMode, SearchMatch, SearchOptions, SearchReport, WorkerEvent, WorkerPool};
pub use reporter::{format_number, ReportSink, ThroughputMeter, ThroughputReporter, ThroughputSample};
pub use space::{Create2Space, KeypairSpace, SearchSpace};

/// Cooperative stop signal shared by the pool and every worker.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation. Returns true only for the call that flipped it.
    pub fn cancel(&self) -> bool {
        !self.0.swap(true, Ordering::Relaxed)
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
