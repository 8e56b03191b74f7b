//! CPU-based search worker.

use crossbeam_channel::{SendError, Sender};
use rand::RngCore;
use tracing::{debug, error, info, warn};

use crate::error::SearchError;
use crate::matcher::MatchCriterion;

use super::{CancellationToken, SearchMatch, SearchSpace, WorkerEvent};

/// Attempts counted locally before being flushed to the reporter.
pub const BATCH_SIZE: u64 = 1000;

/// Consecutive candidate failures after which the entropy source is
/// considered permanently unavailable.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 1024;

/// What a worker does with a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnMatch {
    /// Hand the match to the collector and stop.
    Deliver,
    /// Log the match inline and keep searching.
    LogAndContinue,
}

/// Why a worker reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// Delivered its match to the collector.
    Matched,
    /// Observed the cancellation signal.
    Cancelled,
    /// The collector was gone when the worker tried to deliver.
    Disconnected,
    /// The entropy source failed permanently.
    EntropyExhausted,
}

/// A CPU worker that generates and tests candidates.
pub struct CpuWorker<S: SearchSpace> {
    /// Worker ID
    id: usize,
    /// Candidate generation and address derivation
    space: S,
    /// The criterion to match against
    criterion: MatchCriterion,
    /// Deliver or log matches
    on_match: OnMatch,
    /// Channel to send matches and fatal errors
    events: Sender<WorkerEvent>,
    /// Channel to send guess batches
    batches: Sender<u64>,
    /// Shared stop signal
    cancel: CancellationToken,
}

impl<S: SearchSpace> CpuWorker<S> {
    /// Creates a new CPU worker.
    pub fn new(
        id: usize,
        space: S,
        criterion: MatchCriterion,
        on_match: OnMatch,
        events: Sender<WorkerEvent>,
        batches: Sender<u64>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            space,
            criterion,
            on_match,
            events,
            batches,
            cancel,
        }
    }

    /// Runs the worker loop until it matches, is cancelled, or loses its
    /// entropy source.
    ///
    /// Cancellation is polled once per attempt. Non-matching attempts are
    /// flushed to the reporter every [`BATCH_SIZE`] and once more on exit.
    pub fn run<R: RngCore + ?Sized>(&self, rng: &mut R) -> WorkerExit {
        let mut attempts: u64 = 0;
        let mut failures: u32 = 0;

        let exit = loop {
            if self.cancel.is_cancelled() {
                break WorkerExit::Cancelled;
            }

            let candidate = match self.space.generate(rng) {
                Ok(candidate) => {
                    failures = 0;
                    candidate
                }
                Err(err) => {
                    failures += 1;
                    if failures >= MAX_CONSECUTIVE_FAILURES {
                        error!(worker = self.id, failures, %err, "entropy source unavailable");
                        let _ = self.events.send(Err(SearchError::EntropyUnavailable {
                            worker: self.id,
                            failures,
                            source: err,
                        }));
                        break WorkerExit::EntropyExhausted;
                    }
                    warn!(worker = self.id, %err, "candidate generation failed, retrying");
                    continue;
                }
            };

            let address = self.space.derive(&candidate);

            if self.criterion.matches(&address) {
                let found = SearchMatch {
                    secret: S::secret_bytes(&candidate),
                    address,
                    worker_id: self.id,
                };

                match self.on_match {
                    OnMatch::Deliver => {
                        debug!(worker = self.id, %address, "match found, delivering");
                        break match self.events.send(Ok(found)) {
                            Ok(()) => WorkerExit::Matched,
                            Err(SendError(rejected)) => {
                                if let Ok(found) = rejected {
                                    debug!(
                                        worker = self.id,
                                        address = %found.address,
                                        "collector closed, discarding surplus match"
                                    );
                                }
                                WorkerExit::Disconnected
                            }
                        };
                    }
                    OnMatch::LogAndContinue => {
                        info!(
                            worker = self.id,
                            "Found a match! {}: {} Address: {}",
                            S::SECRET_LABEL,
                            found.secret_hex(),
                            found.address
                        );
                    }
                }
            }

            attempts += 1;
            if attempts == BATCH_SIZE {
                let _ = self.batches.send(attempts);
                attempts = 0;
            }
        };

        if attempts > 0 {
            let _ = self.batches.send(attempts);
        }

        debug!(worker = self.id, ?exit, "worker stopped");
        exit
    }
}
