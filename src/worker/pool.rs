//! Worker pool management.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, select, unbounded, Receiver};
use tracing::{debug, info};

use crate::crypto::Address;
use crate::error::SearchError;
use crate::matcher::MatchCriterion;

use super::collector::{MatchSink, ResultCollector};
use super::cpu::{CpuWorker, OnMatch, WorkerExit};
use super::reporter::{ReportSink, ThroughputReporter};
use super::{CancellationToken, SearchSpace};

/// A match, or a fatal error, as sent by a worker.
pub type WorkerEvent = Result<SearchMatch, SearchError>;

/// Result of a successful search attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// The secret input: a private key or a CREATE2 salt
    pub secret: [u8; 32],
    /// The derived address
    pub address: Address,
    /// The ID of the worker that found this result
    pub worker_id: usize,
}

impl SearchMatch {
    /// Secret as hex (no 0x).
    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret)
    }
}

/// How a run terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Stop after `target` matches have been collected.
    Bounded { target: usize },
    /// Telemetry only: log matches inline and run until interrupted.
    Unbounded,
}

/// Parameters of one search run.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Number of worker threads
    pub workers: usize,
    /// The criterion every address is tested against
    pub criterion: MatchCriterion,
    /// Interval between throughput samples
    pub report_interval: Duration,
    /// Bounded or unbounded run
    pub mode: RunMode,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Matches in arrival order
    pub matches: Vec<SearchMatch>,
    /// Guesses flushed by all workers
    pub total_guesses: u64,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl SearchReport {
    /// Average guesses per second over the whole run.
    pub fn guesses_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_guesses as f64 / secs
        } else {
            0.0
        }
    }
}

/// Manages a pool of workers for one search run.
pub struct WorkerPool {
    /// Bounded or unbounded run
    mode: RunMode,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<WorkerExit>>>,
    /// Channel receiver for matches and fatal errors
    events: Option<Receiver<WorkerEvent>>,
    /// Reporter thread (Option to allow taking during join)
    reporter: Option<ThroughputReporter>,
    /// Receives each bounded-mode match as it is collected
    on_match: Option<MatchSink>,
    /// Shared stop signal
    cancel: CancellationToken,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Spawns the reporter and `options.workers` workers over `space`.
    pub fn spawn<S: SearchSpace>(
        space: S,
        options: &SearchOptions,
        sink: ReportSink,
    ) -> Result<Self, SearchError> {
        let (events_tx, events_rx) = bounded(0);
        let (batches_tx, batches_rx) = unbounded();
        let cancel = CancellationToken::new();
        let start_time = Instant::now();

        let reporter =
            ThroughputReporter::spawn(batches_rx, options.report_interval, start_time, sink)?;

        let on_match = match options.mode {
            RunMode::Bounded { .. } => OnMatch::Deliver,
            RunMode::Unbounded => OnMatch::LogAndContinue,
        };

        let mut pool = Self {
            mode: options.mode,
            handles: Some(Vec::with_capacity(options.workers)),
            events: Some(events_rx),
            reporter: Some(reporter),
            on_match: None,
            cancel,
            start_time,
        };

        for id in 0..options.workers {
            let space = space.clone();
            let criterion = options.criterion.clone();
            let worker_events = events_tx.clone();
            let worker_batches = batches_tx.clone();
            let cancel = pool.cancel.clone();

            let spawned = thread::Builder::new()
                .name(format!("vanity-worker-{}", id))
                .spawn(move || {
                    let worker = CpuWorker::new(
                        id,
                        space,
                        criterion,
                        on_match,
                        worker_events,
                        worker_batches,
                        cancel,
                    );
                    worker.run(&mut rand::thread_rng())
                });

            match spawned {
                Ok(handle) => {
                    if let Some(handles) = pool.handles.as_mut() {
                        handles.push(handle);
                    }
                }
                Err(err) => {
                    // Senders must close before the pool drop joins the reporter.
                    drop(events_tx);
                    drop(batches_tx);
                    return Err(err.into());
                }
            }
        }

        // Drop the extra sender clones so the channels close when all workers finish
        drop(events_tx);
        drop(batches_tx);

        debug!(workers = options.workers, mode = ?options.mode, "worker pool started");
        Ok(pool)
    }

    /// Sets the sink that sees each match of a bounded run on arrival.
    pub fn with_match_sink(mut self, sink: MatchSink) -> Self {
        self.on_match = Some(sink);
        self
    }

    /// Runs the search to completion according to its mode.
    ///
    /// A bounded run returns once the target is collected; `interrupt` is
    /// ignored. An unbounded run returns when `interrupt` fires or
    /// disconnects, or a worker reports a fatal error.
    pub fn run(self, interrupt: &Receiver<()>) -> Result<SearchReport, SearchError> {
        match self.mode {
            RunMode::Bounded { target } => self.collect(target),
            RunMode::Unbounded => self.run_until(interrupt),
        }
    }

    /// Blocks until `target` matches are collected, then shuts down.
    pub fn collect(mut self, target: usize) -> Result<SearchReport, SearchError> {
        let on_match = self
            .on_match
            .take()
            .unwrap_or_else(|| Box::new(|_: &SearchMatch| {}));
        let outcome = match self.events.take() {
            Some(events) => ResultCollector::new(events, target, on_match).collect(&self.cancel),
            None => Ok(Vec::new()),
        };
        let (total_guesses, elapsed) = self.shutdown()?;

        Ok(SearchReport {
            matches: outcome?,
            total_guesses,
            elapsed,
        })
    }

    /// Runs until interrupted or a worker fails fatally, then shuts down.
    ///
    /// Workers log their own matches in this mode and only send fatal
    /// errors, so the report never carries matches.
    pub fn run_until(mut self, interrupt: &Receiver<()>) -> Result<SearchReport, SearchError> {
        let outcome = match self.events.take() {
            Some(events) => loop {
                select! {
                    recv(events) -> event => match event {
                        Ok(event) => {
                            if let Err(err) = event {
                                break Err(err);
                            }
                        }
                        Err(_) => break Ok(()),
                    },
                    recv(interrupt) -> _ => {
                        info!("interrupted, stopping workers");
                        break Ok(());
                    }
                }
            },
            None => Ok(()),
        };
        let (total_guesses, elapsed) = self.shutdown()?;
        outcome?;

        Ok(SearchReport {
            matches: Vec::new(),
            total_guesses,
            elapsed,
        })
    }

    /// Returns a handle to the shared stop signal.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Cancels, joins every worker, then the reporter.
    fn shutdown(&mut self) -> Result<(u64, Duration), SearchError> {
        self.stop();
        self.events = None;

        if let Some(handles) = self.handles.take() {
            for (id, handle) in handles.into_iter().enumerate() {
                let exit = handle
                    .join()
                    .map_err(|_| SearchError::ThreadPanicked(format!("vanity-worker-{}", id)))?;
                debug!(worker = id, ?exit, "worker joined");
            }
        }

        let last = match self.reporter.take() {
            Some(reporter) => reporter.join()?,
            None => return Ok((0, self.elapsed())),
        };

        Ok((last.total_guesses, last.elapsed))
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
        self.events = None;
        // Wait for workers to finish if they haven't been joined
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
        if let Some(reporter) = self.reporter.take() {
            let _ = reporter.join();
        }
    }
}
