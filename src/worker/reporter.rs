//! Running-average throughput reporting.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{select, tick, Receiver};

use crate::error::SearchError;

/// A point-in-time view of the search throughput.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroughputSample {
    /// Time since the run started
    pub elapsed: Duration,
    /// Guesses flushed so far
    pub total_guesses: u64,
    /// `total_guesses / elapsed` (running average since start)
    pub average_rate: f64,
}

/// Owned guess total, updated only through batch messages.
#[derive(Debug, Default)]
pub struct ThroughputMeter {
    total_guesses: u64,
}

impl ThroughputMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one worker batch into the total.
    #[inline]
    pub fn record(&mut self, batch: u64) {
        self.total_guesses = self.total_guesses.saturating_add(batch);
    }

    /// Computes the running average at `elapsed` since the run started.
    pub fn sample(&self, elapsed: Duration) -> ThroughputSample {
        let secs = elapsed.as_secs_f64();
        let average_rate = if secs > 0.0 {
            self.total_guesses as f64 / secs
        } else {
            0.0
        };

        ThroughputSample {
            elapsed,
            total_guesses: self.total_guesses,
            average_rate,
        }
    }
}

/// Receives every periodic sample.
pub type ReportSink = Box<dyn FnMut(&ThroughputSample) + Send>;

/// Background thread aggregating guess batches and emitting samples on a
/// fixed interval.
pub struct ThroughputReporter {
    handle: JoinHandle<ThroughputSample>,
}

impl ThroughputReporter {
    /// Spawns the reporter thread.
    ///
    /// The thread exits, returning the final sample, once every batch sender
    /// has been dropped.
    pub fn spawn(
        batches: Receiver<u64>,
        interval: Duration,
        started: Instant,
        mut sink: ReportSink,
    ) -> io::Result<Self> {
        let handle = thread::Builder::new()
            .name("vanity-reporter".into())
            .spawn(move || {
                let ticker = tick(interval);
                let mut meter = ThroughputMeter::new();

                loop {
                    select! {
                        recv(batches) -> batch => match batch {
                            Ok(batch) => meter.record(batch),
                            Err(_) => break,
                        },
                        recv(ticker) -> _ => sink(&meter.sample(started.elapsed())),
                    }
                }

                meter.sample(started.elapsed())
            })?;

        Ok(Self { handle })
    }

    /// Waits for the reporter to drain and returns the final sample.
    pub fn join(self) -> Result<ThroughputSample, SearchError> {
        self.handle
            .join()
            .map_err(|_| SearchError::ThreadPanicked("vanity-reporter".into()))
    }

    /// Sink printing one line per sample.
    pub fn stdout_sink() -> ReportSink {
        Box::new(|sample: &ThroughputSample| {
            println!(
                "[{:>4}s] Running average guesses per second: {:.2} ({} total)",
                sample.elapsed.as_secs(),
                sample.average_rate,
                format_number(sample.total_guesses)
            );
        })
    }
}

/// Formats a count with a K/M/B suffix.
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use super::*;

    #[test]
    fn test_sample_before_start_is_zero() {
        let mut meter = ThroughputMeter::new();
        meter.record(1000);
        assert_eq!(meter.sample(Duration::ZERO).average_rate, 0.0);
    }

    #[test]
    fn test_running_average_converges_to_constant_rate() {
        const RATE: u64 = 50_000;
        // Workers start half a second after the clock does.
        let startup = Duration::from_millis(500);
        let mut meter = ThroughputMeter::new();
        let mut previous_total = 0;
        let mut errors = Vec::new();

        for second in 1..=1000u64 {
            for _ in 0..RATE / 1000 {
                meter.record(1000);
            }
            let sample = meter.sample(Duration::from_secs(second) + startup);
            assert!(sample.total_guesses >= previous_total);
            previous_total = sample.total_guesses;
            errors.push((sample.average_rate - RATE as f64).abs() / RATE as f64);
        }

        assert!(errors[0] > 0.1);
        assert!(errors[999] < 0.001);
        assert!(errors.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_reporter_folds_every_batch() {
        let (batches_tx, batches_rx) = unbounded();
        let (samples_tx, samples_rx) = unbounded();
        let sink: ReportSink = Box::new(move |sample: &ThroughputSample| {
            let _ = samples_tx.send(*sample);
        });

        let reporter = ThroughputReporter::spawn(
            batches_rx,
            Duration::from_millis(5),
            Instant::now(),
            sink,
        )
        .unwrap();

        for _ in 0..3 {
            batches_tx.send(1000).unwrap();
            std::thread::sleep(Duration::from_millis(10));
        }
        batches_tx.send(250).unwrap();
        drop(batches_tx);

        let last = reporter.join().unwrap();
        assert_eq!(last.total_guesses, 3250);

        let totals: Vec<u64> = samples_rx.iter().map(|s| s.total_guesses).collect();
        assert!(!totals.is_empty());
        assert!(totals.windows(2).all(|w| w[0] <= w[1]));
        assert!(totals.iter().all(|&t| t <= 3250));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_500), "1.50K");
        assert_eq!(format_number(2_340_000), "2.34M");
        assert_eq!(format_number(7_000_000_000), "7.00B");
    }
}
