//! Gathers the first N matches and stops the search.

use crossbeam_channel::Receiver;
use tracing::{debug, info};

use crate::error::SearchError;

use super::{CancellationToken, SearchMatch, WorkerEvent};

/// Receives each match as soon as the collector accepts it.
pub type MatchSink = Box<dyn FnMut(&SearchMatch) + Send>;

/// Receives matches from every worker until the target count is reached.
pub struct ResultCollector {
    events: Receiver<WorkerEvent>,
    target: usize,
    on_match: MatchSink,
}

impl ResultCollector {
    pub fn new(events: Receiver<WorkerEvent>, target: usize, on_match: MatchSink) -> Self {
        Self {
            events,
            target,
            on_match,
        }
    }

    /// Blocks until exactly `target` matches have arrived, then cancels the
    /// search and returns them in arrival order. Each match is handed to the
    /// sink on arrival, before the target is reached.
    ///
    /// The receiver is dropped on return, so a worker still blocked
    /// delivering a surplus match is released with a disconnect. A fatal
    /// worker error, or every worker exiting early, also cancels the search.
    pub fn collect(
        mut self,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchMatch>, SearchError> {
        let mut matches = Vec::with_capacity(self.target);

        while matches.len() < self.target {
            match self.events.recv() {
                Ok(Ok(found)) => {
                    info!(
                        worker = found.worker_id,
                        address = %found.address,
                        collected = matches.len() + 1,
                        target = self.target,
                        "match collected"
                    );
                    (self.on_match)(&found);
                    matches.push(found);
                }
                Ok(Err(err)) => {
                    cancel.cancel();
                    return Err(err);
                }
                Err(_) => {
                    cancel.cancel();
                    return Err(SearchError::WorkersExhausted {
                        found: matches.len(),
                        target: self.target,
                    });
                }
            }
        }

        if cancel.cancel() {
            debug!(target = self.target, "target reached, stopping workers");
        }
        Ok(matches)
    }
}
