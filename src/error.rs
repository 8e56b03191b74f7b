//! Error types for candidate generation and the search run.

/// A single attempt could not produce a candidate.
///
/// These are transient: the worker logs them and retries immediately
/// without counting the attempt.
#[derive(Debug, thiserror::Error)]
pub enum CandidateError {
    #[error("entropy source failed: {0}")]
    Entropy(#[from] rand::Error),
    #[error("drawn scalar is not a valid secp256k1 secret key")]
    InvalidScalar,
}

/// Errors that end a search run.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("worker {worker}: entropy source unavailable after {failures} consecutive failures: {source}")]
    EntropyUnavailable {
        worker: usize,
        failures: u32,
        source: CandidateError,
    },
    #[error("all workers exited after {found} of {target} matches")]
    WorkersExhausted { found: usize, target: usize },
    #[error("failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("thread {0} panicked")]
    ThreadPanicked(String),
}
