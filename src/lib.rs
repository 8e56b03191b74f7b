//! # zero_vanity
//!
//! Multi-core brute-force search for Ethereum addresses with a required hex
//! prefix (by default eight leading zeros), either as account addresses of
//! random private keys or as CREATE2 contract addresses of random salts.
//!
//! ## Architecture
//!
//! - `crypto`: Keccak-256, public-key-to-address and CREATE2 derivation
//! - `matcher`: Prefix match criterion
//! - `worker`: Search spaces, workers, result collector, throughput reporter
//! - `config`: Command-line configuration
//! - `error`: Candidate and search errors

pub mod config;
pub mod crypto;
pub mod error;
pub mod matcher;
pub mod worker;

pub use config::{Config, ConfigError, SearchMode};
pub use crypto::{create2_address, init_code_hash, keccak256, Address, Keypair};
pub use error::{CandidateError, SearchError};
pub use matcher::MatchCriterion;
pub use worker::{
    CancellationToken, Create2Space, KeypairSpace, RunMode, SearchMatch, SearchOptions,
    SearchReport, SearchSpace, ThroughputReporter, ThroughputSample, WorkerPool,
};
