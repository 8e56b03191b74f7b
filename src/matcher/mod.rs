//! Match predicate for derived addresses.
//!
//! An address matches when its lowercase hex encoding starts with the
//! configured prefix, by default a run of zero nibbles.

mod prefix;

pub use prefix::{InvalidPrefix, MatchCriterion};
