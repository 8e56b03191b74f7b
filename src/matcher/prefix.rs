//! Prefix matching implementation.

use std::fmt;
use std::str::FromStr;

use crate::crypto::Address;

/// The prefix contained a character that is not a hex digit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("prefix {prefix:?} must contain only hex characters (0-9, a-f)")]
pub struct InvalidPrefix {
    pub prefix: String,
}

/// A compiled prefix for allocation-free matching.
///
/// Input is case-insensitive; the prefix is normalized to lowercase and
/// compared nibble by nibble against the address bytes, which is equivalent
/// to `address.to_hex().starts_with(prefix)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriterion {
    /// The normalized (lowercase) prefix
    prefix: String,
    /// The prefix decoded to nibble values
    nibbles: Vec<u8>,
}

impl MatchCriterion {
    /// Creates a criterion from a hex prefix.
    pub fn new(prefix: impl Into<String>) -> Result<Self, InvalidPrefix> {
        let prefix = prefix.into().to_lowercase();

        let nibbles = prefix
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| InvalidPrefix {
                prefix: prefix.clone(),
            })?;

        Ok(Self { prefix, nibbles })
    }

    /// Creates a criterion requiring `count` leading zero nibbles.
    pub fn leading_zeros(count: usize) -> Self {
        Self {
            prefix: "0".repeat(count),
            nibbles: vec![0; count],
        }
    }

    /// Returns the normalized prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true for the empty prefix, which matches every address.
    pub fn is_empty(&self) -> bool {
        self.nibbles.is_empty()
    }

    /// Matches an address against this criterion.
    #[inline]
    pub fn matches(&self, address: &Address) -> bool {
        if self.nibbles.len() > Address::HEX_LEN {
            return false;
        }

        self.nibbles
            .iter()
            .enumerate()
            .all(|(i, &nibble)| address.nibble(i) == nibble)
    }

    /// Returns the estimated number of attempts to find a match (16^n).
    pub fn estimated_difficulty(&self) -> u64 {
        16u64.saturating_pow(self.nibbles.len() as u32)
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        let diff = self.estimated_difficulty();
        match diff {
            0..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=100_000 => "Easy (seconds)".into(),
            100_001..=10_000_000 => "Medium (minutes)".into(),
            10_000_001..=1_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}

impl FromStr for MatchCriterion {
    type Err = InvalidPrefix;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for MatchCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.prefix)
    }
}
