//! Runtime configuration for the zero-prefix search.

use std::str::FromStr;
use std::time::Duration;

use clap::Parser;

use crate::crypto::{init_code_hash, Address};
use crate::matcher::{InvalidPrefix, MatchCriterion};
use crate::worker::{Create2Space, RunMode, SearchOptions};

/// Default required prefix: eight zero nibbles.
pub const DEFAULT_PREFIX: &str = "00000000";

/// Default number of worker threads.
pub const DEFAULT_WORKERS: usize = 20;

/// What the search draws and derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Random private keys, matched on their account address
    #[default]
    Address,
    /// Random salts, matched on the CREATE2 contract address
    Create2,
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "address" | "key" | "eoa" => Ok(SearchMode::Address),
            "create2" | "contract" | "salt" => Ok(SearchMode::Create2),
            _ => Err(format!("Unknown search mode: {}", s)),
        }
    }
}

/// Ethereum Leading-Zero Address Miner
///
/// Searches random private keys (address mode) or CREATE2 salts (create2
/// mode) until the derived address starts with the given hex prefix.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Search mode: address or create2
    #[arg(short, long, default_value = "address")]
    pub mode: SearchMode,

    /// Required address prefix (hex characters only: 0-9, a-f)
    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Number of worker threads
    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Stop after finding N matches (0 = run forever, telemetry only)
    #[arg(short = 'n', long, default_value_t = 3)]
    pub count: usize,

    /// Throughput report interval in seconds
    #[arg(short = 'r', long, default_value_t = 1)]
    pub report_interval: u64,

    /// CREATE2 deployer address (20 bytes, hex with or without 0x)
    #[arg(long)]
    pub deployer: Option<String>,

    /// Contract init code (hex); hashed once at startup
    #[arg(long, conflicts_with = "init_code_hash")]
    pub init_code: Option<String>,

    /// keccak256(init code), 32 bytes hex
    #[arg(long)]
    pub init_code_hash: Option<String>,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.criterion()?;

        if self.prefix.len() > Address::HEX_LEN {
            return Err(ConfigError::InvalidPattern(
                "Prefix cannot be longer than 40 characters (full address)".into(),
            ));
        }

        if self.workers == 0 {
            return Err(ConfigError::InvalidConfig(
                "at least one worker is required".into(),
            ));
        }

        if self.count > self.workers {
            return Err(ConfigError::InvalidConfig(format!(
                "count ({}) cannot exceed workers ({}): each worker stops after its first match",
                self.count, self.workers
            )));
        }

        if self.report_interval == 0 {
            return Err(ConfigError::InvalidConfig(
                "report interval must be at least 1 second".into(),
            ));
        }

        if self.mode == SearchMode::Create2 {
            self.create2_space()?;
        }

        Ok(())
    }

    /// Returns the match criterion for the configured prefix.
    pub fn criterion(&self) -> Result<MatchCriterion, ConfigError> {
        Ok(MatchCriterion::new(self.prefix.as_str())?)
    }

    /// Returns the run mode (count 0 means unbounded).
    pub fn run_mode(&self) -> RunMode {
        if self.count == 0 {
            RunMode::Unbounded
        } else {
            RunMode::Bounded { target: self.count }
        }
    }

    /// Returns the throughput report interval.
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval)
    }

    /// Validates and assembles the search options.
    pub fn search_options(&self) -> Result<SearchOptions, ConfigError> {
        self.validate()?;

        Ok(SearchOptions {
            workers: self.workers,
            criterion: self.criterion()?,
            report_interval: self.report_interval(),
            mode: self.run_mode(),
        })
    }

    /// Deployer address as 20 bytes.
    pub fn deployer_address(&self) -> Result<Address, ConfigError> {
        let deployer = self
            .deployer
            .as_deref()
            .ok_or(ConfigError::Missing("--deployer"))?;
        Ok(Address::from_bytes(decode_fixed("deployer", deployer)?))
    }

    /// Init code hash as 32 bytes, from `--init-code-hash` or by hashing `--init-code`.
    pub fn init_code_hash_bytes(&self) -> Result<[u8; 32], ConfigError> {
        match (&self.init_code, &self.init_code_hash) {
            (Some(_), Some(_)) => Err(ConfigError::InvalidConfig(
                "use either --init-code or --init-code-hash, not both".into(),
            )),
            (Some(code), None) => {
                let bytes = hex::decode(strip_0x(code))
                    .map_err(|source| ConfigError::InvalidHex { field: "init_code", source })?;
                Ok(init_code_hash(&bytes))
            }
            (None, Some(hash)) => decode_fixed("init_code_hash", hash),
            (None, None) => Err(ConfigError::Missing("--init-code or --init-code-hash")),
        }
    }

    /// Builds the CREATE2 search space.
    pub fn create2_space(&self) -> Result<Create2Space, ConfigError> {
        Ok(Create2Space::new(
            self.deployer_address()?,
            self.init_code_hash_bytes()?,
        ))
    }
}

fn strip_0x(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

fn decode_fixed<const N: usize>(field: &'static str, value: &str) -> Result<[u8; N], ConfigError> {
    let mut out = [0u8; N];
    hex::decode_to_slice(strip_0x(value), &mut out)
        .map_err(|source| ConfigError::InvalidHex { field, source })?;
    Ok(out)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error(transparent)]
    InvalidPrefix(#[from] InvalidPrefix),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid hex for {field}: {source}")]
    InvalidHex {
        field: &'static str,
        source: hex::FromHexError,
    },
    #[error("create2 mode requires {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPLOYER: &str = "0xcfeA57885743b5C71Da9B1BaA94F21572A6abccb";
    const INIT_CODE_HASH: &str =
        "0x8774a50bcdbcd9f23899eaddc829f407273965470f504c5c85f0e51116802760";

    fn make_test_config(prefix: &str) -> Config {
        Config {
            mode: SearchMode::Address,
            prefix: prefix.into(),
            workers: DEFAULT_WORKERS,
            count: 3,
            report_interval: 1,
            deployer: None,
            init_code: None,
            init_code_hash: None,
        }
    }

    fn make_create2_config() -> Config {
        Config {
            mode: SearchMode::Create2,
            deployer: Some(DEPLOYER.into()),
            init_code_hash: Some(INIT_CODE_HASH.into()),
            ..make_test_config(DEFAULT_PREFIX)
        }
    }

    #[test]
    fn test_defaults_from_cli() {
        let config = Config::parse_from(["zero_vanity"]);
        assert_eq!(config.mode, SearchMode::Address);
        assert_eq!(config.prefix, DEFAULT_PREFIX);
        assert_eq!(config.workers, 20);
        assert_eq!(config.run_mode(), RunMode::Bounded { target: 3 });
        assert_eq!(config.report_interval(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_count_zero_is_unbounded() {
        let config = Config::parse_from(["zero_vanity", "-n", "0"]);
        assert_eq!(config.run_mode(), RunMode::Unbounded);
        assert_eq!(config.search_options().unwrap().mode, RunMode::Unbounded);
    }

    #[test]
    fn test_valid_pattern() {
        let config = make_test_config("DEAD");
        assert!(config.validate().is_ok());
        assert_eq!(config.criterion().unwrap().prefix(), "dead");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            make_test_config("xyz").validate(),
            Err(ConfigError::InvalidPrefix(_))
        ));
        assert!(matches!(
            make_test_config(&"0".repeat(41)).validate(),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_count_cannot_exceed_workers() {
        let config = Config {
            workers: 2,
            ..make_test_config(DEFAULT_PREFIX)
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));

        let config = Config {
            workers: 0,
            count: 0,
            ..make_test_config(DEFAULT_PREFIX)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_create2_space_from_hash() {
        let config = make_create2_config();
        assert!(config.validate().is_ok());

        let space = config.create2_space().unwrap();
        assert_eq!(space.deployer().to_checksum(), DEPLOYER);
        assert_eq!(hex::encode(space.init_code_hash()), &INIT_CODE_HASH[2..]);
    }

    #[test]
    fn test_create2_space_from_init_code() {
        let config = Config {
            init_code: Some("0xDEADBEEF".into()),
            init_code_hash: None,
            ..make_create2_config()
        };

        assert_eq!(
            hex::encode(config.init_code_hash_bytes().unwrap()),
            "d4fd4e189132273036449fc9e11198c739161b4c0116a9a2dccdfa1c492006f1"
        );
    }

    #[test]
    fn test_create2_requires_parameters() {
        let config = Config {
            deployer: None,
            ..make_create2_config()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Missing(_))));

        let config = Config {
            init_code_hash: None,
            ..make_create2_config()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Missing(_))));

        let config = Config {
            init_code: Some("00".into()),
            ..make_create2_config()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_create2_rejects_malformed_hex() {
        let config = Config {
            deployer: Some("0xcfeA57885743b5C71Da9B1BaA94F21572A6abc".into()),
            ..make_create2_config()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHex { field: "deployer", .. })
        ));

        let config = Config {
            init_code_hash: Some("0xzz74a50bcdbcd9f23899eaddc829f407273965470f504c5c85f0e51116802760".into()),
            ..make_create2_config()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHex { field: "init_code_hash", .. })
        ));
    }

    #[test]
    fn test_address_mode_ignores_create2_parameters() {
        let config = Config {
            deployer: Some("not hex".into()),
            ..make_test_config(DEFAULT_PREFIX)
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_search_mode_from_str() {
        assert_eq!("CREATE2".parse::<SearchMode>().unwrap(), SearchMode::Create2);
        assert_eq!("address".parse::<SearchMode>().unwrap(), SearchMode::Address);
        assert!("gpu".parse::<SearchMode>().is_err());
    }
}
