//! # Exit Game Configuration
//!
//! Static parameters loaded from YAML:
//!
//! ```yaml
//! owner: "0x1111111111111111111111111111111111111111"
//! operator: "0x2222222222222222222222222222222222222222"
//! bond_amount: "100000000000000000"   # optional, 0.1 ether
//! maturity_period_secs: 604800         # optional, one week
//! challenge_window_secs: 86400         # optional, one day
//! ```
//!
//! The owner may later change the bond and both periods through
//! [`ExitGame::set_maturity_and_bond`](crate::ExitGame::set_maturity_and_bond).

use std::path::Path;

use pcx_core::{Address, Amount};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 0.1 ether in wei.
pub const DEFAULT_BOND: Amount = Amount::new(100_000_000_000_000_000);

/// One week.
pub const DEFAULT_MATURITY_PERIOD_SECS: u64 = 7 * 24 * 60 * 60;

/// One day.
pub const DEFAULT_CHALLENGE_WINDOW_SECS: u64 = 24 * 60 * 60;

fn default_bond() -> Amount {
    DEFAULT_BOND
}

fn default_maturity() -> u64 {
    DEFAULT_MATURITY_PERIOD_SECS
}

fn default_window() -> u64 {
    DEFAULT_CHALLENGE_WINDOW_SECS
}

/// Parameters of one exit game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExitGameConfig {
    /// May pause the game and change bond and periods.
    pub owner: Address,
    /// May submit child-chain blocks.
    pub operator: Address,
    /// Exact bond for `start_exit` and `challenge_before`.
    #[serde(default = "default_bond")]
    pub bond_amount: Amount,
    /// Minimum age of an exit before it can finalize.
    #[serde(default = "default_maturity")]
    pub maturity_period_secs: u64,
    /// Additional time for challenges and responses.
    #[serde(default = "default_window")]
    pub challenge_window_secs: u64,
}

impl ExitGameConfig {
    /// Default parameters for the given owner and operator.
    pub fn new(owner: Address, operator: Address) -> Self {
        Self {
            owner,
            operator,
            bond_amount: DEFAULT_BOND,
            maturity_period_secs: DEFAULT_MATURITY_PERIOD_SECS,
            challenge_window_secs: DEFAULT_CHALLENGE_WINDOW_SECS,
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io(e)
            }
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameters that make the game unusable.
    ///
    /// A zero bond removes the deterrent; a zero contest period lets exits
    /// finalize before anyone can challenge.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bond_amount.is_zero() {
            return Err(ConfigError::Invalid("bond_amount must be non-zero".into()));
        }
        match self.contest_period_secs() {
            None => Err(ConfigError::Invalid(
                "maturity_period_secs + challenge_window_secs overflows".into(),
            )),
            Some(0) => Err(ConfigError::Invalid(
                "maturity period and challenge window cannot both be zero".into(),
            )),
            Some(total) if i64::try_from(total).is_err() => Err(ConfigError::Invalid(format!(
                "contest period of {total}s is out of range"
            ))),
            Some(_) => Ok(()),
        }
    }

    /// `maturity_period_secs + challenge_window_secs`.
    pub fn contest_period_secs(&self) -> Option<u64> {
        self.maturity_period_secs
            .checked_add(self.challenge_window_secs)
    }
}
