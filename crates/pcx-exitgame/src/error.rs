//! # Exit Game Error Types
//!
//! Three layers:
//!
//! - [`VerificationError`]: the cryptographic or input reason evidence was
//!   rejected. Fatal for the call; never retried.
//! - [`ConfigError`]: configuration could not be loaded or is unusable.
//! - [`ExitGameError`]: everything an entry point can return. Challenge and
//!   response failures wrap the underlying `VerificationError` so callers
//!   see why the evidence was refused.

use std::path::PathBuf;

use pcx_core::{Amount, BlockNumber, CoinId, Timestamp, H256};
use pcx_state::StateError;
use thiserror::Error;

/// Why a piece of transfer evidence was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// The transfer bytes did not decode.
    #[error("decode error: {0}")]
    Decode(String),

    /// The transfer is not committed at the claimed block for the coin.
    #[error("invalid proof for {coin} at {block}: {reason}")]
    InvalidProof {
        /// The coin the evidence was offered for.
        coin: CoinId,
        /// The claimed block.
        block: BlockNumber,
        /// What did not match.
        reason: String,
    },

    /// The signature did not recover, or recovered to the wrong address.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The transfer does not link to the required reference block, or the
    /// blocks are out of order.
    #[error("invalid chain: {0}")]
    InvalidChain(String),
}

/// Errors loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// YAML parsing failed.
    #[error("failed to parse config YAML at {path}: {source}")]
    YamlParse {
        /// The file being read.
        path: PathBuf,
        /// The parser's error.
        source: serde_yaml::Error,
    },

    /// YAML parsing of an in-memory document failed.
    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The config file does not exist.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The values parsed but cannot drive the game.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors returned by exit-game entry points.
#[derive(Error, Debug)]
pub enum ExitGameError {
    /// Block store or registry rejection (Unauthorized, StaleBlock,
    /// InsufficientBond, ...).
    #[error(transparent)]
    State(#[from] StateError),

    /// Exit evidence was rejected.
    #[error("verification failed: {0}")]
    Verification(#[from] VerificationError),

    /// A challenge's evidence was rejected; the exit is untouched.
    #[error("invalid challenge: {0}")]
    InvalidChallenge(VerificationError),

    /// A response's evidence was rejected; the challenge persists.
    #[error("invalid response: {0}")]
    InvalidResponse(VerificationError),

    /// The coin already has a live exit.
    #[error("{coin} already has a live exit")]
    ExitAlreadyExists {
        /// The coin.
        coin: CoinId,
    },

    /// The coin has no live exit.
    #[error("{coin} has no live exit")]
    NoSuchExit {
        /// The coin.
        coin: CoinId,
    },

    /// No open challenge with this key.
    #[error("no open challenge on {coin} for transfer {tx_hash}")]
    NoSuchChallenge {
        /// The coin.
        coin: CoinId,
        /// The challenged transfer hash.
        tx_hash: H256,
    },

    /// A challenge with this key is already open.
    #[error("challenge on {coin} for transfer {tx_hash} already open")]
    ChallengeAlreadyExists {
        /// The coin.
        coin: CoinId,
        /// The challenged transfer hash.
        tx_hash: H256,
    },

    /// The posted bond differs from the configured amount.
    #[error("bond must be exactly {expected}, got {provided}")]
    WrongBond {
        /// The configured bond.
        expected: Amount,
        /// What the caller posted.
        provided: Amount,
    },

    /// The exit's contest period has not elapsed.
    #[error("exit on {coin} matures at {ready_at}, now {now}")]
    NotMature {
        /// The coin.
        coin: CoinId,
        /// Earliest finalization time.
        ready_at: Timestamp,
        /// Current time.
        now: Timestamp,
    },

    /// `challenge_before` arrived after the exit's maturity period, leaving
    /// the claimed owner less than a full challenge window to answer.
    #[error("challenges on {coin} closed at {closed_at}, now {now}")]
    ChallengePeriodOver {
        /// The coin.
        coin: CoinId,
        /// End of the maturity period.
        closed_at: Timestamp,
        /// Current time.
        now: Timestamp,
    },

    /// The maturity deadline falls outside the representable time range.
    #[error("maturity deadline for {coin} is out of range")]
    DeadlineOverflow {
        /// The coin.
        coin: CoinId,
    },

    /// The game is paused.
    #[error("paused: {action} disabled")]
    Paused {
        /// The rejected action.
        action: &'static str,
    },

    /// Configuration was rejected.
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

impl ExitGameError {
    /// The verification reason, if the error carries one.
    pub fn verification(&self) -> Option<&VerificationError> {
        match self {
            Self::Verification(e) | Self::InvalidChallenge(e) | Self::InvalidResponse(e) => Some(e),
            _ => None,
        }
    }
}
