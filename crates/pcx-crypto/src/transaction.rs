//! # Transfer Codec
//!
//! A transfer moves one coin to a new recipient. It references the block
//! holding the coin's previous transfer (`prev_block`), or the reserved
//! block `0` when the coin comes straight out of a deposit.
//!
//! ## Encoding
//!
//! Transfers travel as RFC 8785 canonical JSON:
//!
//! ```text
//! {"coin_id":3,"denomination":"5000","prev_block":1000,"recipient":"0x..."}
//! ```
//!
//! ## Hashing
//!
//! - `prev_block != 0`: SHA-256 of the canonical encoding.
//! - `prev_block == 0`: SHA-256 of the coin id as 8 big-endian bytes. A
//!   deposit transfer is identified by its coin alone, so every party can
//!   compute its hash without knowing the denomination.

use pcx_core::{sha256, sha256_canonical, Address, Amount, BlockNumber, CanonicalBytes, CoinId, H256};
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// A single coin transfer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    /// The coin being moved.
    pub coin_id: CoinId,
    /// Block holding the coin's previous transfer; `0` for a deposit.
    pub prev_block: BlockNumber,
    /// Value of the coin. Informational; coins are never split.
    pub denomination: Amount,
    /// New owner.
    pub recipient: Address,
}

impl Transaction {
    /// The transfer that introduces a freshly deposited coin.
    pub fn deposit(coin_id: CoinId, denomination: Amount, depositor: Address) -> Self {
        Self {
            coin_id,
            prev_block: BlockNumber::DEPOSIT,
            denomination,
            recipient: depositor,
        }
    }

    /// A transfer spending the output recorded in `prev_block`.
    pub fn spend(coin_id: CoinId, prev_block: BlockNumber, denomination: Amount, recipient: Address) -> Self {
        Self {
            coin_id,
            prev_block,
            denomination,
            recipient,
        }
    }

    /// Whether this transfer originates from a deposit.
    pub fn is_deposit(&self) -> bool {
        self.prev_block.is_deposit_marker()
    }

    /// Canonical wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>, CryptoError> {
        Ok(CanonicalBytes::new(self)?.into_bytes())
    }

    /// Parse wire bytes.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Decode` for empty input, malformed JSON,
    /// missing or unknown fields, and malformed addresses or amounts.
    pub fn decode(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.is_empty() {
            return Err(CryptoError::Decode("empty transfer".into()));
        }
        serde_json::from_slice(bytes).map_err(|e| CryptoError::Decode(e.to_string()))
    }

    /// The transfer hash that gets committed into a block and signed.
    pub fn hash(&self) -> Result<H256, CryptoError> {
        if self.is_deposit() {
            return Ok(deposit_hash(self.coin_id));
        }
        Ok(sha256_canonical(&CanonicalBytes::new(self)?))
    }
}

/// Hash of the deposit transfer for `coin_id`.
pub fn deposit_hash(coin_id: CoinId) -> H256 {
    sha256(&coin_id.as_u64().to_be_bytes())
}
