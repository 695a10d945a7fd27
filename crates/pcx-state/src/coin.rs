//! # Coin Records
//!
//! A coin is created by a deposit and tracked by id. Its lifecycle:
//!
//! ```text
//! Deposited ──start_exit──▶ Exiting ──finalize──▶ Exited ──redeem (once)
//!     ▲                        │
//!     └──cancel / challenged───┘
//! ```

use pcx_core::{Address, Amount, BlockNumber, CoinId, Timestamp};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoinState {
    /// Circulating on the child chain.
    Deposited,
    /// A live exit is pending for this coin.
    Exiting,
    /// Withdrawn to the base ledger. Terminal.
    Exited,
}

impl CoinState {
    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposited => "DEPOSITED",
            Self::Exiting => "EXITING",
            Self::Exited => "EXITED",
        }
    }
}

impl std::fmt::Display for CoinState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deposited coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Coin id, allocated sequentially from zero.
    pub id: CoinId,
    /// Value escrowed for this coin.
    pub denomination: Amount,
    /// The address that deposited the coin.
    pub depositor: Address,
    /// The deposit block: the running deposit count at creation.
    pub deposit_block: BlockNumber,
    /// Lifecycle state.
    pub state: CoinState,
    /// Whether the escrowed value has been released.
    pub redeemed: bool,
    /// When the deposit was made.
    pub created_at: Timestamp,
}
