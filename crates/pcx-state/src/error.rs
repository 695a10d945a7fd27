//! # State Error Types
//!
//! Every variant carries the ids and amounts involved so a rejected call
//! can be diagnosed from the error alone.

use pcx_core::{Address, Amount, BlockNumber, CoinId};
use thiserror::Error;

use crate::coin::CoinState;

/// Errors from the value-escrow ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscrowError {
    /// The payer's account cannot cover the amount.
    #[error("account {account} holds {available}, cannot escrow {requested}")]
    InsufficientFunds {
        /// The paying account.
        account: Address,
        /// The amount asked for.
        requested: Amount,
        /// The account's balance.
        available: Amount,
    },

    /// A release exceeds the value held in escrow.
    #[error("release of {requested} exceeds escrowed {held}")]
    InsufficientHeld {
        /// The amount asked for.
        requested: Amount,
        /// The value currently held.
        held: Amount,
    },

    /// An account or the escrow total would overflow 256 bits.
    #[error("escrow arithmetic overflow")]
    Overflow,
}

/// Errors from the block store and the coin & balance registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The caller is not allowed to perform the action.
    #[error("{caller} is not authorized to {action}")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
        /// The attempted action.
        action: &'static str,
    },

    /// A submitted block does not advance the chain.
    #[error("block {number} does not exceed latest {latest}")]
    StaleBlock {
        /// The rejected block number.
        number: BlockNumber,
        /// The last stored block number.
        latest: BlockNumber,
    },

    /// A bonded balance would go negative.
    #[error("{address} has {bonded} bonded, cannot debit {requested}")]
    InsufficientBond {
        /// The account.
        address: Address,
        /// The debit asked for.
        requested: Amount,
        /// The bonded balance.
        bonded: Amount,
    },

    /// A withdrawable balance would go negative.
    #[error("{address} has {withdrawable} withdrawable, cannot debit {requested}")]
    InsufficientBalance {
        /// The account.
        address: Address,
        /// The debit asked for.
        requested: Amount,
        /// The withdrawable balance.
        withdrawable: Amount,
    },

    /// A balance would overflow 256 bits.
    #[error("balance overflow for {address}")]
    BalanceOverflow {
        /// The account.
        address: Address,
    },

    /// The coin has already been redeemed.
    #[error("{coin} already redeemed")]
    AlreadyRedeemed {
        /// The coin.
        coin: CoinId,
    },

    /// No coin with this id exists.
    #[error("unknown {coin}")]
    UnknownCoin {
        /// The coin.
        coin: CoinId,
    },

    /// The ownership registry already tracks this coin.
    #[error("{coin} is already registered")]
    DuplicateCoin {
        /// The coin.
        coin: CoinId,
    },

    /// The coin is in the wrong lifecycle state for the action.
    #[error("{coin} is {state}, cannot {action}")]
    InvalidCoinState {
        /// The coin.
        coin: CoinId,
        /// Its current state.
        state: CoinState,
        /// The attempted action.
        action: &'static str,
    },

    /// Deposits must carry value.
    #[error("deposit denomination must be non-zero")]
    ZeroDenomination,

    /// The escrow ledger rejected the movement of value.
    #[error("escrow: {0}")]
    Escrow(#[from] EscrowError),
}
