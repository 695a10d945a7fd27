//! # pcx-state: Ledger State for the Coin Exit Game
//!
//! Holds every piece of mutable state the exit game transitions over:
//!
//! - **Child chain** (`chain.rs`): operator-only, strictly increasing
//!   `block number → root` store.
//!
//! - **Registry** (`registry.rs`): coin lifecycle
//!   (`Deposited → Exiting → Exited`, redeemable once) and per-address
//!   bonded/withdrawable balances.
//!
//! - **Collaborator seams** (`escrow.rs`, `ownership.rs`): the value-escrow
//!   ledger and the external ownership registry, each a trait with an
//!   in-memory implementation.
//!
//! - **Exit book** (`exit.rs`): live exits, open challenges and the last
//!   terminal outcome per coin.
//!
//! ## Design
//!
//! State lives in flat maps keyed by coin id, address or
//! `(coin id, transfer hash)`. Nothing here decides protocol outcomes; the
//! exit game checks every precondition and then drives these stores.

pub mod chain;
pub mod coin;
pub mod error;
pub mod escrow;
pub mod exit;
pub mod ownership;
pub mod registry;

pub use chain::{ChildBlock, ChildChain};
pub use coin::{Coin, CoinState};
pub use error::{EscrowError, StateError};
pub use escrow::{EscrowLedger, InMemoryEscrow};
pub use exit::{Challenge, ChallengeStatus, Exit, ExitBook, ExitState};
pub use ownership::{InMemoryOwnership, OwnershipRegistry};
pub use registry::{Balance, BalancePlan, BondTotals, CoinRegistry, Delta};
