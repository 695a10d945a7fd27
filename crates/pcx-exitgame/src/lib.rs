//! # pcx-exitgame: The Exit Game
//!
//! Admits withdrawal claims ("exits") for coins of the child chain and
//! arbitrates disputes over them:
//!
//! - **Exits** (`start_exit`, `cancel_exit`, `finalize_exit(s)`): a bonded
//!   claim that an address owns a coin as of a committed transfer.
//!
//! - **Challenges**: `challenge_after` (the exited output was spent later),
//!   `challenge_between` (the previous owner double-spent before the exit
//!   transfer), and `challenge_before` (the claimed history forks off an
//!   earlier legitimate transfer) with `respond_challenge_before`.
//!
//! - **Bonds**: posted by exiters and `challenge_before` challengers,
//!   forfeited to the winning side, withdrawn with `withdraw_bonds`.
//!
//! ## Design
//!
//! One [`ExitGame`] value owns the whole ledger (block store, registry,
//! exit book) and is the only path that mutates it. Every entry point runs
//! all of its checks before its first write, so a failed call leaves the
//! game untouched. [`SharedExitGame`] serializes callers across threads.
//!
//! All cryptographic evidence goes through one routine,
//! [`verify::verify_transfer`]: decode, coin check, hash, inclusion,
//! signer recovery, linkage.

pub mod config;
pub mod error;
pub mod game;
pub mod shared;
pub mod verify;

pub use config::ExitGameConfig;
pub use error::{ConfigError, ExitGameError, VerificationError};
pub use game::{ExitGame, ExitOutcome, StartExitRequest};
pub use shared::SharedExitGame;
pub use verify::{verify_transfer, Linkage, SignerRule, TransferEvidence, VerifiedTransfer};
