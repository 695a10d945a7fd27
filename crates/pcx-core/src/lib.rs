//! # pcx-core: Foundational Types for the Coin Exit Game
//!
//! This crate is the leaf of the workspace DAG. It defines the primitive
//! types every other crate builds on: coin, block and address newtypes,
//! 256-bit amounts, 32-byte digests, canonical byte production and UTC
//! timestamps.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `CoinId`, `BlockNumber`,
//!    `Address`, `H256`, `Amount`: no bare integers or byte arrays cross
//!    crate boundaries.
//!
//! 2. **`CanonicalBytes` newtype.** Every structured value that gets hashed
//!    (transfers, in particular) flows through `CanonicalBytes::new()`.
//!
//! 3. **UTC-only timestamps behind a `Clock` seam.** Maturity arithmetic is
//!    done on `Timestamp` values produced by an injectable clock.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pcx-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use amount::Amount;
pub use canonical::CanonicalBytes;
pub use digest::{sha256, sha256_canonical, H256};
pub use error::{CanonicalizationError, CoreError};
pub use identity::{Address, BlockNumber, CoinId};
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
