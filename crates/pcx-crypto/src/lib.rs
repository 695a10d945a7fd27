//! # pcx-crypto: Cryptographic Primitives for the Coin Exit Game
//!
//! This crate provides the verification building blocks every exit-game
//! entry point depends on:
//!
//! - **Sparse Merkle Tree** of fixed depth 64, keyed by coin id, with
//!   compact inclusion proofs.
//! - **Transfer codec**: canonical encoding and hashing of
//!   `(coin_id, prev_block, denomination, recipient)` records.
//! - **Recoverable secp256k1 signatures** over transfer hashes, with
//!   signer recovery to an [`Address`](pcx_core::Address).
//!
//! Everything here is pure computation. No state, no clock.

pub mod error;
pub mod signature;
pub mod smt;
pub mod transaction;

// Re-export primary types.
pub use error::CryptoError;
pub use signature::{recover_signer, KeyPair, Signature};
pub use smt::{empty_leaf, verify_inclusion, MerkleProof, SparseMerkleTree, TREE_DEPTH};
pub use transaction::{deposit_hash, Transaction};
