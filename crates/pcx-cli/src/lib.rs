//! # pcx-cli: Exit Game Tooling
//!
//! Operator and participant helpers around the exit game. Every command
//! is offline: it reads files and arguments, prints results, and never
//! touches a ledger.
//!
//! ## Subcommands
//!
//! - `key`: secp256k1 key generation and address derivation
//! - `tx`: transfer encoding, hashing, signing, signer recovery
//! - `tree`: block tree roots and inclusion proofs
//! - `config`: exit game configuration checks
//!
//! Argument parsing lives in the per-command modules; the work is done by
//! the domain crates.

pub mod config;
pub mod keys;
pub mod transfer;
pub mod tree;

use std::path::Path;

use anyhow::{Context, Result};

/// Decode hex, with or without a `0x` prefix.
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).with_context(|| format!("invalid hex: {s}"))
}

/// Encode bytes as `0x`-prefixed lowercase hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Read a file holding a hex string.
pub(crate) fn read_hex_file(path: &Path) -> Result<Vec<u8>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    decode_hex(&content)
}
