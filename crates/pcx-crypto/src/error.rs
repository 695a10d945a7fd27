//! # Cryptographic Error Types
//!
//! Structured errors for decoding, proof parsing and signature recovery.

use pcx_core::CanonicalizationError;
use thiserror::Error;

/// Errors from cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The signature did not recover to a public key.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Secret key bytes were out of range or malformed.
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    /// Transfer bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Proof bytes were malformed.
    #[error("malformed proof: {0}")]
    InvalidProof(String),

    /// Canonical encoding failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}
