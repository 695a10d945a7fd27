//! # Error Types: Core Parsing and Canonicalization Failures
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations. Higher crates wrap these with `#[from]`.

use thiserror::Error;

/// Errors raised while parsing or constructing core primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Hex input was malformed or had the wrong length.
    #[error("invalid hex for {what}: {reason}")]
    InvalidHex {
        /// What was being parsed (e.g. "address", "h256").
        what: &'static str,
        /// Why parsing failed.
        reason: String,
    },

    /// A decimal amount string could not be parsed.
    #[error("invalid amount \"{0}\"")]
    InvalidAmount(String),

    /// A timestamp could not be parsed or was out of range.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// A float was found where only integers or decimal strings belong.
    #[error("float {value} at {path}: amounts must be decimal strings")]
    FloatRejected {
        /// JSON path of the offending number, e.g. `$.denomination`.
        path: String,
        /// The rejected value.
        value: f64,
    },

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
