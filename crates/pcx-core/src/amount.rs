//! # 256-bit Amounts
//!
//! Coin denominations and bonds are unsigned 256-bit integers in the base
//! unit of the value ledger. `Amount` serializes as a decimal string so the
//! canonical encoding never carries a float or an overflowing JSON number.
//!
//! Arithmetic is checked: every operation returns `Option` and callers turn
//! `None` into a domain error.

use ethnum::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// An unsigned 256-bit amount of value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(U256);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(U256::ZERO);

    /// Construct from a `u128`.
    pub const fn new(value: u128) -> Self {
        Self(U256::new(value))
    }

    /// Construct from an `ethnum::U256`.
    pub const fn from_u256(value: U256) -> Self {
        Self(value)
    }

    /// Access the inner `U256`.
    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == U256::ZERO
    }

    /// Checked addition.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Checked multiplication by a small factor.
    pub fn checked_mul(self, factor: u128) -> Option<Amount> {
        self.0.checked_mul(U256::new(factor)).map(Amount)
    }

    /// Parse a base-10 string.
    pub fn parse_decimal(s: &str) -> Result<Self, CoreError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidAmount(s.to_string()));
        }
        U256::from_str_radix(trimmed, 10)
            .map(Amount)
            .map_err(|_| CoreError::InvalidAmount(s.to_string()))
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self::new(u128::from(value))
    }
}

impl std::fmt::Debug for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Amount {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_decimal(&s).map_err(serde::de::Error::custom)
    }
}
