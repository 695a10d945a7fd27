//! # Recoverable secp256k1 Signatures
//!
//! Transfers are signed with recoverable ECDSA over their 32-byte hash.
//! Verification never trusts a caller-supplied owner: the signer is
//! recovered from `(hash, signature)` and compared by address.
//!
//! ## Security Invariant
//!
//! - Signing input is an [`H256`] transfer hash, never raw bytes.
//! - `KeyPair` does not implement `Serialize` and its `Debug` output shows
//!   only the address.
//!
//! ## Wire Format
//!
//! A signature is 65 bytes: `r (32) || s (32) || v (1)`. `v` is accepted as
//! `0`/`1` or `27`/`28`; signing always produces `27`/`28`.
//!
//! An address is the last 20 bytes of SHA-256 over the 64-byte uncompressed
//! public key (the `0x04` prefix dropped).

use pcx_core::{sha256, Address, H256};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CryptoError;

/// Length of an encoded signature.
pub const SIGNATURE_LEN: usize = 65;

/// A 65-byte recoverable signature.
///
/// Serializes as a `0x`-prefixed hex string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; SIGNATURE_LEN]);

/// A secp256k1 key pair for signing transfers.
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
}

// ---------------------------------------------------------------------------
// Signature impls
// ---------------------------------------------------------------------------

impl Signature {
    /// Parse from a byte slice that must be exactly 65 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; SIGNATURE_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidSignature(format!(
                "signature must be {SIGNATURE_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Return the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(s).map_err(|e| CryptoError::InvalidSignature(format!("bad hex: {e}")))?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", hex::encode(&self.0[..4]))
    }
}

// ---------------------------------------------------------------------------
// KeyPair impls
// ---------------------------------------------------------------------------

impl KeyPair {
    /// Generate a new random key pair.
    pub fn generate() -> Self {
        let secret = SecretKey::new(&mut secp256k1::rand::thread_rng());
        Self::from_secret(secret)
    }

    /// Create a key pair from a raw 32-byte secret.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidSecretKey` if the bytes are zero or not
    /// below the curve order.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        let secret =
            SecretKey::from_slice(bytes).map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
        Ok(Self::from_secret(secret))
    }

    fn from_secret(secret: SecretKey) -> Self {
        let public = PublicKey::from_secret_key(SECP256K1, &secret);
        Self { secret, public }
    }

    /// The raw secret bytes. Only the CLI's `key generate` prints these.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.secret_bytes()
    }

    /// The address derived from this key's public half.
    pub fn address(&self) -> Address {
        address_of(&self.public)
    }

    /// Sign a transfer hash.
    pub fn sign(&self, hash: &H256) -> Signature {
        let msg = Message::from_digest(hash.0);
        let sig = SECP256K1.sign_ecdsa_recoverable(&msg, &self.secret);
        let (recid, compact) = sig.serialize_compact();
        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&compact);
        // recid is always 0..=3; only 0/1 occur for valid keys.
        out[64] = 27 + recid.to_i32() as u8;
        Signature(out)
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Recovery
// ---------------------------------------------------------------------------

/// Derive the address of a public key.
pub fn address_of(public: &PublicKey) -> Address {
    let uncompressed = public.serialize_uncompressed();
    let digest = sha256(&uncompressed[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest.0[12..]);
    Address(out)
}

/// Recover the address that signed `hash`.
///
/// # Errors
///
/// Returns `CryptoError::InvalidSignature` if the signature is not 65
/// bytes, carries an unknown recovery byte, or does not resolve to a
/// public key.
pub fn recover_signer(hash: &H256, signature: &[u8]) -> Result<Address, CryptoError> {
    let sig = Signature::from_slice(signature)?;
    let v = match sig.0[64] {
        v @ 0..=1 => v,
        v @ 27..=28 => v - 27,
        other => {
            return Err(CryptoError::InvalidSignature(format!(
                "unsupported recovery byte {other}"
            )))
        }
    };
    let recid = RecoveryId::from_i32(i32::from(v))
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    let recoverable = RecoverableSignature::from_compact(&sig.0[..64], recid)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    let msg = Message::from_digest(hash.0);
    let public = SECP256K1
        .recover_ecdsa(&msg, &recoverable)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    Ok(address_of(&public))
}
