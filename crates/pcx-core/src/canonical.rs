//! # Canonical Encoding
//!
//! Transfers are signed and committed by hash, so the bytes behind a hash
//! must not depend on field order, whitespace, or number formatting.
//! [`CanonicalBytes`] is the only way structured data reaches
//! [`sha256_canonical`](crate::sha256_canonical).
//!
//! ## Rules
//!
//! - RFC 8785 output (`serde_jcs`): object keys sorted, no insignificant
//!   whitespace.
//! - Every number is an integer. Amounts serialize as decimal strings, so a
//!   float anywhere in the tree means a type was serialized the wrong way;
//!   it is rejected with the JSON path where it was found.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// RFC 8785 bytes of a float-free value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize `value`.
    ///
    /// # Errors
    ///
    /// `FloatRejected` names the first float found, depth first.
    /// `SerializationFailed` wraps `serde_json` failures.
    pub fn new(value: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let tree = serde_json::to_value(value)?;
        check_integers(&tree, &mut String::from("$"))?;
        Ok(Self(serde_jcs::to_vec(&tree)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

fn check_integers(value: &Value, path: &mut String) -> Result<(), CanonicalizationError> {
    match value {
        Value::Number(n) if !(n.is_i64() || n.is_u64()) => Err(CanonicalizationError::FloatRejected {
            path: path.clone(),
            value: n.as_f64().unwrap_or(f64::NAN),
        }),
        Value::Object(fields) => fields.iter().try_for_each(|(key, child)| {
            let len = path.len();
            path.push('.');
            path.push_str(key);
            check_integers(child, path)?;
            path.truncate(len);
            Ok(())
        }),
        Value::Array(items) => items.iter().enumerate().try_for_each(|(i, child)| {
            let len = path.len();
            path.push_str(&format!("[{i}]"));
            check_integers(child, path)?;
            path.truncate(len);
            Ok(())
        }),
        _ => Ok(()),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Field insertion order never reaches the encoding.
        #[test]
        fn encoding_ignores_field_order(
            fields in prop::collection::btree_map("[a-z_]{1,10}", any::<u64>(), 1..8)
        ) {
            let forward: serde_json::Map<String, Value> =
                fields.iter().map(|(k, v)| (k.clone(), Value::from(*v))).collect();
            let backward: serde_json::Map<String, Value> =
                fields.iter().rev().map(|(k, v)| (k.clone(), Value::from(*v))).collect();
            prop_assert_eq!(
                CanonicalBytes::new(&Value::Object(forward)).unwrap(),
                CanonicalBytes::new(&Value::Object(backward)).unwrap()
            );
        }
    }
}
