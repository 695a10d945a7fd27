//! # Sparse Merkle Tree
//!
//! A fixed-depth binary tree with one leaf slot per possible coin id. Each
//! child-chain block commits the hashes of the transfers it contains,
//! keyed by coin id; every other slot holds the empty leaf.
//!
//! ## Hashing (Domain Separation)
//!
//! - Present leaf: the transfer hash itself.
//! - Empty leaf: `SHA256(0x00 || 0^32)`.
//! - Node: `SHA256(0x01 || left || right)`.
//!
//! Empty subtrees collapse to per-level constants, computed once.
//!
//! ## Proof Wire Format
//!
//! ```text
//! bitmap (8 bytes, big-endian) || sibling_0 || sibling_1 || ...
//! ```
//!
//! Bit `i` of the bitmap is set when the sibling at level `i` (leaf level
//! is 0) differs from the empty constant for that level. Only those
//! siblings are carried, in ascending level order, so a proof for a sparse
//! block is a few dozen bytes instead of 2 KiB.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use pcx_core::{sha256, CoinId, H256};

use crate::error::CryptoError;

/// Depth of the tree: one level per bit of a coin id.
pub const TREE_DEPTH: usize = 64;

const BITMAP_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Hashing helpers
// ---------------------------------------------------------------------------

/// Hash of two children.
pub fn node_hash(left: &H256, right: &H256) -> H256 {
    let mut buf = [0u8; 65];
    buf[0] = 0x01;
    buf[1..33].copy_from_slice(&left.0);
    buf[33..].copy_from_slice(&right.0);
    sha256(&buf)
}

/// The value of an unoccupied leaf slot.
pub fn empty_leaf() -> H256 {
    empty_subtrees()[0]
}

/// Root of an all-empty subtree of height `level`, for `level` in
/// `0..=TREE_DEPTH`.
fn empty_subtrees() -> &'static [H256; TREE_DEPTH + 1] {
    static EMPTY: OnceLock<[H256; TREE_DEPTH + 1]> = OnceLock::new();
    EMPTY.get_or_init(|| {
        let mut out = [H256::ZERO; TREE_DEPTH + 1];
        let mut leaf = [0u8; 33];
        leaf[0] = 0x00;
        out[0] = sha256(&leaf);
        for level in 0..TREE_DEPTH {
            out[level + 1] = node_hash(&out[level], &out[level]);
        }
        out
    })
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// A fully materialized sparse Merkle tree over a set of leaves.
///
/// Only non-empty nodes are stored: `levels[i]` maps a node index at
/// height `i` to its hash.
#[derive(Debug, Clone)]
pub struct SparseMerkleTree {
    levels: Vec<BTreeMap<u64, H256>>,
}

impl SparseMerkleTree {
    /// Build the tree bottom-up from `(coin_id, leaf_hash)` pairs.
    ///
    /// A later pair for the same coin id replaces an earlier one.
    pub fn new(leaves: impl IntoIterator<Item = (CoinId, H256)>) -> Self {
        let empty = empty_subtrees();
        let mut levels: Vec<BTreeMap<u64, H256>> = Vec::with_capacity(TREE_DEPTH + 1);
        levels.push(leaves.into_iter().map(|(k, v)| (k.as_u64(), v)).collect());

        for level in 0..TREE_DEPTH {
            let below = &levels[level];
            let mut above = BTreeMap::new();
            for &idx in below.keys() {
                let parent = idx >> 1;
                if above.contains_key(&parent) {
                    continue;
                }
                let left = below.get(&(parent << 1)).unwrap_or(&empty[level]);
                let right = below.get(&((parent << 1) | 1)).unwrap_or(&empty[level]);
                above.insert(parent, node_hash(left, right));
            }
            levels.push(above);
        }
        Self { levels }
    }

    /// The root commitment.
    pub fn root(&self) -> H256 {
        self.levels[TREE_DEPTH]
            .get(&0)
            .copied()
            .unwrap_or(empty_subtrees()[TREE_DEPTH])
    }

    /// The leaf stored for `key`, if any.
    pub fn leaf(&self, key: CoinId) -> Option<H256> {
        self.levels[0].get(&key.as_u64()).copied()
    }

    /// Number of occupied leaves.
    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    /// Whether no leaf is occupied.
    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// The sibling path for `key`, leaf level first.
    ///
    /// Works for absent keys too: the result then proves the empty leaf.
    pub fn prove(&self, key: CoinId) -> MerkleProof {
        let empty = empty_subtrees();
        let key = key.as_u64();
        let siblings = (0..TREE_DEPTH)
            .map(|level| {
                let sibling = (key >> level) ^ 1;
                self.levels[level]
                    .get(&sibling)
                    .copied()
                    .unwrap_or(empty[level])
            })
            .collect();
        MerkleProof { siblings }
    }
}

// ---------------------------------------------------------------------------
// Proof
// ---------------------------------------------------------------------------

/// An inclusion proof: exactly [`TREE_DEPTH`] siblings, leaf level first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    siblings: Vec<H256>,
}

impl MerkleProof {
    /// The siblings, leaf level first.
    pub fn siblings(&self) -> &[H256] {
        &self.siblings
    }

    /// Compact wire encoding.
    pub fn encode(&self) -> Vec<u8> {
        let empty = empty_subtrees();
        let mut bitmap = 0u64;
        let mut body = Vec::new();
        for (level, sibling) in self.siblings.iter().enumerate() {
            if *sibling != empty[level] {
                bitmap |= 1 << level;
                body.extend_from_slice(&sibling.0);
            }
        }
        let mut out = Vec::with_capacity(BITMAP_LEN + body.len());
        out.extend_from_slice(&bitmap.to_be_bytes());
        out.extend_from_slice(&body);
        out
    }

    /// Parse the compact wire encoding.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidProof` if the input is shorter than the
    /// bitmap or carries a different number of siblings than the bitmap
    /// announces.
    pub fn decode(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < BITMAP_LEN {
            return Err(CryptoError::InvalidProof(format!(
                "proof must be at least {BITMAP_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let (head, body) = bytes.split_at(BITMAP_LEN);
        let mut raw = [0u8; BITMAP_LEN];
        raw.copy_from_slice(head);
        let bitmap = u64::from_be_bytes(raw);

        let announced = bitmap.count_ones() as usize;
        if body.len() != announced * 32 {
            return Err(CryptoError::InvalidProof(format!(
                "bitmap announces {announced} siblings, body holds {} bytes",
                body.len()
            )));
        }

        let empty = empty_subtrees();
        let mut chunks = body.chunks_exact(32);
        let mut siblings = Vec::with_capacity(TREE_DEPTH);
        for (level, default) in empty.iter().take(TREE_DEPTH).enumerate() {
            if bitmap & (1 << level) == 0 {
                siblings.push(*default);
                continue;
            }
            let chunk = chunks
                .next()
                .ok_or_else(|| CryptoError::InvalidProof("sibling body truncated".into()))?;
            siblings.push(H256::from_slice(chunk).map_err(|e| CryptoError::InvalidProof(e.to_string()))?);
        }
        Ok(Self { siblings })
    }
}

/// Recompute the root from `leaf` at `key` and compare with `root`.
pub fn verify_inclusion(root: &H256, key: CoinId, leaf: &H256, proof: &MerkleProof) -> bool {
    if proof.siblings.len() != TREE_DEPTH {
        return false;
    }
    let key = key.as_u64();
    let mut current = *leaf;
    for (level, sibling) in proof.siblings.iter().enumerate() {
        current = if (key >> level) & 1 == 1 {
            node_hash(sibling, &current)
        } else {
            node_hash(&current, sibling)
        };
    }
    current == *root
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every committed leaf proves against the root through the wire
        /// format, and no leaf proves under a key it was not stored at.
        #[test]
        fn committed_leaves_prove(
            entries in prop::collection::btree_map(any::<u64>(), any::<[u8; 32]>(), 1..12),
            absent in any::<u64>(),
        ) {
            let tree = SparseMerkleTree::new(entries.iter().map(|(k, v)| (CoinId(*k), H256(*v))));
            let root = tree.root();
            for (k, v) in &entries {
                let proof = MerkleProof::decode(&tree.prove(CoinId(*k)).encode()).unwrap();
                prop_assert!(verify_inclusion(&root, CoinId(*k), &H256(*v), &proof));
            }
            if let Some((k, v)) = entries.iter().next() {
                if !entries.contains_key(&absent) {
                    let proof = tree.prove(CoinId(*k));
                    prop_assert!(!verify_inclusion(&root, CoinId(absent), &H256(*v), &proof));
                }
            }
        }
    }
}
