//! # Tree Subcommand
//!
//! Operator-side block building: compute the root the operator submits
//! and the inclusion proofs participants attach to exits and challenges.
//!
//! A block file is a JSON array of leaves:
//!
//! ```json
//! [{"coin_id": 0, "hash": "0x..."}, {"coin_id": 7, "hash": "0x..."}]
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Deserialize;

use pcx_core::{CoinId, H256};
use pcx_crypto::{verify_inclusion, MerkleProof, SparseMerkleTree};

use crate::{decode_hex, encode_hex};

/// Arguments for `pcx tree`.
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(subcommand)]
    pub command: TreeCommand,
}

/// Tree subcommands.
#[derive(Subcommand, Debug)]
pub enum TreeCommand {
    /// Print the root of a block file.
    Build {
        /// Path to the block file.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the inclusion proof of one coin.
    Prove {
        /// Path to the block file.
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Coin to prove.
        #[arg(long)]
        coin: u64,
    },

    /// Check an inclusion proof against a root.
    Verify {
        /// Block root.
        #[arg(long)]
        root: String,
        /// Coin the leaf belongs to.
        #[arg(long)]
        coin: u64,
        /// Leaf value (the transfer hash).
        #[arg(long)]
        leaf: String,
        /// Hex of the encoded proof.
        #[arg(long)]
        proof: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Leaf {
    coin_id: CoinId,
    hash: H256,
}

/// Execute the tree subcommand.
pub fn run_tree(args: &TreeArgs) -> Result<u8> {
    match &args.command {
        TreeCommand::Build { file } => {
            let tree = load_tree(file)?;
            tracing::debug!(leaves = tree.len(), "tree built");
            println!("{}", tree.root());
            Ok(0)
        }
        TreeCommand::Prove { file, coin } => {
            let tree = load_tree(file)?;
            let key = CoinId(*coin);
            if tree.leaf(key).is_none() {
                bail!("{key} has no leaf in {}", file.display());
            }
            println!("{}", encode_hex(&tree.prove(key).encode()));
            Ok(0)
        }
        TreeCommand::Verify {
            root,
            coin,
            leaf,
            proof,
        } => {
            let root = H256::from_hex(root).context("invalid root")?;
            let leaf = H256::from_hex(leaf).context("invalid leaf")?;
            let proof = MerkleProof::decode(&decode_hex(proof)?)
                .map_err(|e| anyhow::anyhow!("invalid proof: {e}"))?;
            if verify_inclusion(&root, CoinId(*coin), &leaf, &proof) {
                println!("OK: leaf is included");
                Ok(0)
            } else {
                println!("FAIL: proof does not match root");
                Ok(1)
            }
        }
    }
}

fn load_tree(path: &Path) -> Result<SparseMerkleTree> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read block file: {}", path.display()))?;
    let leaves: Vec<Leaf> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse block file: {}", path.display()))?;
    let mut seen = BTreeSet::new();
    for leaf in &leaves {
        if !seen.insert(leaf.coin_id) {
            bail!("{} appears twice in {}", leaf.coin_id, path.display());
        }
    }
    Ok(SparseMerkleTree::new(
        leaves.into_iter().map(|l| (l.coin_id, l.hash)),
    ))
}
