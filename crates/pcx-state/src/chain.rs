//! # Child-Chain Block Store
//!
//! The operator commits one sparse-Merkle root per child-chain block.
//! Blocks are write-once and numbers strictly increase; block `0` is never
//! stored since it marks deposit-originating transfers.

use std::collections::BTreeMap;

use pcx_core::{Address, BlockNumber, H256, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// A committed child-chain block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildBlock {
    /// Block number.
    pub number: BlockNumber,
    /// Root of the block's sparse Merkle tree.
    pub root: H256,
    /// When the block was submitted.
    pub submitted_at: Timestamp,
}

/// Operator-only append-only store of block roots.
#[derive(Debug, Clone)]
pub struct ChildChain {
    operator: Address,
    blocks: BTreeMap<BlockNumber, ChildBlock>,
}

impl ChildChain {
    /// An empty chain accepting blocks from `operator`.
    pub fn new(operator: Address) -> Self {
        Self {
            operator,
            blocks: BTreeMap::new(),
        }
    }

    /// The address allowed to submit blocks.
    pub fn operator(&self) -> Address {
        self.operator
    }

    /// Store a block root.
    ///
    /// # Errors
    ///
    /// - `StateError::Unauthorized` if `caller` is not the operator.
    /// - `StateError::StaleBlock` if `number` does not exceed the last
    ///   stored number (or is zero).
    pub fn submit_block(
        &mut self,
        caller: Address,
        number: BlockNumber,
        root: H256,
        now: Timestamp,
    ) -> Result<&ChildBlock, StateError> {
        if caller != self.operator {
            return Err(StateError::Unauthorized {
                caller,
                action: "submit_block",
            });
        }
        let latest = self.latest();
        if number <= latest {
            return Err(StateError::StaleBlock { number, latest });
        }
        let block = self.blocks.entry(number).or_insert(ChildBlock {
            number,
            root,
            submitted_at: now,
        });
        tracing::info!(block = number.as_u64(), root = %root, "child block submitted");
        Ok(block)
    }

    /// The root stored for `number`. `None` means no such block, which is
    /// distinct from a stored zero root.
    pub fn root(&self, number: BlockNumber) -> Option<H256> {
        self.blocks.get(&number).map(|b| b.root)
    }

    /// The stored block, if any.
    pub fn block(&self, number: BlockNumber) -> Option<&ChildBlock> {
        self.blocks.get(&number)
    }

    /// The last stored block number, or `0` for an empty chain.
    pub fn latest(&self) -> BlockNumber {
        self.blocks
            .keys()
            .next_back()
            .copied()
            .unwrap_or(BlockNumber::DEPOSIT)
    }

    /// Number of stored blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no block has been stored.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
