//! # Exit and Challenge Records
//!
//! The exit book stores at most one live exit per coin and any number of
//! open challenges against it, keyed by `(coin id, challenged transfer
//! hash)`.
//!
//! ## Exit State Machine
//!
//! ```text
//! None ──start──▶ Pending ──finalize──▶ Finalized ─┐
//!                    │                              ├──▶ None (next exit)
//!                    └──cancel / challenged──▶ Canceled
//! ```
//!
//! ## Challenge State Machine
//!
//! ```text
//! Open ──respond──▶ ResolvedByResponse
//!   ├───timeout──▶ ResolvedByTimeout
//!   └──exit gone─▶ Dismissed
//! ```
//!
//! Resolution consumes the `Open` record; resolved challenges leave the
//! book.

use std::collections::BTreeMap;

use pcx_core::{Address, Amount, BlockNumber, CoinId, Timestamp, H256};
use serde::{Deserialize, Serialize};

/// State of the exit slot for one coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitState {
    /// No exit has been recorded.
    #[default]
    None,
    /// An exit is live.
    Pending,
    /// The last exit finalized.
    Finalized,
    /// The last exit was cancelled or defeated by a challenge.
    Canceled,
}

impl ExitState {
    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Pending => "PENDING",
            Self::Finalized => "FINALIZED",
            Self::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for ExitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    /// The exiting coin.
    pub coin_id: CoinId,
    /// Recipient of the exiting transfer.
    pub claimed_owner: Address,
    /// Owner established by the previous transfer (the depositor for a
    /// deposit exit). Signer of any conflicting spend.
    pub prev_owner: Address,
    /// `min(prev_block, exit_block)`. Informational.
    pub priority: BlockNumber,
    /// Block of the previous transfer; `0` for a deposit exit.
    pub prev_block: BlockNumber,
    /// Block of the exiting transfer.
    pub exit_block: BlockNumber,
    /// When the exit was opened.
    pub created_at: Timestamp,
    /// Bond posted by the exiter.
    pub bond: Amount,
    /// Always `Pending` while the exit is in the book.
    pub state: ExitState,
}

/// Lifecycle state of a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeStatus {
    /// Awaiting a response.
    Open,
    /// Answered by a valid later spend.
    ResolvedByResponse,
    /// Unanswered when the exit matured; the challenger won.
    ResolvedByTimeout,
    /// The exit was removed before the challenge resolved.
    Dismissed,
}

impl ChallengeStatus {
    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::ResolvedByResponse => "RESOLVED_BY_RESPONSE",
            Self::ResolvedByTimeout => "RESOLVED_BY_TIMEOUT",
            Self::Dismissed => "DISMISSED",
        }
    }
}

impl std::fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A challenge against an exit's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// The contested coin.
    pub coin_id: CoinId,
    /// Hash of the transfer the challenge cites.
    pub challenged_tx_hash: H256,
    /// Who opened the challenge.
    pub challenger: Address,
    /// Recipient of the cited transfer; the party expected to answer.
    pub claimed_owner: Address,
    /// Block of the cited transfer.
    pub block_number: BlockNumber,
    /// When the challenge was opened.
    pub opened_at: Timestamp,
    /// Book-wide opening order.
    pub sequence: u64,
    /// Bond posted by the challenger.
    pub bond: Amount,
    /// Lifecycle state.
    pub status: ChallengeStatus,
}

impl Challenge {
    /// Close an open challenge with a terminal status.
    ///
    /// Resolving an already-resolved challenge is a no-op that keeps the
    /// first terminal status.
    pub fn resolve(mut self, status: ChallengeStatus) -> Self {
        if self.status == ChallengeStatus::Open {
            self.status = status;
        }
        self
    }
}

/// Live exits and open challenges.
#[derive(Debug, Clone, Default)]
pub struct ExitBook {
    exits: BTreeMap<CoinId, Exit>,
    challenges: BTreeMap<(CoinId, H256), Challenge>,
    outcomes: BTreeMap<CoinId, ExitState>,
    next_sequence: u64,
}

impl ExitBook {
    /// An empty book.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Exits ──────────────────────────────────────────────────────────

    /// The live exit for `coin`.
    pub fn exit(&self, coin: CoinId) -> Option<&Exit> {
        self.exits.get(&coin)
    }

    /// Record a new live exit. Returns `false`, leaving the book unchanged,
    /// if one already exists.
    pub fn open_exit(&mut self, exit: Exit) -> bool {
        if self.exits.contains_key(&exit.coin_id) {
            return false;
        }
        self.outcomes.insert(exit.coin_id, ExitState::Pending);
        self.exits.insert(exit.coin_id, exit);
        true
    }

    /// Remove the live exit, recording `outcome` as its terminal state.
    pub fn close_exit(&mut self, coin: CoinId, outcome: ExitState) -> Option<Exit> {
        let exit = self.exits.remove(&coin)?;
        self.outcomes.insert(coin, outcome);
        Some(exit)
    }

    /// `Pending` for a live exit, else the last terminal outcome, else `None`.
    pub fn exit_state(&self, coin: CoinId) -> ExitState {
        if self.exits.contains_key(&coin) {
            return ExitState::Pending;
        }
        self.outcomes.get(&coin).copied().unwrap_or_default()
    }

    /// Number of live exits.
    pub fn live_exits(&self) -> usize {
        self.exits.len()
    }

    // ── Challenges ─────────────────────────────────────────────────────

    /// Look up an open challenge.
    pub fn challenge(&self, coin: CoinId, tx_hash: &H256) -> Option<&Challenge> {
        self.challenges.get(&(coin, *tx_hash))
    }

    /// Record an open challenge, assigning its sequence number. Returns
    /// `false`, leaving the book unchanged, if the key is taken.
    pub fn open_challenge(&mut self, mut challenge: Challenge) -> bool {
        let key = (challenge.coin_id, challenge.challenged_tx_hash);
        if self.challenges.contains_key(&key) {
            return false;
        }
        challenge.sequence = self.next_sequence;
        challenge.status = ChallengeStatus::Open;
        self.next_sequence += 1;
        self.challenges.insert(key, challenge);
        true
    }

    /// Remove one challenge, resolving it with `status`.
    pub fn resolve_challenge(
        &mut self,
        coin: CoinId,
        tx_hash: &H256,
        status: ChallengeStatus,
    ) -> Option<Challenge> {
        self.challenges
            .remove(&(coin, *tx_hash))
            .map(|c| c.resolve(status))
    }

    /// Open challenges against `coin`, oldest first.
    pub fn challenges_for(&self, coin: CoinId) -> Vec<&Challenge> {
        let mut out: Vec<&Challenge> = self
            .challenges
            .range((coin, H256::ZERO)..=(coin, H256([0xFF; 32])))
            .map(|(_, c)| c)
            .collect();
        out.sort_by_key(|c| c.sequence);
        out
    }

    /// Whether any challenge against `coin` is open.
    pub fn has_open_challenges(&self, coin: CoinId) -> bool {
        self.challenges
            .range((coin, H256::ZERO)..=(coin, H256([0xFF; 32])))
            .next()
            .is_some()
    }

    /// Remove every challenge against `coin`, resolving each with `status`.
    /// Oldest first.
    pub fn drain_challenges(&mut self, coin: CoinId, status: ChallengeStatus) -> Vec<Challenge> {
        let keys: Vec<(CoinId, H256)> = self
            .challenges
            .range((coin, H256::ZERO)..=(coin, H256([0xFF; 32])))
            .map(|(k, _)| *k)
            .collect();
        let mut out: Vec<Challenge> = keys
            .iter()
            .filter_map(|k| self.challenges.remove(k))
            .map(|c| c.resolve(status))
            .collect();
        out.sort_by_key(|c| c.sequence);
        out
    }

    /// Number of open challenges across all coins.
    pub fn open_challenges(&self) -> usize {
        self.challenges.len()
    }
}
