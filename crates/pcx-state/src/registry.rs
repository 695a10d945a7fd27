//! # Coin & Balance Registry
//!
//! Per-coin lifecycle bookkeeping and per-address bond balances, backed by
//! the escrow and ownership collaborators.
//!
//! ## Balances
//!
//! Each address has two buckets:
//!
//! - `bonded`: bonds backing a live exit or an open challenge.
//! - `withdrawable`: bonds returned or won, claimable with [`CoinRegistry::withdraw`].
//!
//! Every bond enters through [`CoinRegistry::post_bond`] and leaves through
//! [`CoinRegistry::withdraw`]. Between the two, plans built by
//! [`CoinRegistry::plan`] only move value between buckets and addresses,
//! so
//!
//! ```text
//! Σ (bonded + withdrawable) + withdrawn == posted
//! ```
//!
//! holds after every committed call. [`CoinRegistry::bond_totals`] exposes
//! the three sums.
//!
//! ## Security Invariant
//!
//! Every method validates before it mutates. Calls into a collaborator
//! that can fail happen before any registry field changes.

use std::collections::BTreeMap;

use pcx_core::{Address, Amount, BlockNumber, CoinId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::coin::{Coin, CoinState};
use crate::error::StateError;
use crate::escrow::EscrowLedger;
use crate::ownership::OwnershipRegistry;

/// Bond balances of one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Balance {
    /// Bonds currently at stake.
    pub bonded: Amount,
    /// Bonds available to withdraw.
    pub withdrawable: Amount,
}

/// A signed change to one balance bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delta {
    /// No change.
    Zero,
    /// Increase by the amount.
    Credit(Amount),
    /// Decrease by the amount.
    Debit(Amount),
}

impl Delta {
    fn apply(self, current: Amount) -> Option<Amount> {
        match self {
            Self::Zero => Some(current),
            Self::Credit(a) => current.checked_add(a),
            Self::Debit(a) => current.checked_sub(a),
        }
    }
}

/// Aggregate bond accounting across all addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BondTotals {
    /// Every bond ever posted.
    pub posted: Amount,
    /// Sum of all bonded balances.
    pub bonded: Amount,
    /// Sum of all withdrawable balances.
    pub withdrawable: Amount,
    /// Every bond ever withdrawn.
    pub withdrawn: Amount,
}

impl BondTotals {
    /// Whether no bond value has been created or lost.
    pub fn is_conserved(&self) -> bool {
        self.bonded
            .checked_add(self.withdrawable)
            .and_then(|s| s.checked_add(self.withdrawn))
            .map(|total| total == self.posted)
            .unwrap_or(false)
    }
}

/// Balance changes validated by [`CoinRegistry::plan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use = "a plan does nothing until committed"]
pub struct BalancePlan {
    next: BTreeMap<Address, Balance>,
}

impl BalancePlan {
    /// The balance `address` will have once the plan is committed, if the
    /// plan touches it.
    pub fn balance(&self, address: Address) -> Option<Balance> {
        self.next.get(&address).copied()
    }
}

fn apply_deltas(
    current: Balance,
    address: Address,
    bonded: Delta,
    withdrawable: Delta,
) -> Result<Balance, StateError> {
    let next_bonded = bonded.apply(current.bonded).ok_or(match bonded {
        Delta::Debit(requested) => StateError::InsufficientBond {
            address,
            requested,
            bonded: current.bonded,
        },
        _ => StateError::BalanceOverflow { address },
    })?;
    let next_withdrawable = withdrawable
        .apply(current.withdrawable)
        .ok_or(match withdrawable {
            Delta::Debit(requested) => StateError::InsufficientBalance {
                address,
                requested,
                withdrawable: current.withdrawable,
            },
            _ => StateError::BalanceOverflow { address },
        })?;
    Ok(Balance {
        bonded: next_bonded,
        withdrawable: next_withdrawable,
    })
}

/// Registry of coins and bond balances.
#[derive(Debug)]
pub struct CoinRegistry<E, O> {
    coins: BTreeMap<CoinId, Coin>,
    balances: BTreeMap<Address, Balance>,
    escrow: E,
    ownership: O,
    deposits: u64,
    posted: Amount,
    withdrawn: Amount,
}

impl<E: EscrowLedger, O: OwnershipRegistry> CoinRegistry<E, O> {
    /// An empty registry over the given collaborators.
    pub fn new(escrow: E, ownership: O) -> Self {
        Self {
            coins: BTreeMap::new(),
            balances: BTreeMap::new(),
            escrow,
            ownership,
            deposits: 0,
            posted: Amount::ZERO,
            withdrawn: Amount::ZERO,
        }
    }

    // ── Coins ──────────────────────────────────────────────────────────

    /// Escrow `denomination` from `owner` and mint a fresh coin.
    ///
    /// Coin ids count up from zero; the coin's deposit block is the
    /// running deposit count (coin 0 gets block 1).
    ///
    /// # Errors
    ///
    /// `ZeroDenomination`, `DuplicateCoin` if the ownership registry
    /// already knows the next id, or `Escrow` if `owner` cannot pay.
    pub fn deposit(
        &mut self,
        owner: Address,
        denomination: Amount,
        now: Timestamp,
    ) -> Result<Coin, StateError> {
        if denomination.is_zero() {
            return Err(StateError::ZeroDenomination);
        }
        let id = CoinId(self.deposits);
        if self.ownership.owner_of(id).is_some() {
            return Err(StateError::DuplicateCoin { coin: id });
        }
        self.escrow.escrow(owner, denomination)?;
        self.ownership.mint(id, owner)?;

        self.deposits += 1;
        let coin = Coin {
            id,
            denomination,
            depositor: owner,
            deposit_block: BlockNumber(self.deposits),
            state: CoinState::Deposited,
            redeemed: false,
            created_at: now,
        };
        self.coins.insert(id, coin.clone());
        tracing::info!(coin = id.as_u64(), depositor = %owner, %denomination, "coin deposited");
        Ok(coin)
    }

    /// Look up a coin.
    pub fn coin(&self, id: CoinId) -> Option<&Coin> {
        self.coins.get(&id)
    }

    /// Look up a coin, failing with `UnknownCoin`.
    pub fn require_coin(&self, id: CoinId) -> Result<&Coin, StateError> {
        self.coins.get(&id).ok_or(StateError::UnknownCoin { coin: id })
    }

    /// Number of coins ever deposited.
    pub fn coin_count(&self) -> u64 {
        self.deposits
    }

    /// Set a coin's lifecycle state.
    pub fn set_state(&mut self, id: CoinId, state: CoinState) -> Result<(), StateError> {
        let coin = self
            .coins
            .get_mut(&id)
            .ok_or(StateError::UnknownCoin { coin: id })?;
        coin.state = state;
        Ok(())
    }

    /// Hand the coin to `to` in the ownership registry and mark it exited.
    pub fn transfer_on_exit(&mut self, id: CoinId, to: Address) -> Result<(), StateError> {
        self.require_coin(id)?;
        self.ownership.transfer(id, to)?;
        self.set_state(id, CoinState::Exited)
    }

    /// Release an exited coin's value to its registry owner, exactly once.
    ///
    /// # Errors
    ///
    /// `UnknownCoin`, `InvalidCoinState` unless exited, `AlreadyRedeemed`
    /// on replay, `Unauthorized` if `by` is not the registry owner, or
    /// `Escrow` if the ledger cannot release.
    pub fn redeem(&mut self, id: CoinId, by: Address) -> Result<Amount, StateError> {
        let coin = self.require_coin(id)?;
        if coin.state != CoinState::Exited {
            return Err(StateError::InvalidCoinState {
                coin: id,
                state: coin.state,
                action: "redeem",
            });
        }
        if coin.redeemed {
            return Err(StateError::AlreadyRedeemed { coin: id });
        }
        if self.ownership.owner_of(id) != Some(by) {
            return Err(StateError::Unauthorized {
                caller: by,
                action: "redeem",
            });
        }
        let amount = coin.denomination;
        self.escrow.release(by, amount)?;
        if let Some(coin) = self.coins.get_mut(&id) {
            coin.redeemed = true;
        }
        tracing::info!(coin = id.as_u64(), owner = %by, %amount, "coin redeemed");
        Ok(amount)
    }

    /// Current registry owner of a coin.
    pub fn owner_of(&self, id: CoinId) -> Option<Address> {
        self.ownership.owner_of(id)
    }

    /// Every coin the registry assigns to `owner`.
    pub fn owned_by(&self, owner: Address) -> Vec<CoinId> {
        self.ownership.owned_by(owner)
    }

    // ── Balances ───────────────────────────────────────────────────────

    /// Balances of `address` (zero if never seen).
    pub fn balance(&self, address: Address) -> Balance {
        self.balances.get(&address).copied().unwrap_or_default()
    }

    /// Escrow a bond from `address` and credit it as bonded.
    pub fn post_bond(&mut self, address: Address, amount: Amount) -> Result<(), StateError> {
        let current = self.balance(address);
        let bonded = current
            .bonded
            .checked_add(amount)
            .ok_or(StateError::BalanceOverflow { address })?;
        let posted = self
            .posted
            .checked_add(amount)
            .ok_or(StateError::BalanceOverflow { address })?;
        self.escrow.escrow(address, amount)?;
        self.balances.insert(address, Balance { bonded, ..current });
        self.posted = posted;
        Ok(())
    }

    /// Validate a set of balance changes without applying them.
    ///
    /// Changes are applied in order, so several entries for one address
    /// compose. The returned plan is applied with [`commit`](Self::commit).
    ///
    /// # Errors
    ///
    /// `InsufficientBond` if a bonded balance would go negative,
    /// `InsufficientBalance` if a withdrawable one would, `BalanceOverflow`
    /// on overflow.
    pub fn plan(&self, changes: &[(Address, Delta, Delta)]) -> Result<BalancePlan, StateError> {
        let mut next: BTreeMap<Address, Balance> = BTreeMap::new();
        for &(address, bonded, withdrawable) in changes {
            let current = next
                .get(&address)
                .copied()
                .unwrap_or_else(|| self.balance(address));
            next.insert(address, apply_deltas(current, address, bonded, withdrawable)?);
        }
        Ok(BalancePlan { next })
    }

    /// Apply a validated plan.
    pub fn commit(&mut self, plan: BalancePlan) {
        self.balances.extend(plan.next);
    }

    /// Release the whole withdrawable balance of `address` from escrow.
    ///
    /// A zero balance is a no-op returning zero.
    pub fn withdraw(&mut self, address: Address) -> Result<Amount, StateError> {
        let current = self.balance(address);
        let amount = current.withdrawable;
        if amount.is_zero() {
            return Ok(Amount::ZERO);
        }
        let withdrawn = self
            .withdrawn
            .checked_add(amount)
            .ok_or(StateError::BalanceOverflow { address })?;
        self.escrow.release(address, amount)?;
        self.balances.insert(
            address,
            Balance {
                withdrawable: Amount::ZERO,
                ..current
            },
        );
        self.withdrawn = withdrawn;
        tracing::info!(%address, %amount, "bonds withdrawn");
        Ok(amount)
    }

    /// Aggregate bond accounting.
    pub fn bond_totals(&self) -> BondTotals {
        let (bonded, withdrawable) = self.balances.values().fold(
            (Amount::ZERO, Amount::ZERO),
            |(b, w), bal| {
                (
                    b.checked_add(bal.bonded).unwrap_or(b),
                    w.checked_add(bal.withdrawable).unwrap_or(w),
                )
            },
        );
        BondTotals {
            posted: self.posted,
            bonded,
            withdrawable,
            withdrawn: self.withdrawn,
        }
    }

    /// The escrow collaborator.
    pub fn escrow(&self) -> &E {
        &self.escrow
    }

    /// The ownership collaborator.
    pub fn ownership(&self) -> &O {
        &self.ownership
    }
}
