//! # Ownership Registry
//!
//! The external token registry recording who owns each coin on the base
//! ledger. A coin is minted to its depositor and moves only when an exit
//! finalizes.

use std::collections::{BTreeMap, BTreeSet};

use pcx_core::{Address, CoinId};

use crate::error::StateError;

/// Mint/transfer hooks of the ownership registry.
pub trait OwnershipRegistry: Send {
    /// Register a new coin owned by `owner`.
    fn mint(&mut self, coin: CoinId, owner: Address) -> Result<(), StateError>;

    /// Move an existing coin to `to`.
    fn transfer(&mut self, coin: CoinId, to: Address) -> Result<(), StateError>;

    /// Current owner of `coin`.
    fn owner_of(&self, coin: CoinId) -> Option<Address>;

    /// Every coin owned by `owner`, ascending.
    fn owned_by(&self, owner: Address) -> Vec<CoinId>;
}

/// In-memory registry with a reverse index for [`owned_by`](OwnershipRegistry::owned_by).
#[derive(Debug, Clone, Default)]
pub struct InMemoryOwnership {
    owners: BTreeMap<CoinId, Address>,
    holdings: BTreeMap<Address, BTreeSet<CoinId>>,
}

impl InMemoryOwnership {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn unlink(&mut self, coin: CoinId, owner: Address) {
        if let Some(set) = self.holdings.get_mut(&owner) {
            set.remove(&coin);
            if set.is_empty() {
                self.holdings.remove(&owner);
            }
        }
    }
}

impl OwnershipRegistry for InMemoryOwnership {
    fn mint(&mut self, coin: CoinId, owner: Address) -> Result<(), StateError> {
        if self.owners.contains_key(&coin) {
            return Err(StateError::DuplicateCoin { coin });
        }
        self.owners.insert(coin, owner);
        self.holdings.entry(owner).or_default().insert(coin);
        Ok(())
    }

    fn transfer(&mut self, coin: CoinId, to: Address) -> Result<(), StateError> {
        let from = self
            .owners
            .get(&coin)
            .copied()
            .ok_or(StateError::UnknownCoin { coin })?;
        self.unlink(coin, from);
        self.owners.insert(coin, to);
        self.holdings.entry(to).or_default().insert(coin);
        Ok(())
    }

    fn owner_of(&self, coin: CoinId) -> Option<Address> {
        self.owners.get(&coin).copied()
    }

    fn owned_by(&self, owner: Address) -> Vec<CoinId> {
        self.holdings
            .get(&owner)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: Address = Address([0xA1; 20]);
    const BOB: Address = Address([0xB0; 20]);

    #[test]
    fn test_mint_and_transfer_update_index() {
        let mut reg = InMemoryOwnership::new();
        reg.mint(CoinId(0), ALICE).unwrap();
        reg.mint(CoinId(1), ALICE).unwrap();
        assert_eq!(reg.owned_by(ALICE), vec![CoinId(0), CoinId(1)]);

        reg.transfer(CoinId(0), BOB).unwrap();
        assert_eq!(reg.owner_of(CoinId(0)), Some(BOB));
        assert_eq!(reg.owned_by(ALICE), vec![CoinId(1)]);
        assert_eq!(reg.owned_by(BOB), vec![CoinId(0)]);
    }

    #[test]
    fn test_double_mint_rejected() {
        let mut reg = InMemoryOwnership::new();
        reg.mint(CoinId(0), ALICE).unwrap();
        assert_eq!(
            reg.mint(CoinId(0), BOB),
            Err(StateError::DuplicateCoin { coin: CoinId(0) })
        );
        assert_eq!(reg.owner_of(CoinId(0)), Some(ALICE));
    }

    #[test]
    fn test_transfer_unknown_coin_rejected() {
        let mut reg = InMemoryOwnership::new();
        assert!(matches!(
            reg.transfer(CoinId(5), BOB),
            Err(StateError::UnknownCoin { .. })
        ));
        assert!(reg.owned_by(BOB).is_empty());
    }

    #[test]
    fn test_transfer_to_self_keeps_holding() {
        let mut reg = InMemoryOwnership::new();
        reg.mint(CoinId(3), ALICE).unwrap();
        reg.transfer(CoinId(3), ALICE).unwrap();
        assert_eq!(reg.owned_by(ALICE), vec![CoinId(3)]);
    }
}
