//! # Value-Escrow Ledger
//!
//! The base-ledger collaborator that actually holds value. The exit game
//! only ever moves value in two directions: a participant's account into
//! escrow (deposits, bonds) and escrow back out to a participant
//! (redemptions, bond withdrawals).
//!
//! ## Security Invariant
//!
//! `escrow` and `release` either move the full amount or fail with no
//! effect. Release never exceeds what is held.

use std::collections::BTreeMap;

use pcx_core::{Address, Amount};

use crate::error::EscrowError;

/// Escrow/release hooks of the value ledger.
pub trait EscrowLedger: Send {
    /// Move `amount` from `from`'s account into escrow.
    fn escrow(&mut self, from: Address, amount: Amount) -> Result<(), EscrowError>;

    /// Move `amount` out of escrow to `to`'s account.
    fn release(&mut self, to: Address, amount: Amount) -> Result<(), EscrowError>;

    /// Total value currently held in escrow.
    fn held(&self) -> Amount;
}

/// An in-memory value ledger with per-address accounts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEscrow {
    accounts: BTreeMap<Address, Amount>,
    held: Amount,
}

impl InMemoryEscrow {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` from outside the system.
    pub fn fund(&mut self, account: Address, amount: Amount) -> Result<(), EscrowError> {
        let current = self.balance_of(account);
        let next = current.checked_add(amount).ok_or(EscrowError::Overflow)?;
        self.accounts.insert(account, next);
        Ok(())
    }

    /// Builder form of [`fund`](Self::fund).
    pub fn with_funds(mut self, account: Address, amount: Amount) -> Result<Self, EscrowError> {
        self.fund(account, amount)?;
        Ok(self)
    }

    /// Spendable balance of `account`.
    pub fn balance_of(&self, account: Address) -> Amount {
        self.accounts.get(&account).copied().unwrap_or(Amount::ZERO)
    }
}

impl EscrowLedger for InMemoryEscrow {
    fn escrow(&mut self, from: Address, amount: Amount) -> Result<(), EscrowError> {
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(EscrowError::InsufficientFunds {
                account: from,
                requested: amount,
                available,
            })?;
        let held = self.held.checked_add(amount).ok_or(EscrowError::Overflow)?;
        self.accounts.insert(from, remaining);
        self.held = held;
        Ok(())
    }

    fn release(&mut self, to: Address, amount: Amount) -> Result<(), EscrowError> {
        let held = self
            .held
            .checked_sub(amount)
            .ok_or(EscrowError::InsufficientHeld {
                requested: amount,
                held: self.held,
            })?;
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;
        self.accounts.insert(to, credited);
        self.held = held;
        Ok(())
    }

    fn held(&self) -> Amount {
        self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: Address = Address([0xA1; 20]);
    const BOB: Address = Address([0xB0; 20]);

    #[test]
    fn test_escrow_then_release_moves_value() {
        let mut ledger = InMemoryEscrow::new().with_funds(ALICE, Amount::new(100)).unwrap();
        ledger.escrow(ALICE, Amount::new(60)).unwrap();
        assert_eq!(ledger.balance_of(ALICE), Amount::new(40));
        assert_eq!(ledger.held(), Amount::new(60));

        ledger.release(BOB, Amount::new(60)).unwrap();
        assert_eq!(ledger.balance_of(BOB), Amount::new(60));
        assert_eq!(ledger.held(), Amount::ZERO);
    }

    #[test]
    fn test_insufficient_funds_has_no_effect() {
        let mut ledger = InMemoryEscrow::new().with_funds(ALICE, Amount::new(10)).unwrap();
        let err = ledger.escrow(ALICE, Amount::new(11)).unwrap_err();
        assert_eq!(
            err,
            EscrowError::InsufficientFunds {
                account: ALICE,
                requested: Amount::new(11),
                available: Amount::new(10),
            }
        );
        assert_eq!(ledger.balance_of(ALICE), Amount::new(10));
        assert_eq!(ledger.held(), Amount::ZERO);
    }

    #[test]
    fn test_release_beyond_held_rejected() {
        let mut ledger = InMemoryEscrow::new();
        assert!(matches!(
            ledger.release(BOB, Amount::new(1)),
            Err(EscrowError::InsufficientHeld { .. })
        ));
        assert_eq!(ledger.balance_of(BOB), Amount::ZERO);
    }
}
