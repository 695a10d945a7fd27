//! Thread-safe handle to one exit game.
//!
//! Every entry point runs under a single `parking_lot::Mutex`, so calls
//! from many threads are serialized against the one ledger. The lock is
//! never held across an `.await`; `parking_lot` locks do not poison.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use pcx_core::Clock;
use pcx_state::{EscrowLedger, OwnershipRegistry};

use crate::game::ExitGame;

/// Cloneable, serialized access to an [`ExitGame`].
#[derive(Debug)]
pub struct SharedExitGame<E, O, C> {
    inner: Arc<Mutex<ExitGame<E, O, C>>>,
}

impl<E, O, C> Clone for SharedExitGame<E, O, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: EscrowLedger, O: OwnershipRegistry, C: Clock> SharedExitGame<E, O, C> {
    /// Wrap a game.
    pub fn new(game: ExitGame<E, O, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(game)),
        }
    }

    /// Run `f` with exclusive access. The whole closure is one
    /// transition as seen by other threads.
    pub fn with<R>(&self, f: impl FnOnce(&mut ExitGame<E, O, C>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Hold the lock directly.
    pub fn lock(&self) -> MutexGuard<'_, ExitGame<E, O, C>> {
        self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExitGameConfig;
    use pcx_core::{Address, Amount, ManualClock};
    use pcx_state::{InMemoryEscrow, InMemoryOwnership};

    #[test]
    fn test_clones_share_one_ledger() {
        let depositor = Address([0xA1; 20]);
        let escrow = InMemoryEscrow::new()
            .with_funds(depositor, Amount::new(1_000))
            .unwrap();
        let game = ExitGame::new(
            ExitGameConfig::new(Address([0x0E; 20]), Address([0x0A; 20])),
            escrow,
            InMemoryOwnership::new(),
            ManualClock::default(),
        )
        .unwrap();
        let shared = SharedExitGame::new(game);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let g = shared.clone();
                std::thread::spawn(move || g.with(|game| game.deposit(depositor, Amount::new(10))))
            })
            .collect();
        for h in handles {
            h.join().unwrap().unwrap();
        }

        let game = shared.lock();
        assert_eq!(game.owned_by(depositor).len(), 4);
        assert_eq!(game.escrow().held(), Amount::new(40));
    }
}
