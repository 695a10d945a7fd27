//! # Exit Game
//!
//! The transition function over one logical ledger: the child-chain block
//! store, the coin and balance registry, and the exit book. Every entry
//! point takes the acting address as `caller`.
//!
//! ## Lifecycle per coin
//!
//! ```text
//! NONE ──start_exit──▶ PENDING ──finalize_exit──▶ FINALIZED
//!                         │
//!                         ├──cancel_exit──────────▶ CANCELED
//!                         ├──challenge_between────▶ CANCELED
//!                         ├──challenge_after──────▶ CANCELED
//!                         └──finalize_exit with an
//!                            unanswered challenge ▶ CANCELED
//! ```
//!
//! A coin whose exit is cancelled returns to `DEPOSITED` and may exit
//! again.
//!
//! ## Security Invariant
//!
//! Each entry point checks every precondition and validates every balance
//! change before it mutates anything. Fallible collaborator calls (escrow,
//! ownership) run before the book and balances are committed, so a call
//! either commits fully or leaves no trace.

use pcx_core::{Address, Amount, BlockNumber, Clock, CoinId, Timestamp, H256};
use pcx_state::{
    Balance, BalancePlan, BondTotals, Challenge, ChallengeStatus, ChildBlock, ChildChain, Coin,
    CoinRegistry, CoinState, Delta, EscrowLedger, Exit, ExitBook, ExitState, OwnershipRegistry,
    StateError,
};

use crate::config::ExitGameConfig;
use crate::error::{ExitGameError, VerificationError};
use crate::verify::{verify_transfer, Linkage, SignerRule, TransferEvidence, VerifiedTransfer};

type Change = (Address, Delta, Delta);

/// Arguments of [`ExitGame::start_exit`].
///
/// For a deposit exit `prev_block` is zero, `prev_tx` and both proofs are
/// empty and `exit_block` is the coin's deposit block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartExitRequest {
    /// The exiting coin.
    pub coin_id: CoinId,
    /// Encoded previous transfer.
    pub prev_tx: Vec<u8>,
    /// Encoded exiting transfer.
    pub exiting_tx: Vec<u8>,
    /// Proof of `prev_tx` at `prev_block`.
    pub prev_proof: Vec<u8>,
    /// Proof of `exiting_tx` at `exit_block`.
    pub exiting_proof: Vec<u8>,
    /// Signature over the exiting transfer's hash.
    pub signature: Vec<u8>,
    /// Block of the previous transfer.
    pub prev_block: BlockNumber,
    /// Block of the exiting transfer.
    pub exit_block: BlockNumber,
    /// Bond posted with the exit.
    pub bond: Amount,
}

impl StartExitRequest {
    fn prev_evidence(&self) -> TransferEvidence {
        TransferEvidence::new(
            self.prev_block,
            self.prev_tx.clone(),
            self.prev_proof.clone(),
            Vec::new(),
        )
    }

    fn exiting_evidence(&self) -> TransferEvidence {
        TransferEvidence::new(
            self.exit_block,
            self.exiting_tx.clone(),
            self.exiting_proof.clone(),
            self.signature.clone(),
        )
    }
}

/// What a successful [`ExitGame::finalize_exit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The exit matured unchallenged; the coin now belongs to `owner`.
    Finalized {
        /// The new registry owner.
        owner: Address,
    },
    /// An unanswered challenge defeated the exit.
    ChallengeUpheld {
        /// Who opened the winning challenge.
        challenger: Address,
        /// The transfer it cited.
        challenged_tx_hash: H256,
    },
}

/// The exit game over one ledger.
#[derive(Debug)]
pub struct ExitGame<E, O, C> {
    config: ExitGameConfig,
    paused: bool,
    chain: ChildChain,
    registry: CoinRegistry<E, O>,
    book: ExitBook,
    clock: C,
}

impl<E: EscrowLedger, O: OwnershipRegistry, C: Clock> ExitGame<E, O, C> {
    /// A fresh game.
    ///
    /// # Errors
    ///
    /// `Config` if `config` fails validation.
    pub fn new(config: ExitGameConfig, escrow: E, ownership: O, clock: C) -> Result<Self, ExitGameError> {
        config.validate()?;
        Ok(Self {
            chain: ChildChain::new(config.operator),
            config,
            paused: false,
            registry: CoinRegistry::new(escrow, ownership),
            book: ExitBook::new(),
            clock,
        })
    }

    // ── Administration ─────────────────────────────────────────────────

    /// Pause or resume `deposit` and `start_exit`. Owner only.
    pub fn set_paused(&mut self, caller: Address, paused: bool) -> Result<(), ExitGameError> {
        self.require_owner(caller, "set_paused")?;
        self.paused = paused;
        tracing::info!(paused, "pause switch set");
        Ok(())
    }

    /// Replace the bond amount and both periods. Owner only.
    ///
    /// Live exits are judged against the new periods from their next
    /// finalize attempt.
    pub fn set_maturity_and_bond(
        &mut self,
        caller: Address,
        bond_amount: Amount,
        maturity_period_secs: u64,
        challenge_window_secs: u64,
    ) -> Result<(), ExitGameError> {
        self.require_owner(caller, "set_maturity_and_bond")?;
        let next = ExitGameConfig {
            bond_amount,
            maturity_period_secs,
            challenge_window_secs,
            ..self.config.clone()
        };
        next.validate()?;
        self.config = next;
        tracing::info!(
            bond = %bond_amount,
            maturity_period_secs,
            challenge_window_secs,
            "exit parameters updated"
        );
        Ok(())
    }

    /// Store a child-chain block root. Operator only.
    ///
    /// Deposit blocks share this number space and count up from 1 with
    /// each deposit. A spend exit needs its deposit block below the block
    /// of the first spend, so operators number child blocks well above the
    /// deposit count, e.g. in steps of 1000.
    pub fn submit_block(
        &mut self,
        caller: Address,
        number: BlockNumber,
        root: H256,
    ) -> Result<ChildBlock, ExitGameError> {
        let now = self.clock.now();
        Ok(self.chain.submit_block(caller, number, root, now)?.clone())
    }

    // ── Deposits and redemption ────────────────────────────────────────

    /// Escrow `denomination` from `caller` and mint a coin.
    pub fn deposit(&mut self, caller: Address, denomination: Amount) -> Result<Coin, ExitGameError> {
        self.require_unpaused("deposit")?;
        let now = self.clock.now();
        Ok(self.registry.deposit(caller, denomination, now)?)
    }

    /// Release an exited coin's value to its registry owner, once.
    pub fn redeem(&mut self, caller: Address, coin: CoinId) -> Result<Amount, ExitGameError> {
        Ok(self.registry.redeem(coin, caller)?)
    }

    /// Release `caller`'s withdrawable bonds. Zero if there are none.
    pub fn withdraw_bonds(&mut self, caller: Address) -> Result<Amount, ExitGameError> {
        Ok(self.registry.withdraw(caller)?)
    }

    // ── Exits ──────────────────────────────────────────────────────────

    /// Open an exit for `request.coin_id`.
    ///
    /// # Errors
    ///
    /// - `Paused`, `ExitAlreadyExists`, `WrongBond`.
    /// - `State(UnknownCoin | InvalidCoinState)` unless the coin is
    ///   deposited and idle.
    /// - `Verification(_)` if either transfer fails verification, the
    ///   exiting transfer does not spend `prev_block`, or the blocks are
    ///   out of order.
    /// - `State(Unauthorized)` if `caller` is not the exiting recipient.
    /// - `State(Escrow(_))` if the bond cannot be escrowed.
    pub fn start_exit(&mut self, caller: Address, request: &StartExitRequest) -> Result<(), ExitGameError> {
        self.require_unpaused("start_exit")?;
        let coin_id = request.coin_id;
        if self.book.exit(coin_id).is_some() {
            return Err(ExitGameError::ExitAlreadyExists { coin: coin_id });
        }
        self.require_bond(request.bond)?;
        let coin = self.registry.require_coin(coin_id)?;
        if coin.state != CoinState::Deposited {
            return Err(StateError::InvalidCoinState {
                coin: coin_id,
                state: coin.state,
                action: "start_exit",
            }
            .into());
        }

        let (prev_owner, exiting) = if request.prev_block.is_deposit_marker() {
            let exiting = verify_transfer(
                &self.chain,
                coin,
                &request.exiting_evidence(),
                SignerRule::Exactly(coin.depositor),
                Linkage::ChildOf(BlockNumber::DEPOSIT),
            )?;
            (coin.depositor, exiting)
        } else {
            let prev = verify_transfer(
                &self.chain,
                coin,
                &request.prev_evidence(),
                SignerRule::Unchecked,
                Linkage::Any,
            )?;
            let prev_owner = prev.tx.recipient;
            let exiting = verify_transfer(
                &self.chain,
                coin,
                &request.exiting_evidence(),
                SignerRule::Exactly(prev_owner),
                Linkage::ChildOf(request.prev_block),
            )?;
            (prev_owner, exiting)
        };
        if request.prev_block >= request.exit_block {
            return Err(VerificationError::InvalidChain(format!(
                "previous {} is not before exiting {}",
                request.prev_block, request.exit_block
            ))
            .into());
        }

        let claimed_owner = exiting.tx.recipient;
        if caller != claimed_owner {
            return Err(StateError::Unauthorized {
                caller,
                action: "start_exit",
            }
            .into());
        }

        let bond = request.bond;
        self.registry.post_bond(caller, bond)?;
        self.registry.set_state(coin_id, CoinState::Exiting)?;
        let opened = self.book.open_exit(Exit {
            coin_id,
            claimed_owner,
            prev_owner,
            priority: request.prev_block.min(request.exit_block),
            prev_block: request.prev_block,
            exit_block: request.exit_block,
            created_at: self.clock.now(),
            bond,
            state: ExitState::Pending,
        });
        debug_assert!(opened, "second live exit passed the pre-check");
        tracing::info!(
            coin = coin_id.as_u64(),
            owner = %claimed_owner,
            prev_block = request.prev_block.as_u64(),
            exit_block = request.exit_block.as_u64(),
            "exit started"
        );
        Ok(())
    }

    /// Withdraw a live exit. Claimed owner only; the bond becomes
    /// withdrawable and open challenges are dismissed with refunds.
    pub fn cancel_exit(&mut self, caller: Address, coin: CoinId) -> Result<(), ExitGameError> {
        let exit = self.require_exit(coin)?.clone();
        if caller != exit.claimed_owner {
            return Err(StateError::Unauthorized {
                caller,
                action: "cancel_exit",
            }
            .into());
        }
        let mut changes = vec![(exit.claimed_owner, Delta::Debit(exit.bond), Delta::Credit(exit.bond))];
        changes.extend(self.dismissal_refunds(coin, None));
        let plan = self.registry.plan(&changes)?;

        self.registry.set_state(coin, CoinState::Deposited)?;
        self.retire_exit(coin, ExitState::Canceled, plan);
        tracing::info!(coin = coin.as_u64(), owner = %caller, "exit cancelled");
        Ok(())
    }

    /// Finalize the exit on `coin`. Anyone may call.
    ///
    /// Once `created_at + maturity + window` has passed: with no open
    /// challenge the claimed owner receives the coin and their bond back;
    /// otherwise the earliest open challenge is upheld and its challenger
    /// takes both bonds.
    pub fn finalize_exit(&mut self, coin: CoinId) -> Result<ExitOutcome, ExitGameError> {
        let exit = self.require_exit(coin)?.clone();
        let now = self.clock.now();
        let ready_at = self
            .config
            .contest_period_secs()
            .and_then(|secs| exit.created_at.plus_secs(secs))
            .ok_or(ExitGameError::DeadlineOverflow { coin })?;
        if now < ready_at {
            return Err(ExitGameError::NotMature { coin, ready_at, now });
        }

        let upheld = self.book.challenges_for(coin).first().map(|c| (*c).clone());
        match upheld {
            None => {
                let owner = exit.claimed_owner;
                let plan = self
                    .registry
                    .plan(&[(owner, Delta::Debit(exit.bond), Delta::Credit(exit.bond))])?;
                self.registry.transfer_on_exit(coin, owner)?;
                self.retire_exit(coin, ExitState::Finalized, plan);
                tracing::info!(coin = coin.as_u64(), %owner, "exit finalized");
                Ok(ExitOutcome::Finalized { owner })
            }
            Some(challenge) => {
                let mut changes = vec![
                    (challenge.challenger, Delta::Debit(challenge.bond), Delta::Credit(challenge.bond)),
                    (challenge.challenger, Delta::Zero, Delta::Credit(exit.bond)),
                    (exit.claimed_owner, Delta::Debit(exit.bond), Delta::Zero),
                ];
                changes.extend(self.dismissal_refunds(coin, Some(&challenge.challenged_tx_hash)));
                let plan = self.registry.plan(&changes)?;

                self.registry.set_state(coin, CoinState::Deposited)?;
                self.book.resolve_challenge(
                    coin,
                    &challenge.challenged_tx_hash,
                    ChallengeStatus::ResolvedByTimeout,
                );
                self.retire_exit(coin, ExitState::Canceled, plan);
                tracing::info!(
                    coin = coin.as_u64(),
                    challenger = %challenge.challenger,
                    tx_hash = %challenge.challenged_tx_hash,
                    "challenge upheld, exit defeated"
                );
                Ok(ExitOutcome::ChallengeUpheld {
                    challenger: challenge.challenger,
                    challenged_tx_hash: challenge.challenged_tx_hash,
                })
            }
        }
    }

    /// Finalize several exits. Each coin succeeds or fails on its own.
    pub fn finalize_exits(&mut self, coins: &[CoinId]) -> Vec<Result<ExitOutcome, ExitGameError>> {
        coins
            .iter()
            .map(|&coin| {
                let result = self.finalize_exit(coin);
                if let Err(e) = &result {
                    tracing::warn!(coin = coin.as_u64(), error = %e, "finalize skipped");
                }
                result
            })
            .collect()
    }

    // ── Challenges ─────────────────────────────────────────────────────

    /// Contest an exit with an earlier transfer of the coin. Bonded.
    ///
    /// The transfer must sit in a block before the exit's own, and the
    /// challenge must arrive within the maturity period so its recipient
    /// has at least a full challenge window to answer with
    /// [`respond_challenge_before`](Self::respond_challenge_before). The
    /// transfer's signature must recover; a deposit transfer must be
    /// signed by the depositor.
    pub fn challenge_before(
        &mut self,
        caller: Address,
        coin: CoinId,
        evidence: &TransferEvidence,
        bond: Amount,
    ) -> Result<H256, ExitGameError> {
        let exit = self.require_exit(coin)?;
        let exit_block = exit.exit_block;
        let closed_at = exit
            .created_at
            .plus_secs(self.config.maturity_period_secs)
            .ok_or(ExitGameError::DeadlineOverflow { coin })?;
        let now = self.clock.now();
        if now >= closed_at {
            return Err(ExitGameError::ChallengePeriodOver { coin, closed_at, now });
        }
        self.require_bond(bond)?;
        let record = self.registry.require_coin(coin)?;
        let depositor = record.depositor;
        let verified = verify_transfer(&self.chain, record, evidence, SignerRule::Recoverable, Linkage::Any)
            .and_then(|v| {
                if v.block >= exit_block {
                    return Err(VerificationError::InvalidChain(format!(
                        "{} is not before exit block {exit_block}",
                        v.block
                    )));
                }
                match v.signer {
                    Some(signer) if v.tx.is_deposit() && signer != depositor => {
                        Err(VerificationError::InvalidSignature(format!(
                            "deposit transfer signed by {signer}, expected {depositor}"
                        )))
                    }
                    _ => Ok(v),
                }
            })
            .map_err(ExitGameError::InvalidChallenge)?;
        if self.book.challenge(coin, &verified.hash).is_some() {
            return Err(ExitGameError::ChallengeAlreadyExists {
                coin,
                tx_hash: verified.hash,
            });
        }

        self.registry.post_bond(caller, bond)?;
        let opened = self.book.open_challenge(Challenge {
            coin_id: coin,
            challenged_tx_hash: verified.hash,
            challenger: caller,
            claimed_owner: verified.tx.recipient,
            block_number: verified.block,
            opened_at: self.clock.now(),
            sequence: 0,
            bond,
            status: ChallengeStatus::Open,
        });
        debug_assert!(opened, "duplicate challenge passed the pre-check");
        tracing::info!(
            coin = coin.as_u64(),
            challenger = %caller,
            tx_hash = %verified.hash,
            block = verified.block.as_u64(),
            "challenge opened"
        );
        Ok(verified.hash)
    }

    /// Answer a challenge with a spend of the challenged transfer.
    ///
    /// The responding transfer must be signed by the challenge's claimed
    /// owner and spend the challenged block. Anyone may submit it. Only
    /// the targeted challenge is removed; no balance changes.
    pub fn respond_challenge_before(
        &mut self,
        coin: CoinId,
        challenged_tx_hash: &H256,
        evidence: &TransferEvidence,
    ) -> Result<(), ExitGameError> {
        let challenge = self
            .book
            .challenge(coin, challenged_tx_hash)
            .ok_or(ExitGameError::NoSuchChallenge {
                coin,
                tx_hash: *challenged_tx_hash,
            })?;
        let record = self.registry.require_coin(coin)?;
        verify_transfer(
            &self.chain,
            record,
            evidence,
            SignerRule::Exactly(challenge.claimed_owner),
            Linkage::ChildOf(challenge.block_number),
        )
        .map_err(ExitGameError::InvalidResponse)?;

        self.book
            .resolve_challenge(coin, challenged_tx_hash, ChallengeStatus::ResolvedByResponse);
        tracing::info!(
            coin = coin.as_u64(),
            tx_hash = %challenged_tx_hash,
            block = evidence.block.as_u64(),
            "challenge answered"
        );
        Ok(())
    }

    /// Defeat an exit with a conflicting spend of its previous transfer,
    /// committed strictly between the previous and exiting blocks.
    pub fn challenge_between(
        &mut self,
        caller: Address,
        coin: CoinId,
        evidence: &TransferEvidence,
    ) -> Result<(), ExitGameError> {
        let exit = self.require_exit(coin)?.clone();
        let record = self.registry.require_coin(coin)?;
        let verified = verify_transfer(
            &self.chain,
            record,
            evidence,
            SignerRule::Exactly(exit.prev_owner),
            Linkage::ChildOf(exit.prev_block),
        )
        .and_then(|v| {
            if exit.prev_block < v.block && v.block < exit.exit_block {
                Ok(v)
            } else {
                Err(VerificationError::InvalidChain(format!(
                    "{} is not between {} and {}",
                    v.block, exit.prev_block, exit.exit_block
                )))
            }
        })
        .map_err(ExitGameError::InvalidChallenge)?;
        self.defeat_exit(caller, &exit, &verified, "challenge_between")
    }

    /// Defeat an exit with a later spend of its exiting transfer.
    pub fn challenge_after(
        &mut self,
        caller: Address,
        coin: CoinId,
        evidence: &TransferEvidence,
    ) -> Result<(), ExitGameError> {
        let exit = self.require_exit(coin)?.clone();
        let record = self.registry.require_coin(coin)?;
        let verified = verify_transfer(
            &self.chain,
            record,
            evidence,
            SignerRule::Exactly(exit.claimed_owner),
            Linkage::ChildOf(exit.exit_block),
        )
        .and_then(|v| {
            if v.block > exit.exit_block {
                Ok(v)
            } else {
                Err(VerificationError::InvalidChain(format!(
                    "{} is not after {}",
                    v.block, exit.exit_block
                )))
            }
        })
        .map_err(ExitGameError::InvalidChallenge)?;
        self.defeat_exit(caller, &exit, &verified, "challenge_after")
    }

    // ── Reads ──────────────────────────────────────────────────────────

    /// The live exit on `coin`.
    pub fn exit(&self, coin: CoinId) -> Option<&Exit> {
        self.book.exit(coin)
    }

    /// `PENDING`, the last terminal outcome, or `NONE`.
    pub fn exit_state(&self, coin: CoinId) -> ExitState {
        self.book.exit_state(coin)
    }

    /// An open challenge.
    pub fn challenge(&self, coin: CoinId, tx_hash: &H256) -> Option<&Challenge> {
        self.book.challenge(coin, tx_hash)
    }

    /// Open challenges on `coin`, oldest first.
    pub fn challenges(&self, coin: CoinId) -> Vec<&Challenge> {
        self.book.challenges_for(coin)
    }

    /// A coin record.
    pub fn coin(&self, coin: CoinId) -> Option<&Coin> {
        self.registry.coin(coin)
    }

    /// Bond balances of `address`.
    pub fn balance(&self, address: Address) -> Balance {
        self.registry.balance(address)
    }

    /// `(maturity_period_secs, challenge_window_secs, bond_amount)`.
    pub fn maturity_and_bond(&self) -> (u64, u64, Amount) {
        (
            self.config.maturity_period_secs,
            self.config.challenge_window_secs,
            self.config.bond_amount,
        )
    }

    /// Root stored for a child block.
    pub fn root(&self, number: BlockNumber) -> Option<H256> {
        self.chain.root(number)
    }

    /// Registry owner of a coin.
    pub fn owner_of(&self, coin: CoinId) -> Option<Address> {
        self.registry.owner_of(coin)
    }

    /// Coins the registry assigns to `owner`.
    pub fn owned_by(&self, owner: Address) -> Vec<CoinId> {
        self.registry.owned_by(owner)
    }

    /// Whether `deposit` and `start_exit` are disabled.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current parameters.
    pub fn config(&self) -> &ExitGameConfig {
        &self.config
    }

    /// Aggregate bond accounting.
    pub fn bond_totals(&self) -> BondTotals {
        self.registry.bond_totals()
    }

    /// Number of live exits.
    pub fn live_exits(&self) -> usize {
        self.book.live_exits()
    }

    /// The escrow collaborator.
    pub fn escrow(&self) -> &E {
        self.registry.escrow()
    }

    /// Current time according to the game's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn require_owner(&self, caller: Address, action: &'static str) -> Result<(), ExitGameError> {
        if caller != self.config.owner {
            return Err(StateError::Unauthorized { caller, action }.into());
        }
        Ok(())
    }

    fn require_unpaused(&self, action: &'static str) -> Result<(), ExitGameError> {
        if self.paused {
            return Err(ExitGameError::Paused { action });
        }
        Ok(())
    }

    fn require_bond(&self, provided: Amount) -> Result<(), ExitGameError> {
        if provided != self.config.bond_amount {
            return Err(ExitGameError::WrongBond {
                expected: self.config.bond_amount,
                provided,
            });
        }
        Ok(())
    }

    fn require_exit(&self, coin: CoinId) -> Result<&Exit, ExitGameError> {
        self.book.exit(coin).ok_or(ExitGameError::NoSuchExit { coin })
    }

    /// Refund entries for every open challenge on `coin` except `except`.
    fn dismissal_refunds(&self, coin: CoinId, except: Option<&H256>) -> Vec<Change> {
        self.book
            .challenges_for(coin)
            .into_iter()
            .filter(|c| Some(&c.challenged_tx_hash) != except)
            .map(|c| (c.challenger, Delta::Debit(c.bond), Delta::Credit(c.bond)))
            .collect()
    }

    /// Remove the exit and its remaining challenges, then apply `plan`.
    fn retire_exit(&mut self, coin: CoinId, outcome: ExitState, plan: BalancePlan) {
        self.book.close_exit(coin, outcome);
        for dismissed in self.book.drain_challenges(coin, ChallengeStatus::Dismissed) {
            tracing::info!(
                coin = coin.as_u64(),
                challenger = %dismissed.challenger,
                tx_hash = %dismissed.challenged_tx_hash,
                "challenge dismissed"
            );
        }
        self.registry.commit(plan);
    }

    /// Settle a successful between/after challenge.
    fn defeat_exit(
        &mut self,
        challenger: Address,
        exit: &Exit,
        evidence: &VerifiedTransfer,
        action: &'static str,
    ) -> Result<(), ExitGameError> {
        let coin = exit.coin_id;
        let mut changes = vec![
            (exit.claimed_owner, Delta::Debit(exit.bond), Delta::Zero),
            (challenger, Delta::Zero, Delta::Credit(exit.bond)),
        ];
        changes.extend(self.dismissal_refunds(coin, None));
        let plan = self.registry.plan(&changes)?;

        self.registry.set_state(coin, CoinState::Deposited)?;
        self.retire_exit(coin, ExitState::Canceled, plan);
        tracing::info!(
            coin = coin.as_u64(),
            %challenger,
            block = evidence.block.as_u64(),
            tx_hash = %evidence.hash,
            action,
            "exit defeated"
        );
        Ok(())
    }
}
