//! # Exit Lifecycle Scenarios
//!
//! Deposit, exit, finalize, redeem and cancel flows across the whole
//! stack, plus the administrative surface (pause, block submission).

mod common;

use common::*;
use pcx_core::{Amount, BlockNumber, CoinId, H256};
use pcx_exitgame::{ExitGameError, ExitOutcome, VerificationError};
use pcx_state::{Balance, CoinState, EscrowLedger, ExitState, StateError};

#[test]
fn deposit_exit_finalizes_and_redeems() {
    init_tracing();
    let p = Participant::new("p", 1);
    let mut h = Harness::new(&[&p]);
    let bond = h.bond();

    let (coin, deposit) = h.deposit(&p);
    assert_eq!(coin.id, CoinId(0));
    assert_eq!(coin.deposit_block, BlockNumber(1));

    h.game
        .start_exit(p.address(), &exit_request(None, &deposit, &p, bond))
        .unwrap();
    assert_eq!(h.game.exit_state(coin.id), ExitState::Pending);
    assert_eq!(h.game.coin(coin.id).unwrap().state, CoinState::Exiting);

    h.elapse_contest_period();
    let outcome = h.game.finalize_exit(coin.id).unwrap();
    assert_eq!(outcome, ExitOutcome::Finalized { owner: p.address() });

    assert_eq!(h.game.owner_of(coin.id), Some(p.address()));
    assert_eq!(h.game.owned_by(p.address()), vec![coin.id]);
    assert_eq!(
        h.game.balance(p.address()),
        Balance {
            bonded: Amount::ZERO,
            withdrawable: bond
        }
    );

    assert_eq!(h.game.withdraw_bonds(p.address()).unwrap(), bond);
    assert_eq!(h.game.withdraw_bonds(p.address()).unwrap(), Amount::ZERO);
    assert_eq!(h.game.redeem(p.address(), coin.id).unwrap(), DENOMINATION);
    assert!(matches!(
        h.game.redeem(p.address(), coin.id),
        Err(ExitGameError::State(StateError::AlreadyRedeemed { .. }))
    ));
    assert_eq!(h.game.escrow().held(), Amount::ZERO);
    assert_eq!(h.game.escrow().balance_of(p.address()), FUNDS);
}

#[test]
fn spend_exit_hands_coin_to_recipient() {
    let a = Participant::new("a", 1);
    let b = Participant::new("b", 2);
    let mut h = Harness::new(&[&a, &b]);
    let bond = h.bond();

    let (coin, deposit) = h.deposit(&a);
    let a_b = h.spend(&deposit, &b);
    h.game
        .start_exit(b.address(), &exit_request(Some(&deposit), &a_b, &a, bond))
        .unwrap();

    h.elapse_contest_period();
    h.game.finalize_exit(coin.id).unwrap();
    assert_eq!(h.game.owner_of(coin.id), Some(b.address()));
    assert!(h.game.owned_by(a.address()).is_empty());

    assert!(matches!(
        h.game.redeem(a.address(), coin.id),
        Err(ExitGameError::State(StateError::Unauthorized { .. }))
    ));
    assert_eq!(h.game.redeem(b.address(), coin.id).unwrap(), DENOMINATION);
}

#[test]
fn deposits_after_child_blocks_still_exit() {
    let a = Participant::new("a", 1);
    let b = Participant::new("b", 2);
    let c = Participant::new("c", 3);
    let d = Participant::new("d", 4);
    let mut h = Harness::new(&[&a, &b, &c, &d]);
    let bond = h.bond();

    let (first, deposit_a) = h.deposit(&a);
    let a_b = h.spend(&deposit_a, &b);
    let (second, deposit_c) = h.deposit(&c);
    assert_eq!(second.deposit_block, BlockNumber(2));
    assert!(second.deposit_block < a_b.block);

    let c_d = h.spend(&deposit_c, &d);
    h.game
        .start_exit(b.address(), &exit_request(Some(&deposit_a), &a_b, &a, bond))
        .unwrap();
    h.game
        .start_exit(d.address(), &exit_request(Some(&deposit_c), &c_d, &c, bond))
        .unwrap();

    h.elapse_contest_period();
    let outcomes = h.game.finalize_exits(&[first.id, second.id]);
    assert_eq!(outcomes[0].as_ref().unwrap(), &ExitOutcome::Finalized { owner: b.address() });
    assert_eq!(outcomes[1].as_ref().unwrap(), &ExitOutcome::Finalized { owner: d.address() });
}

#[test]
fn start_then_cancel_restores_coin_and_refunds_bond() {
    let a = Participant::new("a", 1);
    let mut h = Harness::new(&[&a]);
    let bond = h.bond();
    let (coin, deposit) = h.deposit(&a);
    let before = h.game.coin(coin.id).unwrap().clone();

    h.game
        .start_exit(a.address(), &exit_request(None, &deposit, &a, bond))
        .unwrap();
    h.game.cancel_exit(a.address(), coin.id).unwrap();

    assert_eq!(h.game.coin(coin.id), Some(&before));
    assert!(h.game.exit(coin.id).is_none());
    assert_eq!(h.game.exit_state(coin.id), ExitState::Canceled);
    assert_eq!(h.game.balance(a.address()).withdrawable, bond);
    assert_eq!(h.game.withdraw_bonds(a.address()).unwrap(), bond);
    assert_eq!(
        h.game.escrow().balance_of(a.address()),
        FUNDS.checked_sub(DENOMINATION).unwrap()
    );
}

#[test]
fn finalize_before_contest_period_is_not_mature() {
    let a = Participant::new("a", 1);
    let b = Participant::new("b", 2);
    let c = Participant::new("c", 3);
    let mut h = Harness::new(&[&a, &b, &c]);
    let bond = h.bond();
    let (coin, deposit) = h.deposit(&a);
    let a_b = h.spend(&deposit, &b);
    h.game
        .start_exit(b.address(), &exit_request(Some(&deposit), &a_b, &a, bond))
        .unwrap();

    let (maturity, window, _) = h.game.maturity_and_bond();
    h.clock.advance(maturity - 1).unwrap();
    assert!(matches!(
        h.game.finalize_exit(coin.id),
        Err(ExitGameError::NotMature { .. })
    ));

    // Still not mature with a challenge open.
    h.game
        .challenge_before(c.address(), coin.id, &deposit.evidence(&a), bond)
        .unwrap();
    h.clock.advance(window).unwrap();
    assert!(matches!(
        h.game.finalize_exit(coin.id),
        Err(ExitGameError::NotMature { .. })
    ));
    assert_eq!(h.game.exit_state(coin.id), ExitState::Pending);
}

#[test]
fn finalize_exits_isolates_failures() {
    let a = Participant::new("a", 1);
    let b = Participant::new("b", 2);
    let mut h = Harness::new(&[&a, &b]);
    let bond = h.bond();
    let (c0, d0) = h.deposit(&a);
    let (_c1, _d1) = h.deposit(&b);
    let (c2, d2) = h.deposit(&b);
    h.game
        .start_exit(a.address(), &exit_request(None, &d0, &a, bond))
        .unwrap();
    h.game
        .start_exit(b.address(), &exit_request(None, &d2, &b, bond))
        .unwrap();
    h.elapse_contest_period();

    let results = h.game.finalize_exits(&[c0.id, CoinId(1), c2.id, CoinId(99)]);
    assert_eq!(results.len(), 4);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(ExitGameError::NoSuchExit { .. })));
    assert!(results[2].is_ok());
    assert!(matches!(results[3], Err(ExitGameError::NoSuchExit { .. })));
    assert_eq!(h.game.owner_of(c2.id), Some(b.address()));
    assert_eq!(h.game.live_exits(), 0);
}

#[test]
fn exit_rejects_wrong_bond_duplicates_and_strangers() {
    let a = Participant::new("a", 1);
    let b = Participant::new("b", 2);
    let mut h = Harness::new(&[&a, &b]);
    let bond = h.bond();
    let (coin, deposit) = h.deposit(&a);

    let cheap = exit_request(None, &deposit, &a, Amount::new(1));
    assert!(matches!(
        h.game.start_exit(a.address(), &cheap),
        Err(ExitGameError::WrongBond { .. })
    ));

    let request = exit_request(None, &deposit, &a, bond);
    assert!(matches!(
        h.game.start_exit(b.address(), &request),
        Err(ExitGameError::State(StateError::Unauthorized { .. }))
    ));

    let wrong_block = exit_request(None, &deposit.at(BlockNumber(2)), &a, bond);
    assert!(matches!(
        h.game.start_exit(a.address(), &wrong_block),
        Err(ExitGameError::Verification(VerificationError::InvalidProof { .. }))
    ));

    h.game.start_exit(a.address(), &request).unwrap();
    assert!(matches!(
        h.game.start_exit(a.address(), &request),
        Err(ExitGameError::ExitAlreadyExists { coin: c }) if c == coin.id
    ));
    assert_eq!(h.game.balance(a.address()).bonded, bond);
    assert!(h.game.balance(b.address()) == Balance::default());
}

#[test]
fn exit_with_unlinked_or_misordered_history_is_rejected() {
    let a = Participant::new("a", 1);
    let b = Participant::new("b", 2);
    let o = Participant::new("o", 3);
    let mut h = Harness::new(&[&a, &b, &o]);
    let bond = h.bond();
    let (_coin, deposit) = h.deposit(&a);
    let a_b = h.spend(&deposit, &b);
    let b_o = h.spend(&a_b, &o);

    // Exiting transfer does not spend the cited previous block.
    let skip = exit_request(Some(&deposit), &b_o, &b, bond);
    assert!(matches!(
        h.game.start_exit(o.address(), &skip),
        Err(ExitGameError::Verification(VerificationError::InvalidChain(_)))
    ));

    // Signed by someone other than the previous recipient.
    let forged = exit_request(Some(&a_b), &b_o, &a, bond);
    assert!(matches!(
        h.game.start_exit(o.address(), &forged),
        Err(ExitGameError::Verification(VerificationError::InvalidSignature(_)))
    ));

    // Proof for a block that was never committed.
    let ghost = exit_request(Some(&a_b), &b_o.at(BlockNumber(9000)), &b, bond);
    assert!(matches!(
        h.game.start_exit(o.address(), &ghost),
        Err(ExitGameError::Verification(VerificationError::InvalidProof { .. }))
    ));

    h.game
        .start_exit(o.address(), &exit_request(Some(&a_b), &b_o, &b, bond))
        .unwrap();
    let exit = h.game.exit(b_o.tx.coin_id).unwrap();
    assert_eq!(exit.priority, a_b.block);
    assert!(exit.prev_block < exit.exit_block);
}

#[test]
fn pause_blocks_deposit_and_start_exit_only() {
    let a = Participant::new("a", 1);
    let c = Participant::new("c", 3);
    let mut h = Harness::new(&[&a, &c]);
    let bond = h.bond();
    let (c0, d0) = h.deposit(&a);
    let (c1, d1) = h.deposit(&a);
    let a_c = h.spend(&d0, &c);
    h.game
        .start_exit(c.address(), &exit_request(Some(&d0), &a_c, &a, bond))
        .unwrap();

    assert!(matches!(
        h.game.set_paused(a.address(), true),
        Err(ExitGameError::State(StateError::Unauthorized { .. }))
    ));
    h.game.set_paused(OWNER, true).unwrap();
    assert!(h.game.is_paused());

    assert!(matches!(
        h.game.deposit(a.address(), DENOMINATION),
        Err(ExitGameError::Paused { .. })
    ));
    assert!(matches!(
        h.game.start_exit(a.address(), &exit_request(None, &d1, &a, bond)),
        Err(ExitGameError::Paused { .. })
    ));

    // Mid-exit participants are never locked out.
    h.game
        .challenge_before(a.address(), c0.id, &d0.evidence(&a), bond)
        .unwrap();
    h.elapse_contest_period();
    assert!(h.game.finalize_exit(c0.id).is_ok());
    assert!(h.game.withdraw_bonds(a.address()).is_ok());

    h.game.set_paused(OWNER, false).unwrap();
    h.game
        .start_exit(a.address(), &exit_request(None, &d1, &a, bond))
        .unwrap();
    assert_eq!(h.game.exit_state(c1.id), ExitState::Pending);
}

#[test]
fn submit_block_is_operator_only_and_increasing() {
    let a = Participant::new("a", 1);
    let mut h = Harness::new(&[&a]);
    let root = H256([0x11; 32]);

    assert!(matches!(
        h.game.submit_block(a.address(), BlockNumber(1000), root),
        Err(ExitGameError::State(StateError::Unauthorized { .. }))
    ));
    h.game.submit_block(OPERATOR, BlockNumber(1000), root).unwrap();
    for stale in [1000, 999, 0] {
        assert!(matches!(
            h.game.submit_block(OPERATOR, BlockNumber(stale), root),
            Err(ExitGameError::State(StateError::StaleBlock { .. }))
        ));
    }
    h.game
        .submit_block(OPERATOR, BlockNumber(2000), H256::ZERO)
        .unwrap();
    assert_eq!(h.game.root(BlockNumber(1000)), Some(root));
    assert_eq!(h.game.root(BlockNumber(2000)), Some(H256::ZERO));
    assert_eq!(h.game.root(BlockNumber(3000)), None);
}

#[test]
fn owner_updates_apply_to_live_exits() {
    let a = Participant::new("a", 1);
    let mut h = Harness::new(&[&a]);
    let bond = h.bond();
    let (coin, deposit) = h.deposit(&a);
    h.game
        .start_exit(a.address(), &exit_request(None, &deposit, &a, bond))
        .unwrap();

    h.game
        .set_maturity_and_bond(OWNER, Amount::new(42), 60, 30)
        .unwrap();
    assert_eq!(h.game.maturity_and_bond(), (60, 30, Amount::new(42)));
    h.clock.advance(90).unwrap();
    assert!(h.game.finalize_exit(coin.id).is_ok());
    assert_eq!(h.game.balance(a.address()).withdrawable, bond);
}
