//! Scenario harness shared by the integration tests.
//!
//! Participants have deterministic secp256k1 keys. The operator commits
//! each block with a few decoy leaves so proofs are never trivial. Child
//! blocks are numbered 1000, 2000, ... and deposit blocks count up from 1,
//! so the two never collide in a scenario.

#![allow(dead_code)]

use pcx_core::{sha256, Address, Amount, BlockNumber, CoinId, ManualClock, Timestamp};
use pcx_crypto::{KeyPair, SparseMerkleTree, Transaction};
use pcx_exitgame::{ExitGame, ExitGameConfig, StartExitRequest, TransferEvidence};
use pcx_state::{Coin, InMemoryEscrow, InMemoryOwnership};

pub type Game = ExitGame<InMemoryEscrow, InMemoryOwnership, ManualClock>;

pub const OWNER: Address = Address([0x0E; 20]);
pub const OPERATOR: Address = Address([0x0A; 20]);

/// Starting value account of every participant: 100 ether.
pub const FUNDS: Amount = Amount::new(100_000_000_000_000_000_000);

pub const DENOMINATION: Amount = Amount::new(5000);

/// A named key holder.
pub struct Participant {
    pub name: &'static str,
    pub key: KeyPair,
}

impl Participant {
    pub fn new(name: &'static str, seed: u8) -> Self {
        let key = KeyPair::from_secret_bytes(&[seed; 32]).unwrap();
        Self { name, key }
    }

    pub fn address(&self) -> Address {
        self.key.address()
    }

    pub fn sign(&self, tx: &Transaction) -> Vec<u8> {
        self.key.sign(&tx.hash().unwrap()).0.to_vec()
    }
}

/// A transfer together with where it is committed.
#[derive(Debug, Clone)]
pub struct Committed {
    pub block: BlockNumber,
    pub tx: Transaction,
    pub proof: Vec<u8>,
}

impl Committed {
    /// Evidence for this transfer, signed by `signer`.
    pub fn evidence(&self, signer: &Participant) -> TransferEvidence {
        TransferEvidence::new(
            self.block,
            self.tx.encode().unwrap(),
            self.proof.clone(),
            signer.sign(&self.tx),
        )
    }

    /// The same transfer claimed at another block.
    pub fn at(&self, block: BlockNumber) -> Self {
        Self {
            block,
            ..self.clone()
        }
    }
}

pub struct Harness {
    pub game: Game,
    pub clock: ManualClock,
    next_block: u64,
}

impl Harness {
    /// A game with the default bond and periods, every participant funded.
    pub fn new(participants: &[&Participant]) -> Self {
        let mut escrow = InMemoryEscrow::new();
        for p in participants {
            escrow.fund(p.address(), FUNDS).unwrap();
        }
        let clock = ManualClock::new(Timestamp::from_epoch_secs(1_700_000_000).unwrap());
        let game = ExitGame::new(
            ExitGameConfig::new(OWNER, OPERATOR),
            escrow,
            InMemoryOwnership::new(),
            clock.clone(),
        )
        .unwrap();
        Self {
            game,
            clock,
            next_block: 1000,
        }
    }

    pub fn bond(&self) -> Amount {
        self.game.config().bond_amount
    }

    pub fn deposit(&mut self, who: &Participant) -> (Coin, Committed) {
        let coin = self.game.deposit(who.address(), DENOMINATION).unwrap();
        let tx = Transaction::deposit(coin.id, coin.denomination, coin.depositor);
        let committed = Committed {
            block: coin.deposit_block,
            tx,
            proof: Vec::new(),
        };
        (coin, committed)
    }

    /// Commit transfers (at most one per coin) in the next child block.
    pub fn commit_all(&mut self, txs: &[Transaction]) -> Vec<Committed> {
        let block = BlockNumber(self.next_block);
        self.next_block += 1000;

        let mut leaves: Vec<(CoinId, _)> = txs.iter().map(|tx| (tx.coin_id, tx.hash().unwrap())).collect();
        for decoy in 0..3u64 {
            let key = CoinId(u64::MAX - decoy * 7919);
            let value = sha256(&[block.as_u64().to_be_bytes(), decoy.to_be_bytes()].concat());
            leaves.push((key, value));
        }
        let tree = SparseMerkleTree::new(leaves);
        self.game.submit_block(OPERATOR, block, tree.root()).unwrap();

        txs.iter()
            .map(|tx| Committed {
                block,
                tx: tx.clone(),
                proof: tree.prove(tx.coin_id).encode(),
            })
            .collect()
    }

    /// Commit a single transfer in the next child block.
    pub fn commit(&mut self, tx: Transaction) -> Committed {
        self.commit_all(&[tx]).remove(0)
    }

    /// Commit a spend of `prev` to `to`.
    pub fn spend(&mut self, prev: &Committed, to: &Participant) -> Committed {
        let tx = Transaction::spend(prev.tx.coin_id, prev.block, prev.tx.denomination, to.address());
        self.commit(tx)
    }

    /// Advance the clock past the contest period of an exit opened now.
    pub fn elapse_contest_period(&self) {
        let secs = self.game.config().contest_period_secs().unwrap();
        self.clock.advance(secs).unwrap();
    }
}

/// Exit request for `exiting`, spending `prev` (or the deposit when
/// `prev` is `None`), signed by `signer`.
pub fn exit_request(
    prev: Option<&Committed>,
    exiting: &Committed,
    signer: &Participant,
    bond: Amount,
) -> StartExitRequest {
    let mut request = StartExitRequest {
        coin_id: exiting.tx.coin_id,
        exiting_tx: exiting.tx.encode().unwrap(),
        exiting_proof: exiting.proof.clone(),
        signature: signer.sign(&exiting.tx),
        exit_block: exiting.block,
        bond,
        ..Default::default()
    };
    if let Some(prev) = prev {
        request.prev_tx = prev.tx.encode().unwrap();
        request.prev_proof = prev.proof.clone();
        request.prev_block = prev.block;
    }
    request
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
