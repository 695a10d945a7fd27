//! # Transfer Evidence Verification
//!
//! The single routine behind every entry point that accepts a transfer as
//! evidence. In order:
//!
//! 1. Decode the transfer bytes.
//! 2. Require the transfer to be for the coin in question.
//! 3. Recompute the transfer hash.
//! 4. Prove inclusion at the claimed block: a deposit transfer must sit at
//!    the coin's deposit block and pay the depositor; any other transfer
//!    must verify against the stored root of that block.
//! 5. Check linkage: the transfer's `prev_block` must equal the reference
//!    block when one is required.
//! 6. Recover the signer, if the signature is consulted, and compare it
//!    with the required signer.
//!
//! The caller-supplied owner is never trusted; only the recovered signer.

use pcx_core::{Address, BlockNumber, H256};
use pcx_crypto::{recover_signer, verify_inclusion, MerkleProof, Transaction};
use pcx_state::{ChildChain, Coin};

use crate::error::VerificationError;

/// A transfer offered as evidence, as submitted by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferEvidence {
    /// The block the transfer is claimed to be committed in.
    pub block: BlockNumber,
    /// Encoded transfer.
    pub tx: Vec<u8>,
    /// Encoded sparse-Merkle proof; empty for deposit transfers.
    pub proof: Vec<u8>,
    /// 65-byte signature over the transfer hash. May be empty where the
    /// signature is not consulted.
    pub signature: Vec<u8>,
}

impl TransferEvidence {
    /// Bundle the parts of one piece of evidence.
    pub fn new(block: BlockNumber, tx: Vec<u8>, proof: Vec<u8>, signature: Vec<u8>) -> Self {
        Self {
            block,
            tx,
            proof,
            signature,
        }
    }
}

/// The block a transfer must spend from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// No linkage requirement.
    Any,
    /// `tx.prev_block` must equal this block. `ChildOf(BlockNumber::DEPOSIT)`
    /// requires a deposit transfer.
    ChildOf(BlockNumber),
}

/// What must be true of the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerRule {
    /// The signature is not consulted.
    Unchecked,
    /// The signature must recover to some address.
    Recoverable,
    /// The signature must recover to exactly this address.
    Exactly(Address),
}

/// A transfer that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedTransfer {
    /// The decoded transfer.
    pub tx: Transaction,
    /// Its hash.
    pub hash: H256,
    /// The block it is committed in.
    pub block: BlockNumber,
    /// The recovered signer, when the signature was consulted.
    pub signer: Option<Address>,
}

/// Verify one piece of transfer evidence for `coin`.
///
/// See the module docs for the order of checks.
pub fn verify_transfer(
    chain: &ChildChain,
    coin: &Coin,
    evidence: &TransferEvidence,
    signer_rule: SignerRule,
    linkage: Linkage,
) -> Result<VerifiedTransfer, VerificationError> {
    let block = evidence.block;
    let tx = Transaction::decode(&evidence.tx)
        .map_err(|e| VerificationError::Decode(e.to_string()))?;

    let invalid_proof = |reason: String| VerificationError::InvalidProof {
        coin: coin.id,
        block,
        reason,
    };

    if tx.coin_id != coin.id {
        return Err(invalid_proof(format!("transfer is for {}", tx.coin_id)));
    }
    let hash = tx
        .hash()
        .map_err(|e| VerificationError::Decode(e.to_string()))?;

    if tx.is_deposit() {
        if block != coin.deposit_block {
            return Err(invalid_proof(format!(
                "deposit transfer belongs to {}",
                coin.deposit_block
            )));
        }
        if tx.recipient != coin.depositor {
            return Err(invalid_proof("deposit transfer must pay the depositor".into()));
        }
    } else {
        let root = chain
            .root(block)
            .ok_or_else(|| invalid_proof("no root stored for block".into()))?;
        let proof = MerkleProof::decode(&evidence.proof).map_err(|e| invalid_proof(e.to_string()))?;
        if !verify_inclusion(&root, coin.id, &hash, &proof) {
            return Err(invalid_proof("root mismatch".into()));
        }
    }

    if let Linkage::ChildOf(reference) = linkage {
        if tx.prev_block != reference {
            return Err(VerificationError::InvalidChain(format!(
                "transfer spends {}, expected {}",
                tx.prev_block, reference
            )));
        }
    }

    let signer = match signer_rule {
        SignerRule::Unchecked => None,
        SignerRule::Recoverable | SignerRule::Exactly(_) => {
            let recovered = recover_signer(&hash, &evidence.signature)
                .map_err(|e| VerificationError::InvalidSignature(e.to_string()))?;
            if let SignerRule::Exactly(expected) = signer_rule {
                if recovered != expected {
                    return Err(VerificationError::InvalidSignature(format!(
                        "signed by {recovered}, expected {expected}"
                    )));
                }
            }
            Some(recovered)
        }
    };

    tracing::debug!(
        coin = coin.id.as_u64(),
        block = block.as_u64(),
        hash = %hash,
        "transfer evidence verified"
    );
    Ok(VerifiedTransfer {
        tx,
        hash,
        block,
        signer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcx_core::{Amount, CoinId, Timestamp};
    use pcx_crypto::{KeyPair, SparseMerkleTree};
    use pcx_state::CoinState;

    const OPERATOR: Address = Address([0x0A; 20]);

    fn ts() -> Timestamp {
        Timestamp::from_epoch_secs(1_700_000_000).unwrap()
    }

    fn key(b: u8) -> KeyPair {
        KeyPair::from_secret_bytes(&[b; 32]).unwrap()
    }

    struct Fixture {
        chain: ChildChain,
        coin: Coin,
        alice: KeyPair,
        bob: KeyPair,
        tx: Transaction,
        proof: Vec<u8>,
    }

    /// Alice deposits coin 0 (deposit block 1) and pays Bob in block 1000.
    fn setup() -> Fixture {
        let alice = key(1);
        let bob = key(2);
        let coin = Coin {
            id: CoinId(0),
            denomination: Amount::new(5000),
            depositor: alice.address(),
            deposit_block: BlockNumber(1),
            state: CoinState::Deposited,
            redeemed: false,
            created_at: ts(),
        };
        let tx = Transaction::spend(coin.id, BlockNumber(1), coin.denomination, bob.address());
        let tree = SparseMerkleTree::new([
            (coin.id, tx.hash().unwrap()),
            (CoinId(9), H256([7; 32])),
        ]);
        let mut chain = ChildChain::new(OPERATOR);
        chain
            .submit_block(OPERATOR, BlockNumber(1000), tree.root(), ts())
            .unwrap();
        let proof = tree.prove(coin.id).encode();
        Fixture {
            chain,
            coin,
            alice,
            bob,
            tx,
            proof,
        }
    }

    fn evidence(block: u64, tx: &Transaction, proof: &[u8], signer: Option<&KeyPair>) -> TransferEvidence {
        let signature = signer
            .map(|k| k.sign(&tx.hash().unwrap()).0.to_vec())
            .unwrap_or_default();
        TransferEvidence::new(BlockNumber(block), tx.encode().unwrap(), proof.to_vec(), signature)
    }

    #[test]
    fn test_valid_spend_passes_all_checks() {
        let f = setup();
        let v = verify_transfer(
            &f.chain,
            &f.coin,
            &evidence(1000, &f.tx, &f.proof, Some(&f.alice)),
            SignerRule::Exactly(f.alice.address()),
            Linkage::ChildOf(BlockNumber(1)),
        )
        .unwrap();
        assert_eq!(v.signer, Some(f.alice.address()));
        assert_eq!(v.hash, f.tx.hash().unwrap());
        assert_eq!(v.block, BlockNumber(1000));
    }

    #[test]
    fn test_wrong_coin_is_invalid_proof() {
        let mut f = setup();
        f.coin.id = CoinId(1);
        let err = verify_transfer(
            &f.chain,
            &f.coin,
            &evidence(1000, &f.tx, &f.proof, None),
            SignerRule::Unchecked,
            Linkage::Any,
        )
        .unwrap_err();
        assert!(matches!(err, VerificationError::InvalidProof { .. }));
    }

    #[test]
    fn test_unknown_block_and_bad_proof_bytes() {
        let f = setup();
        for ev in [
            evidence(2000, &f.tx, &f.proof, None),
            evidence(1000, &f.tx, &[1, 2, 3], None),
            evidence(1000, &f.tx, &[0u8; 8], None),
        ] {
            let err = verify_transfer(&f.chain, &f.coin, &ev, SignerRule::Unchecked, Linkage::Any)
                .unwrap_err();
            assert!(matches!(err, VerificationError::InvalidProof { .. }));
        }
    }

    #[test]
    fn test_wrong_signer_rejected() {
        let f = setup();
        let err = verify_transfer(
            &f.chain,
            &f.coin,
            &evidence(1000, &f.tx, &f.proof, Some(&f.bob)),
            SignerRule::Exactly(f.alice.address()),
            Linkage::Any,
        )
        .unwrap_err();
        assert!(matches!(err, VerificationError::InvalidSignature(_)));
    }

    #[test]
    fn test_missing_signature_rejected_when_consulted() {
        let f = setup();
        let err = verify_transfer(
            &f.chain,
            &f.coin,
            &evidence(1000, &f.tx, &f.proof, None),
            SignerRule::Recoverable,
            Linkage::Any,
        )
        .unwrap_err();
        assert!(matches!(err, VerificationError::InvalidSignature(_)));
    }

    #[test]
    fn test_linkage_mismatch_is_invalid_chain() {
        let f = setup();
        let err = verify_transfer(
            &f.chain,
            &f.coin,
            &evidence(1000, &f.tx, &f.proof, None),
            SignerRule::Unchecked,
            Linkage::ChildOf(BlockNumber(2000)),
        )
        .unwrap_err();
        assert!(matches!(err, VerificationError::InvalidChain(_)));
    }

    #[test]
    fn test_deposit_transfer_checked_against_coin() {
        let f = setup();
        let deposit = Transaction::deposit(f.coin.id, f.coin.denomination, f.alice.address());

        let ok = verify_transfer(
            &f.chain,
            &f.coin,
            &evidence(1, &deposit, &[], Some(&f.alice)),
            SignerRule::Exactly(f.alice.address()),
            Linkage::ChildOf(BlockNumber::DEPOSIT),
        );
        assert!(ok.is_ok());

        let wrong_block = verify_transfer(
            &f.chain,
            &f.coin,
            &evidence(2, &deposit, &[], None),
            SignerRule::Unchecked,
            Linkage::Any,
        );
        assert!(matches!(wrong_block, Err(VerificationError::InvalidProof { .. })));

        let to_bob = Transaction::deposit(f.coin.id, f.coin.denomination, f.bob.address());
        let wrong_recipient = verify_transfer(
            &f.chain,
            &f.coin,
            &evidence(1, &to_bob, &[], None),
            SignerRule::Unchecked,
            Linkage::Any,
        );
        assert!(matches!(wrong_recipient, Err(VerificationError::InvalidProof { .. })));
    }

    #[test]
    fn test_garbage_bytes_are_decode_errors() {
        let f = setup();
        let ev = TransferEvidence::new(BlockNumber(1000), b"not a transfer".to_vec(), Vec::new(), Vec::new());
        let err = verify_transfer(&f.chain, &f.coin, &ev, SignerRule::Unchecked, Linkage::Any)
            .unwrap_err();
        assert!(matches!(err, VerificationError::Decode(_)));
    }
}
