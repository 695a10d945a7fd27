//! # Transfer Subcommand
//!
//! Builds, hashes and signs transfers exactly as the exit game will
//! decode them. Transfers travel as hex of their canonical encoding.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use pcx_core::{Address, Amount, BlockNumber, CoinId, H256};
use pcx_crypto::{recover_signer, Transaction};

use crate::{decode_hex, encode_hex};

/// Arguments for `pcx tx`.
#[derive(Args, Debug)]
pub struct TransferArgs {
    #[command(subcommand)]
    pub command: TransferCommand,
}

/// Transfer subcommands.
#[derive(Subcommand, Debug)]
pub enum TransferCommand {
    /// Encode a transfer and print its bytes and hash.
    Encode {
        /// Coin being moved.
        #[arg(long)]
        coin: u64,
        /// Block of the previous transfer; 0 for a deposit.
        #[arg(long, default_value_t = 0)]
        prev_block: u64,
        /// Coin value in base units.
        #[arg(long)]
        denomination: Amount,
        /// New owner.
        #[arg(long)]
        recipient: String,
    },

    /// Sign an encoded transfer.
    Sign {
        /// Path to the secret key file.
        #[arg(long)]
        key: PathBuf,
        /// Hex of the encoded transfer.
        #[arg(long)]
        tx: String,
    },

    /// Recover the signer of an encoded transfer.
    Recover {
        /// Hex of the encoded transfer.
        #[arg(long)]
        tx: String,
        /// Hex of the 65-byte signature.
        #[arg(long)]
        signature: String,
    },
}

#[derive(Debug, Serialize)]
struct Encoded {
    tx: String,
    hash: H256,
    transfer: Transaction,
}

/// Execute the transfer subcommand.
pub fn run_transfer(args: &TransferArgs) -> Result<u8> {
    match &args.command {
        TransferCommand::Encode {
            coin,
            prev_block,
            denomination,
            recipient,
        } => {
            let recipient = Address::from_hex(recipient).context("invalid recipient")?;
            let tx = Transaction::spend(CoinId(*coin), BlockNumber(*prev_block), *denomination, recipient);
            println!("{}", serde_json::to_string_pretty(&encode(tx)?)?);
            Ok(0)
        }
        TransferCommand::Sign { key, tx } => {
            let key = crate::keys::load_key(key)?;
            let tx = decode_tx(tx)?;
            let hash = tx.hash().context("failed to hash transfer")?;
            println!("{}", key.sign(&hash).to_hex());
            Ok(0)
        }
        TransferCommand::Recover { tx, signature } => {
            let tx = decode_tx(tx)?;
            let hash = tx.hash().context("failed to hash transfer")?;
            match recover_signer(&hash, &decode_hex(signature)?) {
                Ok(address) => {
                    println!("{address}");
                    Ok(0)
                }
                Err(e) => {
                    println!("FAIL: {e}");
                    Ok(1)
                }
            }
        }
    }
}

fn encode(tx: Transaction) -> Result<Encoded> {
    let bytes = tx.encode().context("failed to encode transfer")?;
    let hash = tx.hash().context("failed to hash transfer")?;
    Ok(Encoded {
        tx: encode_hex(&bytes),
        hash,
        transfer: tx,
    })
}

fn decode_tx(hex: &str) -> Result<Transaction> {
    Transaction::decode(&decode_hex(hex)?).map_err(|e| anyhow::anyhow!("invalid transfer: {e}"))
}
