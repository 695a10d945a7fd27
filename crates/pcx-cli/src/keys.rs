//! # Key Subcommand
//!
//! secp256k1 key generation and address derivation. Secret keys are
//! stored as 32 bytes of hex, one key per file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use pcx_crypto::KeyPair;

/// Arguments for `pcx key`.
#[derive(Args, Debug)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

/// Key subcommands.
#[derive(Subcommand, Debug)]
pub enum KeyCommand {
    /// Generate a new secp256k1 key.
    Generate {
        /// Output directory for the key file.
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
        /// Key file name without extension.
        #[arg(long, default_value = "pcx")]
        prefix: String,
    },

    /// Print the address of a key.
    Address {
        /// Path to the secret key file.
        #[arg(long)]
        key: PathBuf,
    },
}

/// Execute the key subcommand.
pub fn run_key(args: &KeyArgs) -> Result<u8> {
    match &args.command {
        KeyCommand::Generate { output, prefix } => cmd_generate(output, prefix),
        KeyCommand::Address { key } => {
            let key = load_key(key)?;
            println!("{}", key.address());
            Ok(0)
        }
    }
}

/// Load a key written by `pcx key generate`.
pub fn load_key(path: &Path) -> Result<KeyPair> {
    let bytes = crate::read_hex_file(path).context("invalid secret key file")?;
    let Ok(secret) = <[u8; 32]>::try_from(bytes.as_slice()) else {
        bail!(
            "secret key must be 32 bytes (64 hex chars), got {} bytes",
            bytes.len()
        );
    };
    KeyPair::from_secret_bytes(&secret).map_err(|e| anyhow::anyhow!("invalid secret key: {e}"))
}

fn cmd_generate(output_dir: &Path, prefix: &str) -> Result<u8> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let key = KeyPair::generate();
    let path = output_dir.join(format!("{prefix}.key"));
    std::fs::write(&path, hex::encode(key.secret_bytes()))
        .with_context(|| format!("failed to write secret key: {}", path.display()))?;
    tracing::info!(path = %path.display(), address = %key.address(), "key generated");

    println!("OK: generated secp256k1 key");
    println!("  Secret key: {}", path.display());
    println!("  Address:    {}", key.address());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_then_load_gives_same_address() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cmd_generate(dir.path(), "alice").unwrap(), 0);

        let path = dir.path().join("alice.key");
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.len(), 64);

        let a = load_key(&path).unwrap();
        let b = load_key(&path).unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn short_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.key");
        std::fs::write(&path, "abcd").unwrap();
        assert!(load_key(&path).is_err());
    }
}
