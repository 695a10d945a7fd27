//! # pcx CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pcx_cli::config::{run_config, ConfigArgs};
use pcx_cli::keys::{run_key, KeyArgs};
use pcx_cli::transfer::{run_transfer, TransferArgs};
use pcx_cli::tree::{run_tree, TreeArgs};

/// Exit game tooling: keys, transfers, block trees, configuration.
#[derive(Parser, Debug)]
#[command(name = "pcx", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "PCX_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// secp256k1 key generation and addresses.
    Key(KeyArgs),

    /// Transfer encoding, signing and signer recovery.
    Tx(TransferArgs),

    /// Block tree roots and inclusion proofs.
    Tree(TreeArgs),

    /// Exit game configuration checks.
    Config(ConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Key(args) => run_key(&args),
        Commands::Tx(args) => run_transfer(&args),
        Commands::Tree(args) => run_tree(&args),
        Commands::Config(args) => run_config(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
