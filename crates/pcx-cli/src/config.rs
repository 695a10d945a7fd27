//! # Config Subcommand
//!
//! Load and validate an exit game configuration file before deploying it.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use pcx_exitgame::ExitGameConfig;

/// Arguments for `pcx config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate a YAML configuration and print the effective values.
    Check {
        /// Path to the configuration file.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Execute the config subcommand.
pub fn run_config(args: &ConfigArgs) -> Result<u8> {
    match &args.command {
        ConfigCommand::Check { file } => match ExitGameConfig::load(file) {
            Ok(config) => {
                println!("OK: {}", file.display());
                println!("  owner:              {}", config.owner);
                println!("  operator:           {}", config.operator);
                println!("  bond_amount:        {}", config.bond_amount);
                println!("  maturity_period:    {}s", config.maturity_period_secs);
                println!("  challenge_window:   {}s", config.challenge_window_secs);
                Ok(0)
            }
            Err(e) => {
                println!("FAIL: {e}");
                Ok(1)
            }
        },
    }
}
