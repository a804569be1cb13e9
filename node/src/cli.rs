//! # CLI Interface
//!
//! Defines the command-line argument structure for `tessera-node` using
//! `clap` derive. Supports three subcommands: `issue`, `check`, and
//! `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Tessera ledger core driver.
///
/// Runs the transaction admission pipeline and the issuance schedule
/// outside a full node, for devnets, fixtures and debugging.
#[derive(Parser, Debug)]
#[command(
    name = "tessera-node",
    about = "Tessera ledger core driver",
    version,
    propagate_version = true
)]
pub struct TesseraNodeCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Network to operate on: mainnet, testnet, or devnet.
    #[arg(long, global = true, env = "TESSERA_NETWORK", default_value = "devnet")]
    pub network: String,

    /// Override the network's minimum fee (smallest units).
    #[arg(long, global = true, env = "TESSERA_MIN_FEE")]
    pub min_fee: Option<u64>,

    /// Default log filter when `RUST_LOG` is not set.
    #[arg(long, global = true, env = "TESSERA_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, global = true, env = "TESSERA_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Top-level subcommands for the `tessera-node` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate the issuance pool over a range of heights and print each
    /// synthetic transaction as a JSON line.
    Issue(IssueArgs),
    /// Decode a transaction JSON file and run the admission checks.
    Check(CheckArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `issue` subcommand.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// First height to simulate.
    #[arg(long, default_value_t = 0)]
    pub from: u64,

    /// Last height to simulate (inclusive).
    #[arg(long, default_value_t = 10)]
    pub to: u64,

    /// Issuance contract JSON files to register before the first height.
    #[arg(long = "contract", value_name = "PATH")]
    pub contracts: Vec<PathBuf>,

    /// Passphrase the proposer keypair is derived from.
    #[arg(long, env = "TESSERA_PROPOSER_SEED", default_value = "tessera-devnet-proposer")]
    pub proposer_seed: String,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the transaction JSON.
    #[arg(value_name = "PATH")]
    pub tx: PathBuf,

    /// Sequence id the ledger expects from the transaction's source.
    #[arg(long)]
    pub sequence_id: u64,
}
