// Copyright (c) 2026 Tessera Contributors. MIT License.
// See LICENSE for details.

//! # Tessera Node Driver
//!
//! Entry point for the `tessera-node` binary. Parses CLI arguments,
//! initializes logging, resolves the network configuration, and runs one
//! subcommand:
//!
//! - `issue`  : simulate the issuance pool over a height range
//! - `check`  : run the admission checks on a transaction file
//! - `version`: print build version information

mod cli;
mod logging;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tessera_protocol::config::{NetworkConfig, PROTOCOL_VERSION};
use tessera_protocol::crypto::keys::Keypair;
use tessera_protocol::issuance::{Issuance, IssuanceContract, IssuancePool};
use tessera_protocol::transaction::{
    verify_transaction, Amount, InMemorySequenceOracle, Transaction,
};

use cli::{CheckArgs, Commands, GlobalArgs, IssueArgs, TesseraNodeCli};

fn main() -> Result<()> {
    let cli = TesseraNodeCli::parse();

    if let Commands::Version = cli.command {
        print_version();
        return Ok(());
    }

    logging::init_logging(&cli.global.log_level, cli.global.log_format)?;
    let network = resolve_network(&cli.global)?;
    tracing::info!(network = %network.name(), min_fee = %network.min_fee, "network selected");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Issue(args) => run_issue(&args, &network, &mut out),
        Commands::Check(args) => run_check(&args, &network, &mut out),
        Commands::Version => Ok(()),
    }
}

/// Builds the network configuration from the global flags.
fn resolve_network(args: &GlobalArgs) -> Result<NetworkConfig> {
    let mut network = NetworkConfig::by_name(&args.network)
        .ok_or_else(|| anyhow!("unknown network '{}'", args.network))?;
    if let Some(min_fee) = args.min_fee {
        network.min_fee = Amount::new(min_fee).context("invalid --min-fee")?;
    }
    Ok(network)
}

fn load_contract(path: &Path) -> Result<IssuanceContract> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("invalid contract in {}", path.display()))
}

/// Simulates the issuance pool over `args.from..=args.to`, writing each
/// synthetic transaction as one JSON line.
fn run_issue(args: &IssueArgs, network: &NetworkConfig, out: &mut impl Write) -> Result<()> {
    if args.from > args.to {
        bail!("--from {} is after --to {}", args.from, args.to);
    }

    let mut pool = IssuancePool::new(network).context("failed to create issuance pool")?;
    for path in &args.contracts {
        let contract = load_contract(path)?;
        let issuance = Issuance::from_contract(&contract, network)
            .with_context(|| format!("rejected contract {}", path.display()))?;
        if !pool.add(issuance) {
            tracing::warn!(id = %contract.id, "duplicate contract ignored");
        }
    }

    let proposer = Keypair::master(&args.proposer_seed);
    let mut emitted = 0usize;
    for height in args.from..=args.to {
        if let Some(tx) = pool.issue(height, &proposer)? {
            let line = serde_json::to_string(&tx)?;
            writeln!(out, "{}", line)?;
            emitted += 1;
        }
    }

    tracing::info!(
        from = args.from,
        to = args.to,
        emitted,
        remaining = pool.len(),
        "issuance simulation finished"
    );
    Ok(())
}

/// Decodes a transaction file and runs the admission pipeline, treating
/// `args.sequence_id` as the ledger's expectation for the source.
fn run_check(args: &CheckArgs, network: &NetworkConfig, out: &mut impl Write) -> Result<()> {
    let raw = fs::read(&args.tx).with_context(|| format!("failed to read {}", args.tx.display()))?;
    let tx = Transaction::from_json(&raw)
        .with_context(|| format!("failed to decode {}", args.tx.display()))?;

    let ledger = InMemorySequenceOracle::new();
    ledger.set(tx.source(), args.sequence_id);

    verify_transaction(&tx, network, &ledger)
        .with_context(|| format!("transaction {} rejected", tx.hash()))?;

    writeln!(out, "ok {}", tx.hash())?;
    Ok(())
}

/// Prints version information for the binary and protocol.
fn print_version() {
    println!("tessera-node {}", env!("CARGO_PKG_VERSION"));
    println!("protocol     {}", PROTOCOL_VERSION);
    println!("rustc        {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
