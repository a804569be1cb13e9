// Copyright (c) 2026 Tessera Contributors. MIT License.
// See LICENSE for details.

//! # Tessera Protocol Ledger Core
//!
//! The consensus-relevant heart of a Tessera node: what a transaction is, how
//! it is hashed and signed, which rules decide whether it may enter the
//! ledger, and how new supply is minted block by block.
//!
//! ## Architecture
//!
//! - **config**: Protocol constants and per-network parameters.
//! - **crypto**: Ed25519 keys, SHA-256 digests, network-scoped signatures.
//! - **identity**: Bech32 account addresses over raw public keys.
//! - **transaction**: Operations, transactions, canonical hashing, and the
//!   ordered admission checker pipeline.
//! - **issuance**: Height-driven recurring mints and the pool that folds
//!   them into one synthetic transaction per block.
//!
//! Transport, consensus voting, block assembly and account storage are the
//! node's business. This crate sees the ledger only through
//! [`transaction::SequenceOracle`].
//!
//! ## Ground Rules
//!
//! 1. Amount arithmetic never wraps or saturates; it fails.
//! 2. Admission checks run in a fixed order and the first failure wins.
//! 3. No global state. The issuance pool is an owned value.

pub mod config;
pub mod crypto;
pub mod identity;
pub mod issuance;
pub mod transaction;
