//! # Identity Module
//!
//! Every account on a Tessera network is an Ed25519 keypair. Its address is
//! the bech32 encoding of the public key under the network's prefix, so the
//! address alone is enough to verify that account's signatures.

pub mod address;

pub use address::{address_of, encode_address, is_valid_address, parse_address, AddressError};
