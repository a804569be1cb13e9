//! # Cryptographic Primitives
//!
//! Thin, typed wrappers around audited implementations:
//!
//! - **Ed25519** (`ed25519-dalek`) for account keys and signatures.
//! - **SHA-256** (`sha2`) for content addressing.
//! - **base58** (`bs58`) for the text form of hashes and signatures.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{double_sha256, sha256, to_base58};
pub use keys::{KeyError, Keypair, PublicKey, Signature};
pub use signatures::{sign_for_network, verify_for_network};
