//! # Hashing Utilities
//!
//! SHA-256 based digests used for content addressing. Transaction and
//! operation hashes are `double_sha256` over the canonical encoding (see
//! [`crate::transaction::canonical`]) and are rendered as base58 text.
//!
//! The double hash closes the length-extension gap of plain SHA-256. It
//! costs one extra compression over 32 bytes, which is noise next to the
//! signature verification every admitted transaction pays anyway.

use sha2::{Digest, Sha256};

/// Length of every digest produced here.
pub const HASH_LENGTH: usize = 32;

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use tessera_protocol::crypto::hash::sha256;
///
/// let hash = sha256(b"tessera");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; HASH_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; HASH_LENGTH];
    output.copy_from_slice(&result);
    output
}

/// Compute `SHA-256(SHA-256(data))`.
pub fn double_sha256(data: &[u8]) -> [u8; HASH_LENGTH] {
    sha256(&sha256(data))
}

/// Base58 text form of a digest. This is the representation stored in
/// transaction headers and signed over.
pub fn to_base58(digest: &[u8]) -> String {
    bs58::encode(digest).into_string()
}
