//! Canonical binary encoding used for content addressing.
//!
//! JSON is not used for hashing because key order and number formatting are
//! not guaranteed across encoders. Instead each hashed type writes its fields
//! in schema order:
//!
//! - strings: `u32` little-endian byte length, then the UTF-8 bytes
//! - integers and amounts: `u64` little-endian
//! - sequences: `u32` little-endian element count, then each element
//!
//! Length prefixes make the encoding injective: `("ab", "c")` and
//! `("a", "bc")` produce different bytes.
//!
//! Encoding is infallible. The operation and transaction types cannot hold an
//! unset or mismatched body, so there is no malformed input to reject here.

use crate::crypto::hash::{double_sha256, to_base58, HASH_LENGTH};

use super::types::{Amount, OperationType};

/// A type with a single, schema-ordered byte encoding.
pub trait CanonicalEncode {
    /// Append the canonical encoding of `self` to `buf`.
    fn encode_canonical(&self, buf: &mut Vec<u8>);

    /// The canonical encoding as a fresh buffer.
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);
        self.encode_canonical(&mut buf);
        buf
    }

    /// `double_sha256` of the canonical encoding.
    fn canonical_hash(&self) -> [u8; HASH_LENGTH] {
        double_sha256(&self.canonical_bytes())
    }

    /// Base58 text form of [`CanonicalEncode::canonical_hash`].
    fn canonical_hash_string(&self) -> String {
        to_base58(&self.canonical_hash())
    }
}

pub(crate) fn put_str(buf: &mut Vec<u8>, value: &str) {
    buf.extend_from_slice(&(value.len() as u32).to_le_bytes());
    buf.extend_from_slice(value.as_bytes());
}

pub(crate) fn put_u64(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn put_len(buf: &mut Vec<u8>, len: usize) {
    buf.extend_from_slice(&(len as u32).to_le_bytes());
}

impl CanonicalEncode for str {
    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        put_str(buf, self);
    }
}

impl CanonicalEncode for String {
    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        put_str(buf, self);
    }
}

impl CanonicalEncode for u64 {
    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        put_u64(buf, *self);
    }
}

impl CanonicalEncode for Amount {
    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        put_u64(buf, self.to_raw());
    }
}

impl CanonicalEncode for OperationType {
    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        put_str(buf, self.as_str());
    }
}

impl<T: CanonicalEncode> CanonicalEncode for [T] {
    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        put_len(buf, self.len());
        for item in self {
            item.encode_canonical(buf);
        }
    }
}

impl<T: CanonicalEncode> CanonicalEncode for Vec<T> {
    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        self.as_slice().encode_canonical(buf);
    }
}
