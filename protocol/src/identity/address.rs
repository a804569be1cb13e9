//! # Account Addresses
//!
//! An account address is the bech32 encoding of the account's raw Ed25519
//! public key under the network's human-readable prefix:
//!
//! ```text
//! public_key (32 bytes)
//!     -> Bech32(network.address_hrp, public_key) -> dtsr1qw508d6qe...
//! ```
//!
//! Because the key itself is encoded (not a hash of it), the signature check
//! recovers the verifying key straight from a transaction's source address.
//! The bech32 checksum catches up to four mistyped characters.

use bech32::{Bech32, Hrp};
use thiserror::Error;

use crate::config::NetworkConfig;
use crate::crypto::keys::{Keypair, PublicKey};

/// Length of the payload carried by every address.
const ADDRESS_PAYLOAD_LENGTH: usize = 32;

/// Errors that can occur while encoding or parsing an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The string is not valid bech32 (bad charset, checksum, mixed case...).
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    /// The address belongs to a different network.
    #[error("invalid HRP: expected '{expected}', got '{got}'")]
    InvalidHrp { expected: String, got: String },

    /// The configured prefix is not a legal bech32 HRP.
    #[error("invalid address prefix '{0}'")]
    InvalidPrefix(String),

    /// The payload is not 32 bytes long.
    #[error("invalid address data length: expected {expected} bytes, got {got}")]
    InvalidDataLength { expected: usize, got: usize },

    /// The payload is not a valid Ed25519 point.
    #[error("address payload is not a valid public key")]
    InvalidPublicKey,
}

fn parse_hrp(prefix: &str) -> Result<Hrp, AddressError> {
    Hrp::parse(prefix).map_err(|_| AddressError::InvalidPrefix(prefix.to_string()))
}

/// Encode a public key as an address on `network`.
pub fn encode_address(network: &NetworkConfig, public_key: &PublicKey) -> Result<String, AddressError> {
    let hrp = parse_hrp(&network.address_hrp)?;
    bech32::encode::<Bech32>(hrp, public_key.as_bytes())
        .map_err(|e| AddressError::Bech32Decode(e.to_string()))
}

/// Address of a keypair's public half on `network`.
pub fn address_of(network: &NetworkConfig, keypair: &Keypair) -> Result<String, AddressError> {
    encode_address(network, &keypair.public_key())
}

/// Parse and validate an address for `network`, returning the account's
/// public key.
///
/// Checks, in order: bech32 syntax and checksum, network prefix, payload
/// length, and that the payload is a valid Ed25519 point.
pub fn parse_address(network: &NetworkConfig, address: &str) -> Result<PublicKey, AddressError> {
    let (hrp, data) =
        bech32::decode(address).map_err(|e| AddressError::Bech32Decode(e.to_string()))?;

    let expected_hrp = parse_hrp(&network.address_hrp)?;
    if hrp != expected_hrp {
        return Err(AddressError::InvalidHrp {
            expected: network.address_hrp.clone(),
            got: hrp.to_string(),
        });
    }

    if data.len() != ADDRESS_PAYLOAD_LENGTH {
        return Err(AddressError::InvalidDataLength {
            expected: ADDRESS_PAYLOAD_LENGTH,
            got: data.len(),
        });
    }

    PublicKey::try_from_slice(&data).map_err(|_| AddressError::InvalidPublicKey)
}

/// Returns `true` if `address` is a structurally valid account on `network`.
pub fn is_valid_address(network: &NetworkConfig, address: &str) -> bool {
    parse_address(network, address).is_ok()
}
