//! # Protocol Configuration & Constants
//!
//! Every consensus-relevant constant lives here: the supply ceiling, the base
//! fee, network identifiers, address prefixes and the genesis issuance
//! schedule. Changing any of them after launch forks the network.
//!
//! [`NetworkConfig`] bundles the per-network values the checker pipeline
//! needs at admission time.

use serde::{Deserialize, Serialize};

use crate::transaction::types::Amount;

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Mainnet identifier. Mixed into every signature so a transaction signed for
/// one network can never verify on another.
pub const NETWORK_ID_MAINNET: &[u8] = b"tessera-mainnet";

/// Testnet identifier.
pub const NETWORK_ID_TESTNET: &[u8] = b"tessera-testnet";

/// Devnet identifier. Reset at will.
pub const NETWORK_ID_DEVNET: &[u8] = b"tessera-devnet";

/// Bech32 human-readable prefixes for account addresses.
pub const MAINNET_HRP: &str = "tsr";
pub const TESTNET_HRP: &str = "ttsr";
pub const DEVNET_HRP: &str = "dtsr";

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Version string stamped into every transaction header.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Monetary Parameters
// ---------------------------------------------------------------------------

/// Total supply ceiling in the smallest unit. No [`Amount`] may exceed it.
pub const MAX_AMOUNT_RAW: u64 = 1_000_000_000_000_000_000;

/// Default fee per transaction, also the default network minimum.
pub const BASE_FEE_RAW: u64 = 10_000;

// ---------------------------------------------------------------------------
// Genesis Issuance
// ---------------------------------------------------------------------------

/// Identifier of the common-budget issuance registered at pool creation.
/// The budget address is derived from a master keypair over this string.
pub const COMMON_BUDGET_ISSUANCE_ID: &str = "inflation-common-budget";

/// First height at which the common budget mints.
pub const COMMON_BUDGET_START_HEIGHT: u64 = 0;

/// Last height (inclusive) of the common budget. Effectively unbounded.
pub const COMMON_BUDGET_END_HEIGHT: u64 = 10_000_000_000_000_000;

/// Heights between two common-budget mints.
pub const COMMON_BUDGET_INTERVAL: u64 = 1;

/// Amount minted to the common budget per firing height.
pub const COMMON_BUDGET_UNIT_RAW: u64 = 50;

// ---------------------------------------------------------------------------
// NetworkConfig
// ---------------------------------------------------------------------------

/// Per-network parameters consulted by address validation, signing and the
/// fee-floor check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Domain-separation bytes mixed into every signature.
    pub network_id: Vec<u8>,
    /// Bech32 prefix every account address on this network must carry.
    pub address_hrp: String,
    /// Minimum fee a user transaction must pay. There is no ceiling.
    pub min_fee: Amount,
}

impl NetworkConfig {
    /// Builds a configuration for an arbitrary network.
    pub fn new(network_id: &[u8], address_hrp: &str, min_fee: Amount) -> Self {
        Self {
            network_id: network_id.to_vec(),
            address_hrp: address_hrp.to_string(),
            min_fee,
        }
    }

    pub fn mainnet() -> Self {
        Self::new(NETWORK_ID_MAINNET, MAINNET_HRP, Amount::base_fee())
    }

    pub fn testnet() -> Self {
        Self::new(NETWORK_ID_TESTNET, TESTNET_HRP, Amount::base_fee())
    }

    pub fn devnet() -> Self {
        Self::new(NETWORK_ID_DEVNET, DEVNET_HRP, Amount::base_fee())
    }

    /// Resolves a network by name. Unknown names return `None`; we don't guess.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "mainnet" => Some(Self::mainnet()),
            "testnet" => Some(Self::testnet()),
            "devnet" => Some(Self::devnet()),
            _ => None,
        }
    }

    /// Friendly network name for logging.
    pub fn name(&self) -> String {
        network_name(&self.network_id)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::devnet()
    }
}

/// Returns a friendly name for a network id. Unknown networks get a hex dump.
pub fn network_name(network_id: &[u8]) -> String {
    match network_id {
        NETWORK_ID_MAINNET => "mainnet".to_string(),
        NETWORK_ID_TESTNET => "testnet".to_string(),
        NETWORK_ID_DEVNET => "devnet".to_string(),
        other => format!("unknown(0x{})", hex::encode(other)),
    }
}
