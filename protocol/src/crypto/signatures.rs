//! # Network-Scoped Signatures
//!
//! Every transaction signature covers `network_id ‖ message`. Prefixing the
//! network identifier means a transaction signed for testnet can never
//! verify on mainnet, even when the same keys exist on both.
//!
//! Verification is strict (`verify_strict`): small-order keys and
//! non-canonical signatures are rejected.

use super::keys::{Keypair, PublicKey, Signature};

/// Builds the signed message: the network id followed by the payload.
fn domain_separated(network_id: &[u8], message: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(network_id.len() + message.len());
    buf.extend_from_slice(network_id);
    buf.extend_from_slice(message);
    buf
}

/// Sign `message` for a specific network.
///
/// ```
/// use tessera_protocol::crypto::keys::Keypair;
/// use tessera_protocol::crypto::signatures::{sign_for_network, verify_for_network};
///
/// let kp = Keypair::generate();
/// let sig = sign_for_network(&kp, b"tessera-devnet", b"tx-hash");
/// assert!(verify_for_network(&kp.public_key(), b"tessera-devnet", b"tx-hash", &sig));
/// assert!(!verify_for_network(&kp.public_key(), b"tessera-mainnet", b"tx-hash", &sig));
/// ```
pub fn sign_for_network(keypair: &Keypair, network_id: &[u8], message: &[u8]) -> Signature {
    keypair.sign(&domain_separated(network_id, message))
}

/// Verify a signature produced by [`sign_for_network`].
pub fn verify_for_network(
    public_key: &PublicKey,
    network_id: &[u8],
    message: &[u8],
    signature: &Signature,
) -> bool {
    public_key.verify(&domain_separated(network_id, message), signature)
}
