//! Transaction signing with Ed25519 keypairs.
//!
//! Signing is a separate step from building because the keypair may not be
//! available at construction time (hardware wallet, remote signer). The
//! signed message is `network_id ‖ base58(body hash)`, so a signature made
//! for one network never verifies on another.

use super::builder::Transaction;
use crate::crypto::keys::Keypair;
use crate::crypto::signatures::sign_for_network;

/// Signs a transaction in place.
///
/// 1. Recompute the body hash and store it in the header.
/// 2. Sign `network_id ‖ hash` with `keypair`.
/// 3. Store the base58 signature in the header.
///
/// Only header fields change. The caller is responsible for `keypair`
/// matching the transaction's source address; a mismatch is caught by the
/// signature check at admission.
///
/// ```
/// use tessera_protocol::config::NetworkConfig;
/// use tessera_protocol::crypto::keys::Keypair;
/// use tessera_protocol::transaction::{sign_transaction, Amount, Operation, OperationBody, Transaction};
///
/// let keypair = Keypair::generate();
/// let op = Operation::from_body(OperationBody::payment("dtsr1target", Amount::from_raw(1)));
/// let mut tx = Transaction::new("dtsr1source", 0, vec![op]).unwrap();
///
/// sign_transaction(&mut tx, &keypair, &NetworkConfig::devnet().network_id);
/// assert!(tx.is_signed());
/// ```
pub fn sign_transaction<'a>(
    tx: &'a mut Transaction,
    keypair: &Keypair,
    network_id: &[u8],
) -> &'a Transaction {
    tx.header.hash = tx.body.make_hash_string();
    let signature = sign_for_network(keypair, network_id, tx.header.hash.as_bytes());
    tx.header.signature = signature.to_base58();
    tx
}

impl Transaction {
    /// Method form of [`sign_transaction`].
    pub fn sign(&mut self, keypair: &Keypair, network_id: &[u8]) {
        sign_transaction(self, keypair, network_id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
