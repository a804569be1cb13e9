//! The issuance registry consulted once per block height.
//!
//! [`IssuancePool`] keeps a map from id to [`Issuance`] plus the insertion
//! order of ids, so iteration is deterministic across nodes. Every mutating
//! method takes `&mut self`; to share a pool between the block producer and
//! contract registration, wrap it in a [`SharedIssuancePool`] and run
//! [`IssuancePool::issue`] under one write guard so the scan and the prune
//! it triggers are never observed half-done.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::schedule::{Issuance, IssuanceError};
use crate::config::NetworkConfig;
use crate::crypto::keys::Keypair;
use crate::identity::address::address_of;
use crate::transaction::builder::{Transaction, TransactionBuilder};
use crate::transaction::operation::Operation;
use crate::transaction::types::{Amount, TransactionKind};

/// A pool shared between threads. Take the write lock for `issue`, `add`
/// and `remove`; lookups only need the read lock.
pub type SharedIssuancePool = Arc<RwLock<IssuancePool>>;

/// Registry of active issuances.
#[derive(Debug, Clone)]
pub struct IssuancePool {
    network: NetworkConfig,
    issuances: HashMap<String, Issuance>,
    order: Vec<String>,
}

impl IssuancePool {
    /// A pool holding only the genesis common-budget issuance.
    pub fn new(network: &NetworkConfig) -> Result<Self, IssuanceError> {
        let mut pool = Self::empty(network);
        pool.add(Issuance::common_budget(network)?);
        Ok(pool)
    }

    /// A pool with no issuances at all.
    pub fn empty(network: &NetworkConfig) -> Self {
        Self {
            network: network.clone(),
            issuances: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn into_shared(self) -> SharedIssuancePool {
        Arc::new(RwLock::new(self))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn has(&self, id: &str) -> bool {
        self.issuances.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Issuance> {
        self.issuances.get(id)
    }

    /// Ids in iteration order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Registers `issuance`. Returns `false` and changes nothing if its id
    /// is already present.
    pub fn add(&mut self, issuance: Issuance) -> bool {
        if self.issuances.contains_key(issuance.id()) {
            debug!(id = issuance.id(), "issuance already registered");
            return false;
        }
        self.order.push(issuance.id().to_string());
        self.issuances.insert(issuance.id().to_string(), issuance);
        true
    }

    /// Removes `id` from the registry. The last id takes its slot in the
    /// iteration order.
    pub fn remove(&mut self, id: &str) -> Option<Issuance> {
        let removed = self.issuances.remove(id)?;
        if let Some(index) = self.order.iter().position(|existing| existing == id) {
            self.order.swap_remove(index);
        }
        Some(removed)
    }

    /// Operations due at `height`, in iteration order. Does not prune.
    pub fn expected_operations(&self, height: u64) -> Vec<Operation> {
        self.order
            .iter()
            .filter_map(|id| self.issuances.get(id))
            .filter(|issuance| issuance.is_available_issuance(height))
            .filter_map(|issuance| issuance.issue(height))
            .collect()
    }

    /// Assembles the synthetic issuance transaction for `height`.
    ///
    /// Expired issuances are pruned permanently. Returns `Ok(None)` when
    /// nothing is due. The transaction is unsigned, with the proposer as
    /// source, zero fee and sequence id zero.
    pub fn issue(
        &mut self,
        height: u64,
        proposer: &Keypair,
    ) -> Result<Option<Transaction>, IssuanceError> {
        let source = address_of(&self.network, proposer)?;

        let mut operations = Vec::new();
        let mut expired = Vec::new();
        for id in &self.order {
            let Some(issuance) = self.issuances.get(id) else {
                continue;
            };
            if !issuance.is_available_issuance(height) {
                expired.push(id.clone());
                continue;
            }
            if let Some(op) = issuance.issue(height) {
                operations.push(op);
            }
        }

        for id in expired {
            if let Some(issuance) = self.remove(&id) {
                info!(id = %id, end = issuance.end(), height, "pruned expired issuance");
            }
        }

        if operations.is_empty() {
            return Ok(None);
        }

        let count = operations.len();
        let tx = TransactionBuilder::new(source, 0)
            .kind(TransactionKind::Issue)
            .fee(Amount::zero())
            .operations(operations)
            .build()?;

        info!(height, operations = count, hash = %tx.hash(), "issuance transaction assembled");
        Ok(Some(tx))
    }

    /// Checks that `tx` is exactly the issuance this pool would produce at
    /// `height`: kind `issue`, zero fee, sequence id zero, the expected
    /// operations in order, and a header hash matching the body.
    pub fn validate(&self, height: u64, tx: &Transaction) -> bool {
        tx.kind == TransactionKind::Issue
            && tx.body.fee.is_zero()
            && tx.body.sequence_id == 0
            && tx.body.operations == self.expected_operations(height)
            && tx.header.hash == tx.body.make_hash_string()
    }
}
