//! Account sequence state consulted by the admission checks.
//!
//! Ledger storage lives outside this crate. The checker only needs to know
//! the next sequence id each source account expects, which it reads through
//! [`SequenceOracle`].

use parking_lot::RwLock;
use std::collections::HashMap;

/// Supplies the next expected sequence id for an account.
///
/// Implementations must be safe to query from several validation workers at
/// once; the checker never mutates them.
pub trait SequenceOracle: Send + Sync {
    /// `None` if the account is unknown to the ledger.
    fn expected_sequence_id(&self, account: &str) -> Option<u64>;
}

/// A map-backed oracle for tests, tools and single-process nodes.
#[derive(Debug, Default)]
pub struct InMemorySequenceOracle {
    accounts: RwLock<HashMap<String, u64>>,
}

impl InMemorySequenceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the next expected id for `account`.
    pub fn set(&self, account: impl Into<String>, sequence_id: u64) {
        self.accounts.write().insert(account.into(), sequence_id);
    }

    /// Bumps the expected id after a transaction from `account` is applied.
    /// Returns the new value, or `None` if the account is unknown or its id
    /// is already `u64::MAX`. The stored id is left untouched in both cases.
    pub fn advance(&self, account: &str) -> Option<u64> {
        let mut accounts = self.accounts.write();
        let next = accounts.get_mut(account)?;
        *next = next.checked_add(1)?;
        Some(*next)
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

impl SequenceOracle for InMemorySequenceOracle {
    fn expected_sequence_id(&self, account: &str) -> Option<u64> {
        self.accounts.read().get(account).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn unknown_account_has_no_expectation() {
        let oracle = InMemorySequenceOracle::new();
        assert_eq!(oracle.expected_sequence_id("nobody"), None);
        assert!(oracle.is_empty());
    }

    #[test]
    fn set_and_advance() {
        let oracle = InMemorySequenceOracle::new();
        oracle.set("alice", 5);
        assert_eq!(oracle.expected_sequence_id("alice"), Some(5));
        assert_eq!(oracle.advance("alice"), Some(6));
        assert_eq!(oracle.expected_sequence_id("alice"), Some(6));
        assert_eq!(oracle.advance("bob"), None);
    }

    #[test]
    fn advance_stops_at_the_last_id() {
        let oracle = InMemorySequenceOracle::new();
        oracle.set("alice", u64::MAX);
        assert_eq!(oracle.advance("alice"), None);
        assert_eq!(oracle.expected_sequence_id("alice"), Some(u64::MAX));
    }

    #[test]
    fn concurrent_advances_are_not_lost() {
        let oracle = Arc::new(InMemorySequenceOracle::new());
        oracle.set("alice", 0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let oracle = Arc::clone(&oracle);
                thread::spawn(move || {
                    for _ in 0..100 {
                        oracle.advance("alice");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(oracle.expected_sequence_id("alice"), Some(800));
    }
}
