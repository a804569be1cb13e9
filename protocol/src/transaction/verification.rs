//! Transaction admission: the well-formedness checker pipeline.
//!
//! Every transaction entering the mempool or proposed in a block must pass
//! [`verify_transaction`]. The pipeline is an ordered list of independent
//! rule functions sharing one [`TransactionChecker`] context. The first
//! failing rule short-circuits and its error is returned; later rules are
//! not attempted.
//!
//! Cheap structural rules run before the signature check, and the signature
//! check runs before the hash comparison, so a bad signature is reported as
//! such and never masked by a hash mismatch.

use tracing::debug;

use super::builder::Transaction;
use super::error::{OperationError, TransactionError};
use super::sequence::SequenceOracle;
use super::types::{OperationType, TransactionKind};
use crate::config::NetworkConfig;
use crate::crypto::keys::{PublicKey, Signature};
use crate::crypto::signatures::verify_for_network;
use crate::identity::address::parse_address;

// ---------------------------------------------------------------------------
// Checker context
// ---------------------------------------------------------------------------

/// Shared state for one run of the pipeline.
pub struct TransactionChecker<'a> {
    pub network: &'a NetworkConfig,
    pub sequences: &'a dyn SequenceOracle,
    pub transaction: &'a Transaction,
    /// Filled in by [`check_source`] and reused by [`check_signature`].
    source_key: Option<PublicKey>,
}

impl<'a> TransactionChecker<'a> {
    pub fn new(
        network: &'a NetworkConfig,
        sequences: &'a dyn SequenceOracle,
        transaction: &'a Transaction,
    ) -> Self {
        Self {
            network,
            sequences,
            transaction,
            source_key: None,
        }
    }

    fn source_key(&mut self) -> Result<PublicKey, TransactionError> {
        if let Some(key) = self.source_key {
            return Ok(key);
        }
        let source = self.transaction.source();
        let key = parse_address(self.network, source).map_err(|reason| {
            TransactionError::InvalidSourceAddress {
                address: source.to_string(),
                reason,
            }
        })?;
        self.source_key = Some(key);
        Ok(key)
    }
}

/// One admission rule.
pub type CheckerFn = fn(&mut TransactionChecker<'_>) -> Result<(), TransactionError>;

/// The admission rules, in the order they run.
pub const WELL_FORMED_CHECKS: [(&str, CheckerFn); 6] = [
    ("sequence_id", check_sequence_id),
    ("source", check_source),
    ("base_fee", check_base_fee),
    ("operations", check_operations),
    ("signature", check_signature),
    ("hash_match", check_hash_match),
];

/// Runs `checks` in order against `checker`, stopping at the first failure.
pub fn run_checks(
    checker: &mut TransactionChecker<'_>,
    checks: &[(&str, CheckerFn)],
) -> Result<(), TransactionError> {
    for (name, check) in checks {
        if let Err(err) = check(checker) {
            debug!(
                check = *name,
                hash = %checker.transaction.hash(),
                source = %checker.transaction.source(),
                error = %err,
                "transaction rejected"
            );
            return Err(err);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// 1. The sequence id equals the oracle's expectation for the source.
/// Unknown accounts fail here too.
pub fn check_sequence_id(checker: &mut TransactionChecker<'_>) -> Result<(), TransactionError> {
    let tx = checker.transaction;
    let expected = checker.sequences.expected_sequence_id(tx.source());
    match expected {
        Some(id) if tx.is_valid_sequence_id(id) => Ok(()),
        _ => Err(TransactionError::InvalidSequenceId {
            account: tx.source().to_string(),
            expected,
            actual: tx.sequence_id(),
        }),
    }
}

/// 2. The source is a valid account address on this network.
pub fn check_source(checker: &mut TransactionChecker<'_>) -> Result<(), TransactionError> {
    checker.source_key().map(|_| ())
}

/// 3. The fee is at least the network minimum. There is no ceiling.
pub fn check_base_fee(checker: &mut TransactionChecker<'_>) -> Result<(), TransactionError> {
    let fee = checker.transaction.body.fee;
    let minimum = checker.network.min_fee;
    if fee < minimum {
        return Err(TransactionError::FeeUnderflow {
            minimum,
            actual: fee,
        });
    }
    Ok(())
}

/// 4. The envelope is an account transaction, every operation is
/// well-formed and account-submittable, and none targets the source.
///
/// `issue` envelopes are unsigned and checked by `IssuancePool::validate`
/// instead. The kind sits outside the signed hash, so it is pinned here.
pub fn check_operations(checker: &mut TransactionChecker<'_>) -> Result<(), TransactionError> {
    let tx = checker.transaction;
    if tx.kind != TransactionKind::Transaction {
        return Err(TransactionError::UnexpectedKind {
            expected: TransactionKind::Transaction,
            actual: tx.kind,
        });
    }

    for (index, op) in tx.operations().iter().enumerate() {
        op.is_well_formed(checker.network)
            .map_err(|reason| TransactionError::OperationNotWellFormed { index, reason })?;

        if op.kind() == OperationType::Issuance {
            return Err(TransactionError::OperationNotWellFormed {
                index,
                reason: OperationError::Reserved(OperationType::Issuance),
            });
        }

        if op.target_address() == tx.source() {
            return Err(TransactionError::SelfTransaction {
                index,
                address: tx.source().to_string(),
            });
        }
    }
    Ok(())
}

/// 5. The header signature verifies against the source key over
/// `network_id ‖ header hash`.
pub fn check_signature(checker: &mut TransactionChecker<'_>) -> Result<(), TransactionError> {
    let public_key = checker.source_key()?;
    let tx = checker.transaction;
    let invalid = || TransactionError::InvalidSignature {
        account: tx.source().to_string(),
    };

    let signature = Signature::from_base58(&tx.header.signature).map_err(|_| invalid())?;
    if !verify_for_network(
        &public_key,
        &checker.network.network_id,
        tx.hash().as_bytes(),
        &signature,
    ) {
        return Err(invalid());
    }
    Ok(())
}

/// 6. The stored hash equals a fresh hash of the body.
pub fn check_hash_match(checker: &mut TransactionChecker<'_>) -> Result<(), TransactionError> {
    let tx = checker.transaction;
    let computed = tx.body.make_hash_string();
    if computed != tx.header.hash {
        return Err(TransactionError::HashMismatch {
            stored: tx.header.hash.clone(),
            computed,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Runs the full admission pipeline against `tx`.
///
/// # Errors
///
/// The first failing rule's [`TransactionError`]. Every error is terminal
/// for the transaction.
pub fn verify_transaction(
    tx: &Transaction,
    network: &NetworkConfig,
    sequences: &dyn SequenceOracle,
) -> Result<(), TransactionError> {
    let mut checker = TransactionChecker::new(network, sequences, tx);
    run_checks(&mut checker, &WELL_FORMED_CHECKS)
}

impl Transaction {
    /// Method form of [`verify_transaction`].
    pub fn is_well_formed(
        &self,
        network: &NetworkConfig,
        sequences: &dyn SequenceOracle,
    ) -> Result<(), TransactionError> {
        verify_transaction(self, network, sequences)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::Keypair;
    use crate::identity::address::address_of;
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::operation::{Operation, OperationBody};
    use crate::transaction::sequence::InMemorySequenceOracle;
    use crate::transaction::types::Amount;

    struct Fixture {
        network: NetworkConfig,
        oracle: InMemorySequenceOracle,
        keypair: Keypair,
        source: String,
        target: String,
    }

    impl Fixture {
        fn new() -> Self {
            let network = NetworkConfig::devnet();
            let keypair = Keypair::generate();
            let source = address_of(&network, &keypair).unwrap();
            let target = address_of(&network, &Keypair::generate()).unwrap();
            let oracle = InMemorySequenceOracle::new();
            oracle.set(source.clone(), 3);
            Self {
                network,
                oracle,
                keypair,
                source,
                target,
            }
        }

        fn builder(&self) -> TransactionBuilder {
            TransactionBuilder::new(self.source.clone(), 3).operation(Operation::from_body(
                OperationBody::payment(self.target.clone(), Amount::from_raw(1_000)),
            ))
        }

        fn signed(&self, builder: TransactionBuilder) -> Transaction {
            let mut tx = builder.build().unwrap();
            tx.sign(&self.keypair, &self.network.network_id);
            tx
        }

        fn verify(&self, tx: &Transaction) -> Result<(), TransactionError> {
            verify_transaction(tx, &self.network, &self.oracle)
        }
    }

    #[test]
    fn valid_transaction_passes() {
        let f = Fixture::new();
        let tx = f.signed(f.builder());
        assert!(f.verify(&tx).is_ok());
        assert!(tx.is_well_formed(&f.network, &f.oracle).is_ok());
    }

    #[test]
    fn stale_and_future_sequence_ids_rejected() {
        let f = Fixture::new();
        for seq in [2, 4] {
            let tx = f.signed(
                TransactionBuilder::new(f.source.clone(), seq).operation(Operation::from_body(
                    OperationBody::payment(f.target.clone(), Amount::from_raw(1)),
                )),
            );
            match f.verify(&tx) {
                Err(TransactionError::InvalidSequenceId {
                    expected, actual, ..
                }) => {
                    assert_eq!(expected, Some(3));
                    assert_eq!(actual, seq);
                }
                other => panic!("expected InvalidSequenceId, got {:?}", other),
            }
        }
    }

    #[test]
    fn unknown_account_rejected_as_bad_sequence() {
        let f = Fixture::new();
        let stranger = Keypair::generate();
        let stranger_addr = address_of(&f.network, &stranger).unwrap();
        let mut tx = TransactionBuilder::new(stranger_addr, 0)
            .operation(Operation::from_body(OperationBody::payment(
                f.target.clone(),
                Amount::from_raw(1),
            )))
            .build()
            .unwrap();
        tx.sign(&stranger, &f.network.network_id);
        assert!(matches!(
            f.verify(&tx),
            Err(TransactionError::InvalidSequenceId { expected: None, .. })
        ));
    }

    #[test]
    fn invalid_source_rejected() {
        let f = Fixture::new();
        f.oracle.set("dtsr1garbage", 0);
        let tx = f.signed(
            TransactionBuilder::new("dtsr1garbage", 0).operation(Operation::from_body(
                OperationBody::payment(f.target.clone(), Amount::from_raw(1)),
            )),
        );
        assert!(matches!(
            f.verify(&tx),
            Err(TransactionError::InvalidSourceAddress { .. })
        ));
    }

    #[test]
    fn fee_floor() {
        let f = Fixture::new();
        let min = f.network.min_fee.to_raw();

        for fee in [min, min + 1, min * 100] {
            let tx = f.signed(f.builder().fee(Amount::from_raw(fee)));
            assert!(f.verify(&tx).is_ok(), "fee {} should pass", fee);
        }

        for fee in [min - 1, 0] {
            let tx = f.signed(f.builder().fee(Amount::from_raw(fee)));
            match f.verify(&tx) {
                Err(TransactionError::FeeUnderflow { minimum, actual }) => {
                    assert_eq!(minimum, f.network.min_fee);
                    assert_eq!(actual, Amount::from_raw(fee));
                }
                other => panic!("fee {} expected FeeUnderflow, got {:?}", fee, other),
            }
        }
    }

    #[test]
    fn self_transfer_rejected_in_any_position() {
        let f = Fixture::new();
        let to_self = Operation::from_body(OperationBody::payment(f.source.clone(), Amount::from_raw(1)));
        let tx = f.signed(f.builder().operation(to_self));
        match f.verify(&tx) {
            Err(TransactionError::SelfTransaction { index, address }) => {
                assert_eq!(index, 1);
                assert_eq!(address, f.source);
            }
            other => panic!("expected SelfTransaction, got {:?}", other),
        }
    }

    #[test]
    fn malformed_operation_rejected() {
        let f = Fixture::new();
        let bad = Operation::from_body(OperationBody::create_account("not-an-address", Amount::from_raw(1)));
        let tx = f.signed(f.builder().operation(bad));
        assert!(matches!(
            f.verify(&tx),
            Err(TransactionError::OperationNotWellFormed {
                index: 1,
                reason: OperationError::InvalidTarget { .. }
            })
        ));
    }

    #[test]
    fn account_cannot_submit_issuance() {
        let f = Fixture::new();
        let mint = Operation::from_body(OperationBody::issuance(
            f.target.clone(),
            Amount::from_raw(1_000_000),
        ));
        let tx = f.signed(TransactionBuilder::new(f.source.clone(), 3).operation(mint));
        assert!(matches!(
            f.verify(&tx),
            Err(TransactionError::OperationNotWellFormed {
                index: 0,
                reason: OperationError::Reserved(OperationType::Issuance)
            })
        ));
    }

    #[test]
    fn relabelled_issue_envelope_rejected() {
        let f = Fixture::new();
        let mut tx = f.signed(f.builder());
        tx.kind = TransactionKind::Issue;
        assert!(matches!(
            f.verify(&tx),
            Err(TransactionError::UnexpectedKind {
                expected: TransactionKind::Transaction,
                actual: TransactionKind::Issue,
            })
        ));
    }

    #[test]
    fn unsigned_transaction_rejected() {
        let f = Fixture::new();
        let tx = f.builder().build().unwrap();
        assert!(matches!(
            f.verify(&tx),
            Err(TransactionError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn resigning_with_another_key_fails() {
        let f = Fixture::new();
        let mut tx = f.signed(f.builder());
        tx.sign(&Keypair::generate(), &f.network.network_id);
        assert!(matches!(
            f.verify(&tx),
            Err(TransactionError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn signature_for_other_network_fails() {
        let f = Fixture::new();
        let mut tx = f.builder().build().unwrap();
        tx.sign(&f.keypair, &NetworkConfig::testnet().network_id);
        assert!(matches!(
            f.verify(&tx),
            Err(TransactionError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn body_tampering_after_signing_detected() {
        let f = Fixture::new();
        let mut tx = f.signed(f.builder());
        tx.body.fee = Amount::from_raw(f.network.min_fee.to_raw() + 1);
        assert!(matches!(
            f.verify(&tx),
            Err(TransactionError::HashMismatch { .. })
        ));
    }

    #[test]
    fn tampered_operation_detected() {
        let f = Fixture::new();
        let mut tx = f.signed(f.builder());
        let other = address_of(&f.network, &Keypair::generate()).unwrap();
        tx.body.operations[0] =
            Operation::from_body(OperationBody::payment(other, Amount::from_raw(1_000)));
        let err = f.verify(&tx).unwrap_err();
        assert!(matches!(
            err,
            TransactionError::HashMismatch { .. } | TransactionError::InvalidSignature { .. }
        ));
    }

    #[test]
    fn forged_header_hash_fails_signature_first() {
        let f = Fixture::new();
        let mut tx = f.signed(f.builder());
        tx.header.hash = "1111111111111111111111111111111111111111111".to_string();
        assert!(matches!(
            f.verify(&tx),
            Err(TransactionError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn invalid_source_reported_before_bad_signature() {
        let f = Fixture::new();
        let bogus = "dtsr1notavalidaddress";
        f.oracle.set(bogus, 3);
        let mut tx = TransactionBuilder::new(bogus, 3)
            .operation(Operation::from_body(OperationBody::payment(
                f.target.clone(),
                Amount::from_raw(1),
            )))
            .build()
            .unwrap();
        tx.header.signature = "garbage".to_string();
        assert!(matches!(
            f.verify(&tx),
            Err(TransactionError::InvalidSourceAddress { .. })
        ));
    }

    #[test]
    fn checks_run_in_declared_order() {
        let names: Vec<&str> = WELL_FORMED_CHECKS.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            ["sequence_id", "source", "base_fee", "operations", "signature", "hash_match"]
        );
    }

    #[test]
    fn signature_check_works_standalone() {
        let f = Fixture::new();
        let tx = f.signed(f.builder());
        let mut checker = TransactionChecker::new(&f.network, &f.oracle, &tx);
        assert!(check_signature(&mut checker).is_ok());
    }
}
