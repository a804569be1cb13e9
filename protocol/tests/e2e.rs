//! End-to-end tests for the Tessera ledger core.
//!
//! These drive the public API the way a node does: accounts sign and submit
//! transactions, the mempool admits them through the checker pipeline while
//! the ledger's sequence state advances, transactions travel over the wire
//! as JSON, and the block producer asks the issuance pool for each height's
//! mint.

use std::sync::Arc;
use std::thread;

use tessera_protocol::config::{NetworkConfig, COMMON_BUDGET_ISSUANCE_ID};
use tessera_protocol::crypto::keys::Keypair;
use tessera_protocol::identity::address_of;
use tessera_protocol::issuance::{Issuance, IssuanceContract, IssuancePool};
use tessera_protocol::transaction::{
    verify_transaction, Amount, InMemorySequenceOracle, Operation, OperationBody, Transaction,
    TransactionBuilder, TransactionError, TransactionKind,
};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Routes library events to the test harness so failures show the checker
/// rule that fired. Only the first call per test binary installs it.
fn init_tracing() {
    let layer = tracing_subscriber::fmt::layer()
        .with_test_writer()
        .with_filter(LevelFilter::DEBUG);
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

struct Account {
    keypair: Keypair,
    address: String,
}

fn account(network: &NetworkConfig) -> Account {
    let keypair = Keypair::generate();
    let address = address_of(network, &keypair).expect("address");
    Account { keypair, address }
}

fn signed_payment(
    network: &NetworkConfig,
    from: &Account,
    to: &str,
    amount: u64,
    sequence_id: u64,
) -> Transaction {
    let op = Operation::from_body(OperationBody::payment(to, Amount::from_raw(amount)));
    let mut tx = Transaction::new(from.address.clone(), sequence_id, vec![op]).expect("tx");
    tx.sign(&from.keypair, &network.network_id);
    tx
}

/// Admits `tx` and, on success, advances the source's sequence id the way a
/// ledger would after applying it.
fn admit(
    tx: &Transaction,
    network: &NetworkConfig,
    ledger: &InMemorySequenceOracle,
) -> Result<(), TransactionError> {
    verify_transaction(tx, network, ledger)?;
    ledger.advance(tx.source());
    Ok(())
}

// ---------------------------------------------------------------------------
// Admission
// ---------------------------------------------------------------------------

#[test]
fn sequence_ids_advance_and_replays_are_rejected() {
    init_tracing();
    let network = NetworkConfig::devnet();
    let ledger = InMemorySequenceOracle::new();
    let alice = account(&network);
    let bob = account(&network);
    ledger.set(alice.address.clone(), 0);

    for seq in 0..5 {
        let tx = signed_payment(&network, &alice, &bob.address, 100, seq);
        admit(&tx, &network, &ledger).expect("in-order transaction admitted");
    }

    let replay = signed_payment(&network, &alice, &bob.address, 100, 4);
    assert!(matches!(
        admit(&replay, &network, &ledger),
        Err(TransactionError::InvalidSequenceId {
            expected: Some(5),
            actual: 4,
            ..
        })
    ));
}

#[test]
fn wire_roundtrip_preserves_admissibility() {
    init_tracing();
    let network = NetworkConfig::testnet();
    let ledger = InMemorySequenceOracle::new();
    let alice = account(&network);
    let carol = account(&network);
    let dave = account(&network);
    ledger.set(alice.address.clone(), 7);

    let mut tx = TransactionBuilder::new(alice.address.clone(), 7)
        .fee(Amount::from_raw(25_000))
        .operation(Operation::from_body(OperationBody::create_account(
            carol.address.clone(),
            Amount::from_raw(1_000_000),
        )))
        .operation(Operation::from_body(OperationBody::payment(
            dave.address.clone(),
            Amount::from_raw(42),
        )))
        .build()
        .expect("tx");
    tx.sign(&alice.keypair, &network.network_id);

    let bytes = tx.serialize().expect("encode");
    let decoded = Transaction::from_json(&bytes).expect("decode");

    assert_eq!(decoded, tx);
    assert_eq!(decoded.body.make_hash_string(), tx.hash());
    assert_eq!(
        decoded.total_amount(true).unwrap(),
        Amount::from_raw(1_000_000 + 42 + 2 * 25_000)
    );
    verify_transaction(&decoded, &network, &ledger).expect("decoded tx admitted");
}

#[test]
fn transaction_for_another_network_is_rejected() {
    let devnet = NetworkConfig::devnet();
    let testnet = NetworkConfig::testnet();
    let ledger = InMemorySequenceOracle::new();
    let alice = account(&devnet);
    let bob = account(&devnet);
    ledger.set(alice.address.clone(), 0);

    let tx = signed_payment(&devnet, &alice, &bob.address, 1, 0);
    assert!(matches!(
        verify_transaction(&tx, &testnet, &ledger),
        Err(TransactionError::InvalidSourceAddress { .. })
    ));
}

#[test]
fn parallel_validation_shares_the_oracle() {
    let network = Arc::new(NetworkConfig::devnet());
    let ledger = Arc::new(InMemorySequenceOracle::new());
    let receiver = account(&network);

    let txs: Vec<Transaction> = (0..16)
        .map(|_| {
            let sender = account(&network);
            ledger.set(sender.address.clone(), 0);
            signed_payment(&network, &sender, &receiver.address, 10, 0)
        })
        .collect();

    let handles: Vec<_> = txs
        .into_iter()
        .map(|tx| {
            let network = Arc::clone(&network);
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || verify_transaction(&tx, &network, ledger.as_ref()).is_ok())
        })
        .collect();

    for h in handles {
        assert!(h.join().unwrap());
    }
}

// ---------------------------------------------------------------------------
// Issuance
// ---------------------------------------------------------------------------

#[test]
fn block_heights_mint_common_budget_and_registered_contracts() {
    init_tracing();
    let network = NetworkConfig::devnet();
    let proposer = Keypair::generate();
    let mut pool = IssuancePool::new(&network).expect("pool");

    let budget = account(&network);
    let contract = IssuanceContract {
        id: "grant-2026".to_string(),
        start_height: 10,
        end_height: 30,
        interval: 10,
        unit: Amount::from_raw(1_000),
        budget: budget.address.clone(),
    };
    assert!(pool.add(Issuance::from_contract(&contract, &network).unwrap()));
    assert!(!pool.add(Issuance::from_contract(&contract, &network).unwrap()));

    let mut minted_to_grant = Amount::zero();
    for height in 0..=40 {
        let tx = pool
            .issue(height, &proposer)
            .unwrap()
            .expect("common budget fires every height");
        assert_eq!(tx.kind, TransactionKind::Issue);
        for op in tx.operations() {
            if op.target_address() == budget.address {
                minted_to_grant = minted_to_grant.checked_add(op.amount()).unwrap();
            }
        }
    }

    assert_eq!(minted_to_grant, Amount::from_raw(3_000));
    assert!(!pool.has("grant-2026"), "expired contract pruned");
    assert!(pool.has(COMMON_BUDGET_ISSUANCE_ID));
}

#[test]
fn validator_accepts_proposer_issuance_for_same_height() {
    init_tracing();
    let network = NetworkConfig::devnet();
    let mut proposer_pool = IssuancePool::new(&network).unwrap();
    let validator_pool = IssuancePool::new(&network).unwrap();

    let tx = proposer_pool
        .issue(12, &Keypair::generate())
        .unwrap()
        .unwrap();
    let wire = tx.serialize().unwrap();
    let received = Transaction::from_json(&wire).unwrap();

    assert!(validator_pool.validate(12, &received));
}
