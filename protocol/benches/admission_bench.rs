// Admission benchmarks for the Tessera ledger core.
//
// Covers canonical body hashing, transaction signing, the full checker
// pipeline, and issuance assembly for pools of growing size.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tessera_protocol::config::NetworkConfig;
use tessera_protocol::crypto::keys::Keypair;
use tessera_protocol::identity::address_of;
use tessera_protocol::issuance::{Issuance, IssuancePool};
use tessera_protocol::transaction::{
    verify_transaction, Amount, InMemorySequenceOracle, Operation, OperationBody, Transaction,
};

fn payment_tx(network: &NetworkConfig, keypair: &Keypair, ops: usize) -> Transaction {
    let source = address_of(network, keypair).unwrap();
    let operations = (0..ops)
        .map(|_| {
            let target = address_of(network, &Keypair::generate()).unwrap();
            Operation::from_body(OperationBody::payment(target, Amount::from_raw(1_000)))
        })
        .collect();
    Transaction::new(source, 0, operations).unwrap()
}

fn bench_body_hash(c: &mut Criterion) {
    let network = NetworkConfig::devnet();
    let keypair = Keypair::generate();
    let mut group = c.benchmark_group("hash/transaction_body");

    for ops in [1usize, 10, 100] {
        let tx = payment_tx(&network, &keypair, ops);
        group.throughput(Throughput::Elements(ops as u64));
        group.bench_with_input(BenchmarkId::from_parameter(ops), &tx, |b, tx| {
            b.iter(|| tx.body.make_hash_string());
        });
    }
    group.finish();
}

fn bench_sign_transaction(c: &mut Criterion) {
    let network = NetworkConfig::devnet();
    let keypair = Keypair::generate();
    let tx = payment_tx(&network, &keypair, 1);

    c.bench_function("ed25519/sign_transaction", |b| {
        b.iter(|| {
            let mut tx = tx.clone();
            tx.sign(&keypair, &network.network_id);
        });
    });
}

fn bench_verify_transaction(c: &mut Criterion) {
    let network = NetworkConfig::devnet();
    let keypair = Keypair::generate();
    let ledger = InMemorySequenceOracle::new();
    let mut tx = payment_tx(&network, &keypair, 1);
    tx.sign(&keypair, &network.network_id);
    ledger.set(tx.source().to_string(), 0);

    c.bench_function("checker/verify_transaction", |b| {
        b.iter(|| verify_transaction(&tx, &network, &ledger).unwrap());
    });
}

fn bench_issuance(c: &mut Criterion) {
    let network = NetworkConfig::devnet();
    let proposer = Keypair::generate();
    let mut group = c.benchmark_group("issuance/issue");

    for size in [1usize, 16, 256] {
        let mut pool = IssuancePool::new(&network).unwrap();
        for i in 1..size {
            let issuance = Issuance::new(
                format!("bench-{}", i),
                0,
                u64::MAX,
                (i % 4 + 1) as u64,
                Amount::from_raw(10),
                format!("budget-{}", i),
            )
            .unwrap();
            pool.add(issuance);
        }
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            let mut height = 0u64;
            b.iter(|| {
                height += 1;
                pool.issue(height, &proposer).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_body_hash,
    bench_sign_transaction,
    bench_verify_transaction,
    bench_issuance
);
criterion_main!(benches);
