//! Throughput benchmarks for bulk transaction handling.
//!
//! Run with: `cargo bench --bench throughput`
//!
//! Hashing and signing use the deterministic test doubles, so absolute numbers
//! measure the encoding and orchestration overhead, not Poseidon2 or Schnorr.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tracing_subscriber::EnvFilter;

use lighter_core::hash::FieldHasher;
use lighter_core::signing::TxClient;
use lighter_core::testing::{FakeHasher, FakeSigner};
use lighter_core::types::constants::*;
use lighter_core::types::{CreateGroupedOrdersTx, CreateOrderTx, L2Transaction, OrderInfo, TxInfo};

const EXPIRED_AT: i64 = 1_700_000_600_000;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn order(i: usize) -> OrderInfo {
    OrderInfo {
        market_index: (i % 100) as u8,
        client_order_index: i as i64 + 1,
        base_amount: 1_000 + i as i64,
        price: 4_500_000 + i as u32,
        is_ask: (i % 2) as u8,
        order_type: LIMIT_ORDER,
        time_in_force: GOOD_TILL_TIME,
        reduce_only: 0,
        trigger_price: 0,
        order_expiry: EXPIRED_AT + 86_400_000,
    }
}

fn create_orders(count: usize) -> Vec<CreateOrderTx> {
    (0..count)
        .map(|i| CreateOrderTx {
            account_index: 5,
            api_key_index: 3,
            order: order(i),
            expired_at: EXPIRED_AT,
            nonce: i as i64,
            ..Default::default()
        })
        .collect()
}

fn otoco(nonce: i64) -> CreateGroupedOrdersTx {
    let leg = |order_type, trigger_price| OrderInfo {
        market_index: 1,
        client_order_index: 0,
        base_amount: 0,
        price: trigger_price,
        is_ask: 1,
        order_type,
        time_in_force: IMMEDIATE_OR_CANCEL,
        reduce_only: 1,
        trigger_price,
        order_expiry: EXPIRED_AT + 86_400_000,
    };
    CreateGroupedOrdersTx {
        account_index: 5,
        api_key_index: 3,
        grouping_type: GROUPING_ONE_TRIGGERS_A_ONE_CANCELS_THE_OTHER,
        orders: vec![
            OrderInfo {
                market_index: 1,
                client_order_index: 0,
                ..order(0)
            },
            leg(STOP_LOSS_ORDER, 4_000_000),
            leg(TAKE_PROFIT_ORDER, 5_000_000),
        ],
        expired_at: EXPIRED_AT,
        nonce,
        ..Default::default()
    }
}

/// Benchmark field-level validation across a batch of orders.
fn bench_validate_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_batch");

    for count in [100, 1_000, 10_000].iter() {
        let txs = create_orders(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("create_order", count), &txs, |b, txs| {
            b.iter(|| {
                let valid = txs.iter().filter(|tx| tx.validate().is_ok()).count();
                black_box(valid)
            })
        });
    }

    group.finish();
}

/// Benchmark canonical encoding plus digest computation.
fn bench_hash_batch(c: &mut Criterion) {
    let hasher = FakeHasher::new();
    let mut group = c.benchmark_group("hash_batch");

    for count in [100, 1_000].iter() {
        let txs = create_orders(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("create_order", count), &txs, |b, txs| {
            b.iter(|| {
                for tx in txs {
                    black_box(tx.hash(MAINNET_CHAIN_ID, &hasher).ok());
                }
            })
        });

        let grouped: Vec<_> = (0..*count as i64).map(otoco).collect();
        group.bench_with_input(BenchmarkId::new("otoco", count), &grouped, |b, txs| {
            b.iter(|| {
                for tx in txs {
                    black_box(tx.orders_hash(&hasher as &dyn FieldHasher));
                }
            })
        });
    }

    group.finish();
}

/// Benchmark the full validate, hash, sign pipeline.
fn bench_sign_batch(c: &mut Criterion) {
    init_tracing();
    let client = TxClient::new(
        Arc::new(FakeSigner::from_seed(1)),
        Arc::new(FakeHasher::new()),
        MAINNET_CHAIN_ID,
        5,
        3,
    )
    .expect("valid client identity");

    let mut group = c.benchmark_group("sign_batch");

    for count in [100, 1_000].iter() {
        let txs = create_orders(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("create_order", count), &txs, |b, txs| {
            b.iter(|| {
                for tx in txs {
                    black_box(client.sign_transaction(tx.clone()).ok());
                }
            })
        });
    }

    group.finish();
}

/// Benchmark JSON output of signed transactions.
fn bench_tx_info_serialization(c: &mut Criterion) {
    let client = TxClient::new(
        Arc::new(FakeSigner::from_seed(1)),
        Arc::new(FakeHasher::new()),
        MAINNET_CHAIN_ID,
        5,
        3,
    )
    .expect("valid client identity");

    let signed: Vec<TxInfo> = create_orders(1_000)
        .into_iter()
        .filter_map(|tx| client.sign_transaction(tx).ok())
        .map(TxInfo::from)
        .collect();

    let mut group = c.benchmark_group("tx_info_serialization");
    group.throughput(Throughput::Elements(signed.len() as u64));
    group.bench_function("create_order_1000", |b| {
        b.iter(|| {
            for tx in &signed {
                black_box(tx.tx_info().ok());
            }
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_validate_batch,
    bench_hash_batch,
    bench_sign_batch,
    bench_tx_info_serialization,
);

criterion_main!(benches);
