//! Table store benchmarks.
//!
//! Benchmarks for:
//! - Inserts into an empty store (group growth)
//! - Full scans with decode
//! - Delete and reinsert (free-slot reuse)
//! - Logged inserts with commit and rollback

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tessera_bench::utils::{bench_columns, generate_rows};
use tessera_common::DEFAULT_TUPLE_GROUP_SIZE;
use tessera_storage::{NoUndo, StoreHandle, TableStore};
use tessera_txn::Transaction;

fn new_store() -> StoreHandle {
    StoreHandle::new(TableStore::new(bench_columns(), DEFAULT_TUPLE_GROUP_SIZE).expect("valid layout"))
}

fn filled_store(rows: &[Vec<tessera_common::Value>]) -> StoreHandle {
    let store = new_store();
    for row in rows {
        store.insert(row, &mut NoUndo).expect("insert failed");
    }
    store
}

/// Benchmark inserts into an empty store.
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage/insert");

    for size in [100, 1000, 10_000].iter() {
        let rows = generate_rows(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| black_box(filled_store(rows)));
        });
    }

    group.finish();
}

/// Benchmark a full scan with decode.
fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage/scan");

    for size in [1000, 10_000].iter() {
        let store = filled_store(&generate_rows(*size));
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| {
                let mut cursor = None;
                let mut count = 0usize;
                while let Some(tuple) = store.scan_next(cursor).expect("scan failed") {
                    black_box(store.decode(tuple).expect("decode failed"));
                    cursor = Some(tuple);
                    count += 1;
                }
                count
            });
        });
    }

    group.finish();
}

/// Benchmark deleting every row and inserting them again into reused slots.
fn bench_delete_reinsert(c: &mut Criterion) {
    let rows = generate_rows(1000);
    let store = filled_store(&rows);

    c.bench_function("storage/delete_reinsert_1000", |b| {
        b.iter(|| {
            while let Some(tuple) = store.scan_next(None).expect("scan failed") {
                store.delete(tuple, &mut NoUndo).expect("delete failed");
            }
            for row in &rows {
                store.insert(row, &mut NoUndo).expect("insert failed");
            }
        });
    });
}

/// Benchmark logged inserts followed by commit or rollback.
fn bench_transaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage/transaction");
    let rows = generate_rows(1000);

    group.bench_function("insert_commit", |b| {
        b.iter(|| {
            let store = new_store();
            let mut txn = Transaction::new();
            txn.begin().expect("begin failed");
            for row in &rows {
                store.insert(row, &mut txn).expect("insert failed");
            }
            black_box(txn.commit().expect("commit failed"))
        });
    });

    group.bench_function("insert_rollback", |b| {
        b.iter(|| {
            let store = new_store();
            let mut txn = Transaction::new();
            txn.begin().expect("begin failed");
            for row in &rows {
                store.insert(row, &mut txn).expect("insert failed");
            }
            black_box(txn.rollback().expect("rollback failed"))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_scan,
    bench_delete_reinsert,
    bench_transaction
);
criterion_main!(benches);
