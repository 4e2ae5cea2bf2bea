//! Database operation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jsondb_core::{AggregateOp, Config, Database, SortOrder};
use jsondb_bench::{populated, random_document};
use tempfile::TempDir;

/// Benchmark inserts into a collection that already holds `size` documents.
///
/// Every insert rewrites the whole store, so cost grows with collection size.
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let db = populated(size);
            let mut next_id = size as i64;

            b.iter(|| {
                db.insert("bench", black_box(random_document(next_id)))
                    .unwrap();
                db.delete("bench", next_id).unwrap();
                next_id += 1;
            });
        });
    }
    group.finish();
}

/// Benchmark inserts against a real file.
fn bench_file_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_insert");

    for sync in [false, true].iter() {
        let label = if *sync { "sync" } else { "no_sync" };
        group.bench_with_input(BenchmarkId::from_parameter(label), sync, |b, &sync| {
            let dir = TempDir::new().unwrap();
            let config = Config::new().pretty(false).sync_on_write(sync);
            let db = Database::open_with_config(&dir.path().join("bench.json"), config).unwrap();
            for i in 0..100 {
                db.insert("bench", random_document(i)).unwrap();
            }
            let mut next_id = 100;

            b.iter(|| {
                db.insert("bench", black_box(random_document(next_id)))
                    .unwrap();
                next_id += 1;
            });
        });
    }
    group.finish();
}

/// Benchmark full reads, which sweep and persist before returning.
fn bench_get_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_all");

    for size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let db = populated(size);
            b.iter(|| black_box(db.get_all("bench").unwrap()));
        });
    }
    group.finish();
}

/// Benchmark sorting by a numeric and a string field.
fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    let db = populated(1000);

    for key in ["age", "name"].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(key), key, |b, &key| {
            b.iter(|| black_box(db.sort("bench", key, SortOrder::Desc).unwrap()));
        });
    }
    group.finish();
}

/// Benchmark aggregation over a numeric field.
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let db = populated(1000);

    for op in [AggregateOp::Sum, AggregateOp::Avg, AggregateOp::Max].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(op), op, |b, &op| {
            b.iter(|| black_box(db.aggregate("bench", "score", op).unwrap()));
        });
    }
    group.finish();
}

/// Benchmark search and pagination.
fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let db = populated(1000);

    group.bench_function("search", |b| {
        let target = serde_json::json!(42);
        b.iter(|| black_box(db.search("bench", "age", &target).unwrap()));
    });
    group.bench_function("paginate", |b| {
        b.iter(|| black_box(db.paginate("bench", 10, 50).unwrap()));
    });
    group.bench_function("filter", |b| {
        b.iter(|| {
            black_box(
                db.filter("bench", |d| {
                    d.field("active").is_some_and(|v| v.as_bool() == Some(true))
                })
                .unwrap(),
            )
        });
    });
    group.finish();
}

/// Benchmark snapshot transactions.
fn bench_transaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction");

    for size in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let db = populated(size);
            b.iter(|| {
                db.start_transaction();
                db.update("bench", 0, serde_json::json!({"age": 1})).unwrap();
                db.rollback_transaction().unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_file_insert,
    bench_get_all,
    bench_sort,
    bench_aggregate,
    bench_query,
    bench_transaction,
);
criterion_main!(benches);
