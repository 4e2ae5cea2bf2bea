//! Store encoding benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jsondb_bench::random_store;
use jsondb_core::{decode_store, encode_store};

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for size in [100, 1000, 10_000].iter() {
        let store = random_store(*size);
        for pretty in [false, true] {
            let bytes = encode_store(&store, pretty).unwrap();
            group.throughput(Throughput::Bytes(bytes.len() as u64));
            let id = format!("{}/{}", size, if pretty { "pretty" } else { "compact" });
            group.bench_with_input(BenchmarkId::from_parameter(id), &store, |b, store| {
                b.iter(|| encode_store(black_box(store), pretty).unwrap());
            });
        }
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [100, 1000, 10_000].iter() {
        let bytes = encode_store(&random_store(*size), false).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| decode_store(black_box(bytes)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
