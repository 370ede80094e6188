use std::{
    hint::black_box,
    sync::{Arc, Barrier},
    thread,
};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use skipshard::{ShardedSkipList, SkipList, UniqueShardedSkipList};

fn make_keys(
    n: usize,
    seed: u64,
) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen()).collect()
}

fn bench_sharded_vs_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("sharded_vs_single_adds");
    let num_threads = 8;
    let lanes: Vec<Vec<u64>> = (0..num_threads)
        .map(|tid| make_keys(5_000, tid as u64))
        .collect();
    group.throughput(Throughput::Elements((num_threads * 5_000) as u64));

    group.bench_function("single", |b| {
        b.iter(|| {
            let list = Arc::new(SkipList::new());
            run_lanes(&lanes, move |key| list.add(key));
        })
    });

    for &shards in &[4usize, 16, 64] {
        group.bench_with_input(BenchmarkId::new("sharded", shards), &shards, |b, &shards| {
            b.iter(|| {
                let index = Arc::new(ShardedSkipList::hashed(shards).unwrap());
                run_lanes(&lanes, move |key| index.add(key).unwrap());
            })
        });
    }

    group.finish();
}

/// Запускает по потоку на полосу ключей с общим стартом.
fn run_lanes<F>(
    lanes: &[Vec<u64>],
    add: F,
) where
    F: Fn(u64) + Send + Sync + Clone + 'static,
{
    let barrier = Arc::new(Barrier::new(lanes.len()));
    let handles: Vec<_> = lanes
        .iter()
        .cloned()
        .map(|keys| {
            let barrier = Arc::clone(&barrier);
            let add = add.clone();
            thread::spawn(move || {
                barrier.wait();
                for key in keys {
                    add(key);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}

fn bench_sharded_bulk_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("sharded_add_range");
    let keys = make_keys(200_000, 17);
    group.throughput(Throughput::Elements(keys.len() as u64));

    for &shards in &[1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(shards), &keys, |b, keys| {
            b.iter(|| {
                let index = ShardedSkipList::hashed(shards).unwrap();
                index.add_range(keys.iter().copied()).unwrap();
                black_box(index.len())
            })
        });
    }

    group.finish();
}

fn bench_sorted_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("sharded_enumeration");
    let index = ShardedSkipList::hashed(16).unwrap();
    index.add_range(make_keys(50_000, 23)).unwrap();

    group.bench_function("iter_concat", |b| {
        b.iter(|| black_box(index.iter().count()))
    });
    group.bench_function("iter_sorted_merge", |b| {
        b.iter(|| black_box(index.iter_sorted().count()))
    });
    group.bench_function("copy_to_sorted", |b| {
        let mut buf = vec![0u64; index.len()];
        b.iter(|| index.copy_to(black_box(&mut buf), 0).unwrap())
    });

    group.finish();
}

fn bench_unique_sharded_bulk(c: &mut Criterion) {
    let keys: Vec<u64> = (0..100_000).collect();

    c.bench_function("unique_sharded_add_range_100k", |b| {
        b.iter(|| {
            let index = UniqueShardedSkipList::hashed(8).unwrap();
            index.add_range(keys.iter().copied()).unwrap();
            black_box(index.len())
        })
    });
}

criterion_group!(
    benches,
    bench_sharded_vs_single,
    bench_sharded_bulk_load,
    bench_sorted_enumeration,
    bench_unique_sharded_bulk
);
criterion_main!(benches);
