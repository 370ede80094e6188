use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use skipshard::{SkipList, SkipListConfig, UniqueSkipList};

fn make_sample_keys(
    n: usize,
    seed: u64,
) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(i64::MIN..=i64::MAX)).collect()
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("skiplist_add");
    for &n in &[1_000usize, 10_000, 50_000] {
        let keys = make_sample_keys(n, 42);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &keys, |b, keys| {
            b.iter(|| {
                // Каждый прогон новый список
                let list = SkipList::new();
                for k in keys {
                    list.add(*k);
                }
                black_box(list);
            })
        });
    }
    group.finish();
}

fn bench_add_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("skiplist_add_range");
    for &n in &[10_000usize, 100_000] {
        let keys = make_sample_keys(n, 7);
        group.throughput(Throughput::Elements(n as u64));

        for workers in [1usize, 4] {
            let config = SkipListConfig {
                bulk_workers: Some(workers),
                ..Default::default()
            };
            group.bench_with_input(
                BenchmarkId::new(format!("{workers}w"), n),
                &keys,
                |b, keys| {
                    b.iter(|| {
                        let list = SkipList::with_config(config.clone()).unwrap();
                        list.add_range(keys.iter().copied());
                        black_box(list);
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_find_hit_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("skiplist_find");
    for &n in &[1_000usize, 10_000, 50_000] {
        // Подготовка: заполнить список один раз
        let keys = make_sample_keys(n, 123);
        let list = SkipList::new();
        list.add_range(keys.iter().copied());

        let misses = make_sample_keys(n, 9999);

        group.bench_with_input(BenchmarkId::new("find_hit", n), &keys, |b, keys| {
            b.iter(|| {
                for k in keys.iter().take(1000) {
                    black_box(list.contains(k));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("find_miss", n), &misses, |b, misses| {
            b.iter(|| {
                for k in misses.iter().take(1000) {
                    black_box(list.contains(k));
                }
            })
        });
    }
    group.finish();
}

fn bench_remove_and_compact(c: &mut Criterion) {
    let mut group = c.benchmark_group("skiplist_remove");
    let keys = make_sample_keys(10_000, 5);

    group.bench_function("remove_half_then_compact", |b| {
        b.iter(|| {
            let mut list = SkipList::new();
            list.add_range(keys.iter().copied());
            for k in keys.iter().step_by(2) {
                list.remove(k);
            }
            black_box(list.compact());
        })
    });
    group.finish();
}

fn bench_unique_add(c: &mut Criterion) {
    let keys = make_sample_keys(10_000, 11);

    c.bench_function("unique_add_with_duplicates", |b| {
        b.iter(|| {
            let list = UniqueSkipList::new();
            for k in keys.iter().chain(keys.iter().take(1000)) {
                let _ = black_box(list.add(*k));
            }
            black_box(list.len())
        })
    });
}

fn bench_iteration(c: &mut Criterion) {
    let list = SkipList::new();
    list.add_range(make_sample_keys(50_000, 3));

    c.bench_function("skiplist_iter_50k", |b| {
        b.iter(|| black_box(list.iter().fold(0i64, |acc, v| acc.wrapping_add(v))))
    });
}

criterion_group!(
    benches,
    bench_add,
    bench_add_range,
    bench_find_hit_miss,
    bench_remove_and_compact,
    bench_unique_add,
    bench_iteration
);
criterion_main!(benches);
