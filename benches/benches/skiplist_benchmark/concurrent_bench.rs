use std::{
    hint::black_box,
    sync::{Arc, Barrier},
    thread,
};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use skipshard::SkipList;

fn make_keys(
    n: usize,
    seed: u64,
) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen()).collect()
}

fn bench_concurrent_adds(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_adds");

    for &num_threads in &[1, 2, 4, 8] {
        let ops_per_thread = 10_000;
        group.throughput(Throughput::Elements((num_threads * ops_per_thread) as u64));

        let lanes: Vec<Vec<i64>> = (0..num_threads)
            .map(|tid| make_keys(ops_per_thread, (tid as u64) * 42))
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{num_threads}t")),
            &lanes,
            |b, lanes| {
                b.iter(|| {
                    let list = Arc::new(SkipList::new());
                    let barrier = Arc::new(Barrier::new(lanes.len()));
                    let mut handles = vec![];

                    for keys in lanes.iter().cloned() {
                        let list = Arc::clone(&list);
                        let barrier = Arc::clone(&barrier);
                        handles.push(thread::spawn(move || {
                            barrier.wait();
                            for key in keys {
                                list.add(key);
                            }
                        }));
                    }

                    for h in handles {
                        h.join().unwrap();
                    }
                    black_box(list.len())
                })
            },
        );
    }

    group.finish();
}

fn bench_concurrent_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_reads");

    // Подготовка: заполняем список
    let keys = Arc::new(make_keys(10_000, 123));
    let list = Arc::new(SkipList::new());
    list.add_range(keys.iter().copied());

    for &num_threads in &[1, 2, 4, 8] {
        group.throughput(Throughput::Elements((num_threads * keys.len()) as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(num_threads),
            &num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let handles: Vec<_> = (0..num_threads)
                        .map(|_| {
                            let list = Arc::clone(&list);
                            let keys = Arc::clone(&keys);
                            thread::spawn(move || keys.iter().filter(|k| list.contains(k)).count())
                        })
                        .collect();

                    for h in handles {
                        black_box(h.join().unwrap());
                    }
                })
            },
        );
    }

    group.finish();
}

fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_add_remove_find");

    for &num_threads in &[2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_threads),
            &num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let list = Arc::new(SkipList::new());
                    list.add_range(0..10_000i64);

                    let handles: Vec<_> = (0..num_threads)
                        .map(|tid| {
                            let list = Arc::clone(&list);
                            thread::spawn(move || {
                                let mut rng = StdRng::seed_from_u64(tid as u64);
                                for _ in 0..2_000 {
                                    let key = rng.gen_range(0..20_000i64);
                                    match rng.gen_range(0..3) {
                                        0 => list.add(key),
                                        1 => {
                                            list.remove(&key);
                                        }
                                        _ => {
                                            black_box(list.contains(&key));
                                        }
                                    }
                                }
                            })
                        })
                        .collect();

                    for h in handles {
                        h.join().unwrap();
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_concurrent_adds,
    bench_concurrent_reads,
    bench_mixed_workload
);
criterion_main!(benches);
