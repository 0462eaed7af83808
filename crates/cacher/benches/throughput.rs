//! Benchmarks for cacher throughput

use std::hint::black_box;
use std::time::Duration;

use cacher::prelude::*;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use tokio::runtime::Runtime;

fn create_cache() -> Cacher<MemoryStore> {
    Cacher::new(MemoryStore::new())
}

fn bench_set(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = create_cache();

    let mut group = c.benchmark_group("set");
    group.throughput(Throughput::Elements(1));

    group.bench_function("small_value", |b| {
        b.iter(|| {
            rt.block_on(async {
                cache
                    .set(black_box("key"), black_box("42"), None)
                    .await
                    .unwrap();
            });
        });
    });

    group.bench_function("medium_value", |b| {
        let value = "x".repeat(1024); // 1KB
        b.iter(|| {
            rt.block_on(async {
                cache
                    .set(black_box("key"), black_box(value.as_str()), None)
                    .await
                    .unwrap();
            });
        });
    });

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = create_cache();

    // Pre-populate
    rt.block_on(async {
        cache
            .set("key", "42", Some(Duration::from_secs(3600)))
            .await
            .unwrap();
    });

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("hit", |b| {
        b.iter(|| {
            rt.block_on(async {
                let value = cache.get(black_box("key")).await.unwrap();
                black_box(value);
            });
        });
    });

    group.bench_function("miss", |b| {
        b.iter(|| {
            rt.block_on(async {
                let value = cache.get(black_box("absent")).await.unwrap();
                black_box(value);
            });
        });
    });

    group.finish();
}

fn bench_mget(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = create_cache();

    let keys: Vec<String> = (0..10).map(|i| format!("key::{i}")).collect();
    rt.block_on(async {
        for key in keys.iter().step_by(2) {
            cache.set(key, "value", None).await.unwrap();
        }
    });

    let mut group = c.benchmark_group("mget");
    group.throughput(Throughput::Elements(keys.len() as u64));

    group.bench_function("half_hits", |b| {
        b.iter(|| {
            rt.block_on(async {
                let values = cache.mget(black_box(&keys)).await.unwrap();
                black_box(values);
            });
        });
    });

    group.finish();
}

criterion_group!(benches, bench_set, bench_get, bench_mget);
criterion_main!(benches);
