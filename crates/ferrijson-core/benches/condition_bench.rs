use criterion::{Criterion, criterion_group, criterion_main};
use ferrijson_core::api::{QueryBuilder, Store};
use ferrijson_core::condition::{ConditionCache, parse_condition};
use serde_json::{Value, json};
use std::hint::black_box;
use tempfile::tempdir;

fn records(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("user_{i:05}"),
                "age": i % 90,
                "profile": {"role": if i % 7 == 0 { "admin" } else { "user" }}
            })
        })
        .collect()
}

fn bench_parse_uncached(c: &mut Criterion) {
    c.bench_function("parse_uncached", |b| {
        b.iter(|| parse_condition(black_box("profile.role startsWith \"adm\"")));
    });
}

fn bench_parse_cached(c: &mut Criterion) {
    let cache = ConditionCache::new();
    cache.parse("profile.role startsWith \"adm\"");
    c.bench_function("parse_cached", |b| {
        b.iter(|| cache.parse(black_box("profile.role startsWith \"adm\"")));
    });
}

fn bench_chained_filter_10k(c: &mut Criterion) {
    let mut data = records(10_000);
    c.bench_function("chained_filter_10k", |b| {
        b.iter(|| {
            QueryBuilder::new(&mut data)
                .filter("age >= 18")
                .filter("profile.role = admin")
                .filter("name contains _0")
                .count()
        });
    });
}

fn bench_update_where_1k(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let mut store = Store::open(dir.path().join("bench.json"));
    store.insert_many(records(1_000)).unwrap();

    let mut i = 0u64;
    c.bench_function("update_where_1k", |b| {
        b.iter(|| {
            store
                .update_where("profile.role = admin", &json!({"profile.seen": i}))
                .unwrap();
            i += 1;
        });
    });
}

criterion_group!(
    benches,
    bench_parse_uncached,
    bench_parse_cached,
    bench_chained_filter_10k,
    bench_update_where_1k,
);
criterion_main!(benches);
