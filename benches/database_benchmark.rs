use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use vesseldb::core::config::{Config, IndexConfig};
use vesseldb::core::database::Database;
use vesseldb::core::types::IndexKind;

/// Helper to create test records
fn create_test_records(count: usize) -> Vec<Value> {
    let mut rng = StdRng::seed_from_u64(42);
    let builders = ["Namura", "Imabari", "Oshima", "Tsuneishi"];
    (0..count)
        .map(|i| {
            json!({
                "id": i,
                "builder": builders[rng.gen_range(0..builders.len())],
                "code": rng.gen_range(0..100),
                "tonnage": rng.gen_range(1_000.0..200_000.0),
            })
        })
        .collect()
}

fn loaded_db(count: usize) -> Database {
    let index = IndexConfig::new([("builder", IndexKind::String), ("code", IndexKind::Integer)]).unwrap();
    let mut db = Database::open(Config::new(index)).unwrap();
    db.load_records(create_test_records(count)).unwrap();
    db
}

/// Benchmark each plan shape, bypassing the cache
fn bench_query_paths(c: &mut Criterion) {
    let db = loaded_db(100_000);
    let mut group = c.benchmark_group("query_paths");

    let queries = [
        ("string_seek", "WHERE builder = 'Namura'"),
        ("integer_seek", "WHERE code = 42"),
        ("integer_range", "WHERE code < 10"),
        ("linear_scan_eq", "WHERE id = 5000"),
        ("linear_scan_range", "WHERE tonnage > 150000"),
        ("and_index_scan", "WHERE code = 42 AND tonnage > 100000"),
    ];

    for (name, query) in queries {
        group.bench_with_input(BenchmarkId::from_parameter(name), &query, |b, query| {
            b.iter(|| black_box(db.execute(query)));
        });
    }

    group.finish();
}

/// Benchmark repeated queries served from the cache
fn bench_cached_query(c: &mut Criterion) {
    let db = loaded_db(100_000);
    let _ = db.query("WHERE tonnage > 150000");

    c.bench_function("cached_query", |b| {
        b.iter(|| black_box(db.query("WHERE tonnage > 150000")));
    });
}

/// Concurrent readers sharing one database
fn bench_concurrent_queries(c: &mut Criterion) {
    let db = Arc::new(loaded_db(50_000));
    let mut group = c.benchmark_group("concurrent_queries");
    group.sample_size(10);

    for readers in [1, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(readers), &readers, |b, &readers| {
            b.iter_custom(|iters| {
                let start = Instant::now();
                let handles: Vec<_> = (0..readers)
                    .map(|r| {
                        let db = Arc::clone(&db);
                        thread::spawn(move || {
                            for i in 0..iters {
                                let query = format!("WHERE code = {}", (i as usize + r) % 100);
                                black_box(db.execute(&query));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
                start.elapsed()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_query_paths, bench_cached_query, bench_concurrent_queries);
criterion_main!(benches);
