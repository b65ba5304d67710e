//! Benchmark comparing parse-once/render-many with parse-per-render.
//!
//! Compares two approaches over the same template and values:
//! 1. Parsing the template once and rendering it repeatedly
//! 2. Parsing the template again for every render

use criterion::{Criterion, criterion_group, criterion_main};
use sql_placeholder_rs::{Config, Query, Sqlite, Value};
use std::hint::black_box;

/// Realistic template with named, anonymous, array and optional placeholders
const TEMPLATE: &str = "SELECT :K FROM :q \
     WHERE id IN (:L) \
     [AND name LIKE name:s] \
     [AND created_at > since:i] \
     ORDER BY :C LIMIT :u";

fn values() -> Vec<(&'static str, Value)> {
    vec![
        ("0", Value::map([("id", 1), ("name", 2), ("created_at", 3)])),
        ("1", Value::from("app.users")),
        ("2", Value::list(0..50)),
        ("name", Value::from("O'Hara%")),
        ("3", Value::from("created_at DESC")),
        ("4", Value::from(100)),
    ]
}

fn bench_render(c: &mut Criterion) {
    let config = Config::for_dialect(Sqlite);
    let mut group = c.benchmark_group("render");

    let mut query = Query::new(config.clone(), TEMPLATE).expect("Failed to parse template");
    group.bench_function("parse_once", |b| {
        b.iter(|| {
            let sql = query.map(black_box(values())).expect("Failed to render");
            black_box(sql);
        });
    });

    group.bench_function("parse_every_time", |b| {
        b.iter(|| {
            let mut query =
                Query::new(config.clone(), black_box(TEMPLATE)).expect("Failed to parse template");
            let sql = query.map(black_box(values())).expect("Failed to render");
            black_box(sql);
        });
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let config = Config::for_dialect(Sqlite);
    c.bench_function("parse", |b| {
        b.iter(|| {
            let query =
                Query::new(config.clone(), black_box(TEMPLATE)).expect("Failed to parse template");
            black_box(query);
        });
    });
}

criterion_group!(benches, bench_render, bench_parse);
criterion_main!(benches);
