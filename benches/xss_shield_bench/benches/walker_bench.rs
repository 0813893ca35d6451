//! Tree walker benchmarks
//!
//! Measures traversal overhead for typical and pathological payloads.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Map, Value};
use xss_shield::{sanitize_target, ArrayStrategy, FieldRule, Mode, SanitizeConfig};

/// Typical form submission with nested profile data
fn form_body() -> Map<String, Value> {
    let body = json!({
        "title": "<b>Release notes</b>",
        "comment": "<script>alert(1)</script>Looks good to me",
        "user": {
            "name": "<i>alice</i>",
            "profile": { "bio": "<p>Rust <em>enthusiast</em></p>", "age": 31 }
        },
        "tags": ["<b>rust</b>", "web", "<u>security</u>"],
        "draft": false
    });
    body.as_object().cloned().unwrap_or_default()
}

/// Object nested `depth` levels deep
fn nested_body(depth: usize) -> Map<String, Value> {
    let mut value = json!({ "leaf": "<b>x</b>" });
    for _ in 0..depth {
        value = json!({ "next": value, "sibling": "<i>y</i>" });
    }
    let mut map = Map::new();
    map.insert("root".to_string(), value);
    map
}

/// Benchmark the default strip-all walk
fn bench_default_walk(c: &mut Criterion) {
    let config = SanitizeConfig::default();
    let body = form_body();

    c.bench_function("walk/default", |b| {
        b.iter(|| sanitize_target(black_box(&body), &config))
    });
}

/// Benchmark skip mode, which isolates traversal cost from markup cost
fn bench_skip_walk(c: &mut Criterion) {
    let config = SanitizeConfig::builder()
        .mode(Mode::Skip)
        .build()
        .unwrap_or_default();
    let body = form_body();

    c.bench_function("walk/skip", |b| {
        b.iter(|| sanitize_target(black_box(&body), &config))
    });
}

/// Benchmark field rule resolution with many rules
fn bench_field_rules(c: &mut Criterion) {
    let mut builder = SanitizeConfig::builder();
    for i in 0..50 {
        builder = builder.field(format!("unused.path.{i}"), FieldRule::skip());
    }
    let config = builder
        .field("user.profile", FieldRule::skip())
        .build()
        .unwrap_or_default();
    let body = form_body();

    c.bench_function("walk/field_rules", |b| {
        b.iter(|| sanitize_target(black_box(&body), &config))
    });
}

/// Benchmark array strategies
fn bench_array_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("array_strategy");
    let items: Vec<Value> = (0..100).map(|i| json!(format!("<b>item {i}</b>"))).collect();
    let mut body = Map::new();
    body.insert("items".to_string(), Value::Array(items));

    for (name, strategy) in [
        ("skip", ArrayStrategy::Skip),
        ("each", ArrayStrategy::Each),
        ("join", ArrayStrategy::Join),
    ] {
        let config = SanitizeConfig::builder()
            .array_strategy(strategy)
            .build()
            .unwrap_or_default();
        group.bench_function(name, |b| {
            b.iter(|| sanitize_target(black_box(&body), &config))
        });
    }

    group.finish();
}

/// Benchmark nesting depth
fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth");
    let config = SanitizeConfig::builder()
        .max_depth(64)
        .build()
        .unwrap_or_default();

    for depth in [1, 4, 16, 48].iter() {
        let body = nested_body(*depth);
        group.bench_with_input(BenchmarkId::new("nested", depth), &body, |b, body| {
            b.iter(|| sanitize_target(black_box(body), &config))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_default_walk,
    bench_skip_walk,
    bench_field_rules,
    bench_array_strategies,
    bench_depth,
);

criterion_main!(benches);
