//! Markup capability benchmarks
//!
//! Compares strip-all against allow-list cleaning for short and long inputs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use xss_shield::{AllowList, Markup, Preset};

fn payload(repeat: usize) -> String {
    r#"<p>Hello <b>world</b> <a href="https://example.com" onclick="x()">link</a></p><script>alert(1)</script>"#
        .repeat(repeat)
}

/// Benchmark strip-all on growing inputs
fn bench_strip_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("strip_all");
    let markup = Markup::default();

    for repeat in [1, 10, 100].iter() {
        let input = payload(*repeat);
        group.bench_with_input(BenchmarkId::new("repeat", repeat), &input, |b, input| {
            b.iter(|| markup.strip_all(black_box(input)))
        });
    }

    group.finish();
}

/// Benchmark allow-list cleaning with the rich-text preset settings
fn bench_allow_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("allow_list");
    let markup = Markup::default();
    let settings = Preset::RichText
        .config()
        .allow_list
        .unwrap_or_default();

    for repeat in [1, 10, 100].iter() {
        let input = payload(*repeat);
        group.bench_with_input(BenchmarkId::new("repeat", repeat), &input, |b, input| {
            b.iter(|| markup.clean(black_box(input), &settings))
        });
    }

    group.bench_function("capability_defaults", |b| {
        let input = payload(10);
        b.iter(|| markup.clean(black_box(&input), &AllowList::default()))
    });

    group.finish();
}

criterion_group!(benches, bench_strip_all, bench_allow_list);

criterion_main!(benches);
