//! Benchmarks for preview rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use zenmark::preview::Preview;

fn bench_render_sample(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/sample.md");

    c.bench_function("render_sample", |b| {
        b.iter(|| Preview::render(black_box(md), black_box(60), 0));
    });
}

fn bench_render_long_document(c: &mut Criterion) {
    let section = include_str!("../tests/fixtures/sample.md");
    let md = section.repeat(50);

    c.bench_function("render_long_document", |b| {
        b.iter(|| Preview::render(black_box(&md), black_box(60), 0));
    });
}

fn bench_visible_lines(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/sample.md").repeat(50);
    let preview = Preview::render(&md, 60, 0);

    c.bench_function("visible_lines", |b| {
        b.iter(|| preview.visible_lines(black_box(500), black_box(24)));
    });
}

criterion_group!(
    benches,
    bench_render_sample,
    bench_render_long_document,
    bench_visible_lines
);
criterion_main!(benches);
