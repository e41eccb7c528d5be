//! Benchmarks for formatting and text statistics.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use zenmark::format::{FormatTag, Selection, apply_format, count_words};

fn bench_apply_format(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/sample.md").repeat(20);
    let mid = md.len() / 2;
    let start = (0..=mid).rev().find(|i| md.is_char_boundary(*i)).unwrap_or(0);

    c.bench_function("apply_format_bold", |b| {
        b.iter(|| {
            apply_format(
                black_box(&md),
                FormatTag::Bold,
                Selection::new(start, start),
            )
        });
    });
}

fn bench_count_words(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/sample.md").repeat(20);

    c.bench_function("count_words", |b| {
        b.iter(|| count_words(black_box(&md)));
    });
}

criterion_group!(benches, bench_apply_format, bench_count_words);
criterion_main!(benches);
