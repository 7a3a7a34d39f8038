// benches/dual_font_bench.rs
// Criterion benchmark for the dual-font formatter:
//  - Per-case throughput based on the actual label size
//  - Plain path vs markup path on comparable content
//  - Zero-copy microbench for single-script labels
//
// Run with `cargo bench --bench dfb`

#![deny(unsafe_code)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dualfont::{DualFont, Formatted, MarkupTree, UnitSyntax, segment};
use std::hint::black_box;

const POOL: &[&str] = &[
    "Server 服务器 (primary)",
    "第1章：Introduction to Rust",
    "数据库连接池 connection pool",
    "Hello世界",
    "A & B 和 C < D",
    "纯中文的标签内容",
    "Plain English label text",
];

// Deterministic, non-repetitive label corpus of roughly `size` bytes.
fn corpus(size: usize) -> String {
    let mut out = String::with_capacity(size + 64);
    let mut i = 0usize;
    while out.len() < size {
        out.push_str(POOL[(i * 7 + 3) % POOL.len()]);
        out.push(if i % 3 == 0 { '，' } else { ' ' });
        i += 1;
    }
    out
}

fn markup_corpus(size: usize) -> String {
    let mut out = String::from("<div style=\"font-size: 12px\">");
    let mut i = 0usize;
    while out.len() < size {
        let text = POOL[(i * 5 + 1) % POOL.len()].replace('&', "&amp;").replace('<', "&lt;");
        match i % 3 {
            0 => out.push_str(&format!("<p>{text}</p>")),
            1 => out.push_str(&format!("<b>{text}</b><br>")),
            _ => out.push_str(&text),
        }
        i += 1;
    }
    out.push_str("</div>");
    out
}

fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");
    for size in [64, 1024, 16 * 1024] {
        let text = corpus(size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| segment(black_box(text)).count())
        });
    }
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let span = DualFont::default();
    let font_face = DualFont::builder()
        .unit(UnitSyntax::FontFace)
        .build()
        .unwrap();

    let mut group = c.benchmark_group("apply");
    for size in [64, 1024, 16 * 1024] {
        let plain = corpus(size);
        let markup = markup_corpus(size);

        group.throughput(Throughput::Bytes(plain.len() as u64));
        group.bench_with_input(BenchmarkId::new("plain/span", size), &plain, |b, s| {
            b.iter(|| span.apply(black_box(s)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("plain/font-face", size), &plain, |b, s| {
            b.iter(|| font_face.apply(black_box(s)).unwrap())
        });

        group.throughput(Throughput::Bytes(markup.len() as u64));
        group.bench_with_input(BenchmarkId::new("markup/span", size), &markup, |b, s| {
            b.iter(|| span.apply(black_box(s)).unwrap())
        });

        // Second pass over already formatted output
        let formatted = span.apply(&markup).unwrap().value().to_owned();
        group.throughput(Throughput::Bytes(formatted.len() as u64));
        group.bench_with_input(BenchmarkId::new("reformat", size), &formatted, |b, s| {
            b.iter(|| span.apply(black_box(s)).unwrap())
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for size in [1024, 16 * 1024] {
        let markup = markup_corpus(size);
        group.throughput(Throughput::Bytes(markup.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &markup, |b, s| {
            b.iter(|| MarkupTree::parse(black_box(s)).unwrap().to_markup())
        });
    }
    group.finish();
}

fn bench_zero_copy(c: &mut Criterion) {
    let df = DualFont::default();
    let labels = ["纯中文的标签内容", "Plain English label text", "   "];
    for label in labels {
        let out = df.apply(label).unwrap();
        assert!(
            matches!(out, Formatted::Unchanged(_) | Formatted::WholeFont { .. }),
            "`{label}` should not allocate"
        );
    }

    c.bench_function("zero_copy/single_script", |b| {
        b.iter(|| {
            for label in labels {
                black_box(df.apply(black_box(label)).unwrap());
            }
        })
    });
}

criterion_group!(benches, bench_segment, bench_apply, bench_parse, bench_zero_copy);
criterion_main!(benches);
