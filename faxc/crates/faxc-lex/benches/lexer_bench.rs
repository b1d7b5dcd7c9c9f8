//! Lexer benchmarks.
//!
//! Run with: `cargo bench --package faxc-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use faxc_lex::tokenize;
use faxc_util::FileId;

fn token_count(source: &str) -> usize {
    tokenize(source, FileId::DUMMY).unwrap().len()
}

fn bench_lexer_small(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_small");

    let source = "let x = 42; fn main() void = { let y = x + 1; return; };";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("decl_and_call", |b| {
        b.iter(|| black_box(token_count(source)))
    });

    group.finish();
}

fn bench_lexer_large_unit(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_large");

    let mut source = String::new();
    for i in 0..500 {
        source.push_str(&format!(
            "export fn f{i}(a: int, b: nullable *int) int = {{ return a + 1; }};\n"
        ));
    }
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("five_hundred_functions", |b| {
        b.iter(|| black_box(token_count(&source)))
    });

    group.finish();
}

fn bench_lexer_numeric_literals(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_numbers");

    let source = "0xDEADBEEFu32 0b1010 0o17 3.14159 1_000_000 42i64";
    group.bench_function("mixed_literals", |b| {
        b.iter(|| black_box(token_count(source)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_small,
    bench_lexer_large_unit,
    bench_lexer_numeric_literals,
);

criterion_main!(benches);
