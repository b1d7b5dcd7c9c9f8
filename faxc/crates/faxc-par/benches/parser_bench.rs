//! Parser benchmarks.
//!
//! Run with: `cargo bench --package faxc-par`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use faxc_par::parse_subunit;
use faxc_util::FileId;

fn decl_count(source: &str) -> usize {
    parse_subunit(source, FileId::DUMMY).unwrap().decls.len()
}

fn bench_parser_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_simple");

    let source = "const LIMIT: int = 42;";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("const_decl", |b| b.iter(|| black_box(decl_count(source))));

    group.finish();
}

fn bench_parser_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_functions");

    let source = r#"
        export fn fib(n: int) int = {
            if (n <= 1) {
                return n;
            };
            return fib(n - 1) + fib(n - 2);
        };
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("recursive_fn", |b| b.iter(|| black_box(decl_count(source))));

    group.finish();
}

fn bench_parser_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_types");

    let source = r#"
        type point = struct { x: int, y: int };
        type maybe_point = (point | void);
        type callback = fn(int, int) int;
        type color = enum { Red, Green, Blue };
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("struct_union_enum", |b| b.iter(|| black_box(decl_count(source))));

    group.finish();
}

fn bench_parser_large_unit(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_large");

    let mut source = String::new();
    for i in 0..500 {
        source.push_str(&format!(
            "export fn f{i}(a: int, b: nullable *int) int = {{ return a + 1; }};\n"
        ));
    }

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("five_hundred_functions", |b| {
        b.iter(|| black_box(decl_count(&source)))
    });

    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");

    let source = r#"
        export fn process(n: int) int = {
            let sum: int = 0;
            for (let i: int = 0; i < n; i += 1) {
                sum += i;
            };
            switch (n) {
                case 0 => return 0,
                case 1 => return 1,
            };
            return sum;
        };
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("for_and_switch", |b| b.iter(|| black_box(decl_count(source))));

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_simple,
    bench_parser_functions,
    bench_parser_types,
    bench_parser_large_unit,
    bench_parser_control_flow,
);
criterion_main!(benches);
