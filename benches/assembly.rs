//! Performance benchmarks for graph assembly.
//!
//! Run with: `cargo bench --bench assembly`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use fragment_kernel::{assemble, KeyValue, Node, Sequence, Text};

/// Flat sequence of `n` distinct text leaves.
fn wide_graph(n: usize) -> Node {
    let seq = Sequence::new();
    for i in 0..n {
        seq.push(Text::new(format!("element {i}")));
    }
    seq.into_node()
}

/// Chain of `depth` nested sequences ending in one leaf.
fn deep_graph(depth: usize) -> Node {
    let mut node = Text::new("bottom").into_node();
    for _ in 0..depth {
        let seq = Sequence::new();
        seq.push(node);
        node = seq.into_node();
    }
    node
}

/// Key-value table referencing one shared leaf `n` times.
fn aliased_graph(n: usize) -> Node {
    let shared = Text::new("shared");
    let kv = KeyValue::new();
    for i in 0..n {
        kv.pair(Text::new(format!("k{i}")), &shared);
    }
    kv.into_node()
}

fn bench_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_wide");
    for n in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let root = wide_graph(n);
            b.iter(|| assemble(black_box(&root)).unwrap());
        });
    }
    group.finish();
}

fn bench_deep(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_deep");
    for depth in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            let root = deep_graph(depth);
            b.iter(|| assemble(black_box(&root)).unwrap());
        });
    }
    group.finish();
}

fn bench_aliased(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_aliased");
    for n in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let root = aliased_graph(n);
            b.iter(|| assemble(black_box(&root)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_wide, bench_deep, bench_aliased);
criterion_main!(benches);
