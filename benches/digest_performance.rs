//! Digest and pipeline throughput benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashforge::{create, DigestId, Recipe};

fn bench_digest_families(c: &mut Criterion) {
    let input: Vec<u8> = (0u32..4096).map(|i| (i % 251) as u8).collect();
    let mut group = c.benchmark_group("digest_4k");
    group.throughput(Throughput::Bytes(input.len() as u64));
    for id in [
        DigestId::Sha256,
        DigestId::Blake256,
        DigestId::Groestl256,
        DigestId::Jh256,
        DigestId::Skein256,
        DigestId::QmhHuk256,
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(id), &input, |b, input| {
            let mut digest = create(id);
            b.iter(|| digest.compute_bytes(black_box(input)).unwrap());
        });
    }
    group.finish();
}

fn bench_output_widths(c: &mut Criterion) {
    let input: Vec<u8> = (0u32..4096).map(|i| (i % 241) as u8).collect();
    let mut group = c.benchmark_group("blake_widths");
    group.throughput(Throughput::Bytes(input.len() as u64));
    for id in [
        DigestId::Blake224,
        DigestId::Blake256,
        DigestId::Blake384,
        DigestId::Blake512,
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(id), &input, |b, input| {
            let mut digest = create(id);
            b.iter(|| digest.compute_bytes(black_box(input)).unwrap());
        });
    }
    group.finish();
}

fn bench_recipe_arity(c: &mut Criterion) {
    let input: Vec<u8> = (0u32..512).map(|i| (i % 239) as u8).collect();
    let mut group = c.benchmark_group("recipe_arity");
    for stages in [1usize, 2, 4] {
        let ids = vec![DigestId::Sha256; stages];
        group.bench_with_input(BenchmarkId::from_parameter(stages), &input, |b, input| {
            let mut recipe = Recipe::new(&ids).unwrap();
            b.iter(|| recipe.compute_hash(black_box(input)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_digest_families,
    bench_output_widths,
    bench_recipe_arity
);
criterion_main!(benches);
