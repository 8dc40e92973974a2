use criterion::{criterion_group, criterion_main};

fn prefilter_benchmarks(c: &mut criterion::Criterion) {
    prefilter::bench::benchmarks(c);
}

criterion_group!(benches, prefilter_benchmarks);
criterion_main!(benches);
