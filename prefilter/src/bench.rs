//! Benchmarks for the region passes.
//! Run with: cargo bench -p prefilter --features bench --bench prefilter

use std::hint::black_box;

use common::log_setup::{LogConfig, setup_logging};
use criterion::{BenchmarkId, Criterion, Throughput};

use crate::features::{DENOISING_RECORD_LEN, Feature, SHADOW_A_OFFSET};
use crate::kernels::ShadowBuffers;
use crate::pipeline::Prefilter;
use crate::{PrefilterConfig, Rect, Tile, TileLayout};

const SIZES: [i32; 3] = [64, 256, 512];
const SAMPLES: u32 = 64;

/// Single-tile render buffer of `size`² pixels with deterministic records.
fn render_buffer(size: i32) -> Vec<f32> {
    let pixels = (size * size) as usize;
    let mut buffer = vec![0.0f32; pixels * DENOISING_RECORD_LEN];
    for (p, record) in buffer.chunks_exact_mut(DENOISING_RECORD_LEN).enumerate() {
        for (i, value) in record.iter_mut().enumerate() {
            *value = ((p * 31 + i * 7) % 97) as f32 * 0.5;
        }
        record[SHADOW_A_OFFSET] = 0.25 + (p % 3) as f32 * 0.25;
        record[SHADOW_A_OFFSET + 3] = 0.5 + (p % 2) as f32 * 0.25;
    }
    buffer
}

/// Register prefilter benchmarks with Criterion.
pub fn benchmarks(c: &mut Criterion) {
    setup_logging(&LogConfig::console_only("warn"));

    bench_divide_shadow(c);
    bench_load_feature(c);
    bench_combine_halves(c);
}

fn bench_divide_shadow(c: &mut Criterion) {
    let mut group = c.benchmark_group("divide_shadow");

    for size in SIZES {
        let bounds = Rect::new(0, 0, size, size);
        let buffer = render_buffer(size);
        let Ok(layout) = TileLayout::single(bounds, Tile::new(&buffer, 0, size as usize)) else {
            continue;
        };
        let Ok(prefilter) = Prefilter::new(&layout, bounds, SAMPLES, PrefilterConfig::default())
        else {
            continue;
        };
        let mut outputs: [Vec<f32>; 5] = std::array::from_fn(|_| prefilter.alloc_buffer());

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| {
                let [ua, ub, sv, svv, bv] = &mut outputs;
                let result = prefilter.divide_shadow(ShadowBuffers {
                    unfiltered_a: ua,
                    unfiltered_b: ub,
                    sample_variance: sv,
                    sample_variance_v: svv,
                    buffer_variance: bv,
                });
                black_box(result)
            })
        });
    }

    group.finish();
}

fn bench_load_feature(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_feature");

    for size in SIZES {
        let bounds = Rect::new(0, 0, size, size);
        let buffer = render_buffer(size);
        let Ok(layout) = TileLayout::single(bounds, Tile::new(&buffer, 0, size as usize)) else {
            continue;
        };
        let Ok(prefilter) = Prefilter::new(&layout, bounds, SAMPLES, PrefilterConfig::default())
        else {
            continue;
        };
        let mut mean = prefilter.alloc_buffer();
        let mut variance = prefilter.alloc_buffer();

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_function(BenchmarkId::new("depth", size), |b| {
            b.iter(|| {
                let result = prefilter.load_feature(
                    black_box(Feature::Depth),
                    &mut mean,
                    &mut variance,
                );
                black_box(result)
            })
        });
    }

    group.finish();
}

fn bench_combine_halves(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine_halves");

    for size in SIZES {
        let bounds = Rect::new(0, 0, size, size);
        let buffer = render_buffer(size);
        let Ok(layout) = TileLayout::single(bounds, Tile::new(&buffer, 0, size as usize)) else {
            continue;
        };
        let Ok(prefilter) = Prefilter::new(&layout, bounds, SAMPLES, PrefilterConfig::default())
        else {
            continue;
        };
        let a: Vec<f32> = (0..prefilter.buffer_len())
            .map(|i| (i % 13) as f32 * 0.1)
            .collect();
        let b: Vec<f32> = (0..prefilter.buffer_len())
            .map(|i| (i % 7) as f32 * 0.1)
            .collect();
        let mut mean = prefilter.alloc_buffer();
        let mut variance = prefilter.alloc_buffer();

        group.throughput(Throughput::Elements((size * size) as u64));
        for radius in 0..=crate::MAX_COMBINE_RADIUS {
            group.bench_function(BenchmarkId::new(format!("radius_{}", radius), size), |bench| {
                bench.iter(|| {
                    let result = prefilter.combine_halves_with_radius(
                        Some(&mut mean[..]),
                        Some(&mut variance[..]),
                        black_box(&a),
                        black_box(&b),
                        radius,
                    );
                    black_box(result)
                })
            });
        }
    }

    group.finish();
}
