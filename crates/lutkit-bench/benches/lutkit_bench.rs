//! Benchmarks for LUT parsing and caching.
//!
//! Run with: `cargo bench`

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use lutkit_io::{CacheConfig, LutCache, png};
use lutkit_lut::{ColorSpaceTag, LutModel, cube, palette};

fn identity(size: usize) -> LutModel {
    LutModel::identity(format!("identity_{size}"), size, ColorSpaceTag::Srgb)
        .expect("identity LUT")
}

/// Benchmark `.cube` text parsing.
fn bench_cube_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("cube_parse");

    for size in [17usize, 33, 65] {
        let text = cube::to_string(&identity(size));
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, t| {
            b.iter(|| cube::parse_str(black_box(t), "bench.cube").expect("parse"))
        });
    }

    group.finish();
}

/// Benchmark palette image decoding (PNG bytes and raw pixels).
fn bench_palette(c: &mut Criterion) {
    let mut group = c.benchmark_group("palette");

    for size in [16usize, 32, 64] {
        let bytes = png::write_palette_to_memory(&identity(size)).expect("encode");
        let image = png::read_palette_from_memory(&bytes).expect("decode");
        group.throughput(Throughput::Elements((size * size * size) as u64));

        group.bench_with_input(BenchmarkId::new("decode_pixels", size), &image, |b, img| {
            b.iter(|| palette::decode(black_box(img), "bench.png").expect("palette"))
        });

        group.bench_with_input(BenchmarkId::new("read_png", size), &bytes, |b, data| {
            b.iter(|| png::read_palette_from_memory(black_box(data)).expect("png"))
        });
    }

    group.finish();
}

/// Benchmark cache hits and churn.
fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");
    let luts: Vec<Arc<LutModel>> = (0..32)
        .map(|i| Arc::new(LutModel::identity(format!("lut_{i}"), 17, ColorSpaceTag::Srgb).expect("lut")))
        .collect();

    let cache = LutCache::new(CacheConfig::default()).expect("cache");
    for lut in &luts {
        cache.put(lut.id(), Arc::clone(lut)).expect("put");
    }
    group.bench_function("get_hit", |b| {
        b.iter(|| cache.get(black_box("lut_7")))
    });

    let small = LutCache::new(CacheConfig::default().with_max_count(8)).expect("cache");
    group.bench_function("put_evict", |b| {
        let mut i = 0usize;
        b.iter(|| {
            let lut = &luts[i % luts.len()];
            small.put(lut.id(), Arc::clone(lut)).expect("put");
            i += 1;
        })
    });

    group.finish();
}

criterion_group!(benches, bench_cube_parse, bench_palette, bench_cache);
criterion_main!(benches);
