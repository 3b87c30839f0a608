use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::TempDir;

use relief::ElevationResolver;

const SRTM3_SAMPLES: usize = 1201;
const SRTM3_SIZE: usize = SRTM3_SAMPLES * SRTM3_SAMPLES * 2;

/// Create a synthetic SRTM3 tile with a simple elevation gradient.
fn create_tile(dir: &std::path::Path, name: &str) {
    let mut data = vec![0u8; SRTM3_SIZE];
    for row in 0..SRTM3_SAMPLES {
        for col in 0..SRTM3_SAMPLES {
            let elev = ((row + col) % 4000) as i16;
            let offset = (row * SRTM3_SAMPLES + col) * 2;
            data[offset..offset + 2].copy_from_slice(&elev.to_be_bytes());
        }
    }
    let path = dir.join(name);
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(&data).unwrap();
}

fn bench_nearest(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    create_tile(tmp.path(), "N35E138.hgt");
    let resolver = ElevationResolver::new(tmp.path());

    // Warm the cache
    let _ = resolver.nearest_elevation(35.5, 138.5);

    c.bench_function("nearest_cached", |b| {
        b.iter(|| {
            black_box(
                resolver
                    .nearest_elevation(black_box(35.3606), black_box(138.7274))
                    .unwrap(),
            );
        });
    });
}

fn bench_interpolated(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    create_tile(tmp.path(), "N35E138.hgt");
    let resolver = ElevationResolver::new(tmp.path());

    // Warm the cache
    let _ = resolver.elevation(35.5, 138.5);

    c.bench_function("interpolated_cached", |b| {
        b.iter(|| {
            black_box(
                resolver
                    .elevation(black_box(35.3606), black_box(138.7274))
                    .unwrap(),
            );
        });
    });
}

fn bench_cold_open(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    create_tile(tmp.path(), "N35E138.hgt");

    c.bench_function("cold_open_and_query", |b| {
        b.iter(|| {
            let resolver = ElevationResolver::new(tmp.path());
            black_box(
                resolver
                    .elevation(black_box(35.3606), black_box(138.7274))
                    .unwrap(),
            );
        });
    });
}

criterion_group!(benches, bench_nearest, bench_interpolated, bench_cold_open);
criterion_main!(benches);
