//! Example comparing nearest-sample and interpolated elevation queries.
//!
//! Run with: cargo run --example lookup -- /path/to/hgt/files [lat] [lon]

use std::env;

use relief::{ElevationResolver, ReliefError};

fn main() -> Result<(), ReliefError> {
    let mut args = env::args().skip(1);
    let tile_dir = args.next().unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example lookup -- /path/to/hgt/files [lat] [lon]");
        std::process::exit(1);
    });
    let lat: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(50.7);
    let lon: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(7.1);

    let resolver = ElevationResolver::new(&tile_dir);

    println!("Elevation at ({}, {}):", lat, lon);
    println!("{:-<50}", "");

    match resolver.nearest_elevation(lat, lon)? {
        Some(elevation) => println!("Nearest sample: {}m", elevation),
        None => println!("Nearest sample: void (no data)"),
    }

    match resolver.elevation(lat, lon)? {
        Some(elevation) => println!("Interpolated:   {:.2}m", elevation),
        None => println!("Interpolated:   void (no data)"),
    }

    let stats = resolver.cache().stats();
    println!(
        "cache: {} hits, {} misses ({:.0}% hit rate)",
        stats.hits,
        stats.misses,
        stats.hit_rate() * 100.0
    );

    Ok(())
}
