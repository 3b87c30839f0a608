//! # relief — SRTM elevation lookup
//!
//! Point elevation lookup from SRTM (Shuttle Radar Topography Mission)
//! `.hgt` tiles, reading tile data through memory mappings and bilinearly
//! interpolating between grid samples.
//!
//! ## Features
//!
//! - **Memory-mapped**: tiles are mapped, not loaded; a query touches four
//!   samples, not a 25MB file
//! - **Cached**: open mappings are reused across queries, with optional
//!   LRU-style bounding
//! - **Automatic detection**: SRTM1 vs SRTM3 is derived from file size
//! - **Explicit no-data**: void samples and missing tiles answer `None`,
//!   never a silent zero
//!
//! ## Quick Start
//!
//! ```ignore
//! use relief::ElevationResolver;
//!
//! let resolver = ElevationResolver::new("/data/srtm");
//!
//! match resolver.elevation(50.7, 7.1)? {
//!     Some(meters) => println!("elevation: {:.1}m", meters),
//!     None => println!("no data here"),
//! }
//! # Ok::<(), relief::ReliefError>(())
//! ```
//!
//! ## SRTM Data Format
//!
//! Each tile covers 1°×1° and holds a square grid of big-endian signed
//! 16-bit elevation samples, row-major from the north edge:
//!
//! - **SRTM1**: 3601×3601 samples, 1 arc-second (~30m) resolution
//! - **SRTM3**: 1201×1201 samples, 3 arc-second (~90m) resolution
//!
//! The value -32768 marks void cells (no measurement). Files are named
//! after their southwest corner, e.g. `N50E007.hgt`.
//!
//! ## Data Sources
//!
//! Download SRTM data from:
//! - <https://dwtkns.com/srtm30m/>
//! - <https://earthexplorer.usgs.gov/>

pub mod cache;
pub mod error;
pub mod resolver;
pub mod tile;
pub mod tile_id;

// Re-export main types at crate root for convenience
pub use cache::{CacheStats, PreloadStats, TileCache};
pub use error::{ReliefError, Result};
pub use resolver::{
    ElevationResolver, ElevationResolverBuilder, MissingTilePolicy, VoidPolicy,
};
pub use tile::{Resolution, TileReader, VOID_VALUE};
pub use tile_id::{GridPosition, TileId};
