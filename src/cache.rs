//! Tile cache keyed by [`TileId`].
//!
//! [`TileCache`] owns the open [`TileReader`]s so that repeated queries
//! into the same tile reuse one mapping instead of re-opening the file.
//! Readers are handed out as `Arc`s, so an eviction never invalidates a
//! reader some thread is still sampling from; the mapping is released when
//! the last reference drops.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::sync::Cache;
use tracing::{debug, warn};

use crate::error::{ReliefError, Result};
use crate::tile::TileReader;
use crate::tile_id::TileId;

/// Statistics about cache usage.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of tiles currently in the cache.
    pub entries: u64,
    /// Number of lookups served from the cache.
    pub hits: u64,
    /// Number of tile file opens performed on behalf of lookups. A caller
    /// that joins another caller's in-flight load counts neither a hit nor
    /// a miss, so under concurrency `hits + misses` can undercount the
    /// total number of lookups.
    pub misses: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 to 1.0).
    ///
    /// Returns 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Statistics from a preload pass.
#[derive(Debug, Clone, Default)]
pub struct PreloadStats {
    /// Number of tiles opened and mapped.
    pub loaded: u64,
    /// Number of tiles that failed to open.
    pub failed: u64,
}

/// Cache of open tile mappings, keyed by [`TileId`].
///
/// Tile files are resolved as `<tile_dir>/<id>.hgt`. With a capacity the
/// cache evicts least-recently-used mappings; without one it keeps every
/// opened tile for its lifetime.
pub struct TileCache {
    /// Directory containing `.hgt` files.
    tile_dir: PathBuf,
    /// Open readers, shared with in-flight queries.
    tiles: Cache<TileId, Arc<TileReader>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TileCache {
    /// Create a cache over `tile_dir`.
    ///
    /// `capacity` of `None` keeps every opened tile; `Some(n)` bounds the
    /// cache to `n` mappings (~2.8MB each for SRTM3, ~25MB for SRTM1).
    pub fn new<P: AsRef<Path>>(tile_dir: P, capacity: Option<u64>) -> Self {
        let mut builder = Cache::builder();
        if let Some(cap) = capacity {
            builder = builder.max_capacity(cap);
        }
        Self {
            tile_dir: tile_dir.as_ref().to_path_buf(),
            tiles: builder.build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Fetch the reader for `id`, opening and mapping its file on first
    /// access.
    ///
    /// Concurrent misses for the same id share a single load; at most one
    /// mapping is ever created per tile id at a time.
    ///
    /// # Errors
    ///
    /// [`ReliefError::TileNotFound`] if the backing file is absent,
    /// [`ReliefError::TileCorrupt`] if it has an unsupported size.
    pub fn get(&self, id: TileId) -> Result<Arc<TileReader>> {
        if let Some(tile) = self.tiles.get(&id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(tile);
        }

        // The miss is counted inside the load closure, which runs exactly
        // once per open no matter how many callers are waiting on it.
        let path = self.tile_dir.join(id.file_name());
        self.tiles
            .try_get_with(id, || {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(tile = %id, path = %path.display(), "mapping tile");
                TileReader::open(&path).map(Arc::new)
            })
            .map_err(unshare)
    }

    /// Tile ids for every canonically named `.hgt` file in the tile
    /// directory, sorted. Files whose names deviate from the convention
    /// (wrong case, missing extension) are skipped, since [`Self::get`]
    /// could not resolve them. Unreadable directories yield an empty list.
    pub fn scan(&self) -> Vec<TileId> {
        let mut ids = Vec::new();

        let entries = match std::fs::read_dir(&self.tile_dir) {
            Ok(entries) => entries,
            Err(_) => return ids,
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(id) = TileId::from_file_name(&name) {
                // Only canonically named files are listed: `get` probes
                // `<tile_dir>/<id>.hgt`, so `n35e138.hgt` would scan but
                // never open on a case-sensitive filesystem.
                if name == id.file_name() {
                    ids.push(id);
                }
            }
        }

        ids.sort();
        ids.dedup();
        ids
    }

    /// Open and map every tile found in the tile directory.
    ///
    /// Failures are logged and counted, never fatal: a corrupt tile in the
    /// directory must not prevent the rest from loading.
    pub fn preload(&self) -> PreloadStats {
        let mut stats = PreloadStats::default();

        for id in self.scan() {
            match self.get(id) {
                Ok(_) => stats.loaded += 1,
                Err(e) => {
                    warn!(tile = %id, error = %e, "preload: failed to map tile");
                    stats.failed += 1;
                }
            }
        }

        debug!(loaded = stats.loaded, failed = stats.failed, "preload finished");
        stats
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.tiles.entry_count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Get the tile directory path.
    pub fn tile_dir(&self) -> &Path {
        &self.tile_dir
    }

    /// Maximum number of cached mappings, `None` when unbounded.
    pub fn capacity(&self) -> Option<u64> {
        self.tiles.policy().max_capacity()
    }

    /// Drop a single tile's mapping from the cache.
    ///
    /// Useful if a tile file has been replaced on disk.
    pub fn invalidate(&self, id: TileId) {
        self.tiles.invalidate(&id);
    }

    /// Drop all cached mappings.
    pub fn clear(&self) {
        self.tiles.invalidate_all();
    }
}

/// The cache shares a failed load's error between every caller waiting on
/// it; rebuild an owned copy when this caller is not the only holder.
fn unshare(err: Arc<ReliefError>) -> ReliefError {
    match Arc::try_unwrap(err) {
        Ok(e) => e,
        Err(e) => match &*e {
            ReliefError::Io(io) => {
                ReliefError::Io(std::io::Error::new(io.kind(), io.to_string()))
            }
            ReliefError::OutOfRange { lat, lon } => ReliefError::OutOfRange {
                lat: *lat,
                lon: *lon,
            },
            ReliefError::TileNotFound { path } => ReliefError::TileNotFound {
                path: path.clone(),
            },
            ReliefError::TileCorrupt { path, size } => ReliefError::TileCorrupt {
                path: path.clone(),
                size: *size,
            },
            ReliefError::IndexOutOfBounds { row, col, samples } => {
                ReliefError::IndexOutOfBounds {
                    row: *row,
                    col: *col,
                    samples: *samples,
                }
            }
        },
    }
}
