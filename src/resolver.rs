//! Elevation queries over cached tiles.
//!
//! [`ElevationResolver`] is the front door of the crate: it turns a
//! coordinate into a tile id, fetches the tile through the [`TileCache`],
//! reads the four surrounding grid samples, and bilinearly interpolates
//! between them. Void samples and missing tile files are handled by
//! explicit, configurable policies instead of silent placeholder values.
//!
//! # Example
//!
//! ```ignore
//! use relief::ElevationResolver;
//!
//! let resolver = ElevationResolver::builder("/data/srtm")
//!     .cache_capacity(100)
//!     .build();
//!
//! match resolver.elevation(50.7, 7.1)? {
//!     Some(meters) => println!("{:.1}m", meters),
//!     None => println!("no data"),
//! }
//! # Ok::<(), relief::ReliefError>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::cache::TileCache;
use crate::error::{ReliefError, Result};
use crate::tile::{TileReader, VOID_VALUE};
use crate::tile_id::{GridPosition, TileId};

/// How a missing tile file is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingTilePolicy {
    /// A missing tile means "no data here": the query answers `None`.
    #[default]
    Lenient,
    /// A missing tile is an error: `TileNotFound` propagates to the caller.
    Strict,
}

/// How interpolation treats void corner samples.
///
/// When only some of the four surrounding samples are void, a pure
/// bilinear result is undefined; the policy picks the fallback. All four
/// void always answers `None`, as does a query pinned exactly on a void
/// sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoidPolicy {
    /// Answer with the valid corner carrying the largest bilinear weight,
    /// i.e. the valid sample closest to the query point.
    #[default]
    NearestValid,
    /// Renormalize the bilinear weights over the valid corners and average.
    WeightedAverage,
}

/// Elevation lookup over a directory of `.hgt` tiles.
///
/// Construct with [`ElevationResolver::new`] for defaults (unbounded
/// cache, lenient missing-tile handling, nearest-valid void fallback) or
/// [`ElevationResolver::builder`] for configuration.
pub struct ElevationResolver {
    cache: TileCache,
    missing: MissingTilePolicy,
    void: VoidPolicy,
}

impl ElevationResolver {
    /// Create a resolver over `tile_dir` with default configuration.
    pub fn new<P: AsRef<Path>>(tile_dir: P) -> Self {
        Self::builder(tile_dir).build()
    }

    /// Create a builder for more configuration options.
    pub fn builder<P: AsRef<Path>>(tile_dir: P) -> ElevationResolverBuilder {
        ElevationResolverBuilder::new(tile_dir)
    }

    /// Bilinearly interpolated elevation in meters at `(lat, lon)`.
    ///
    /// Interpolates between the four grid samples surrounding the point,
    /// which never wraps into a neighboring tile; at tile edges the cell
    /// degenerates to the edge samples. A point exactly on a grid sample
    /// returns that sample's value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(meters))` — interpolated elevation
    /// - `Ok(None)` — no data: void samples at this location, or (under
    ///   [`MissingTilePolicy::Lenient`]) no tile file covers it
    ///
    /// # Errors
    ///
    /// [`ReliefError::OutOfRange`] for coordinates outside the WGS84
    /// domain, [`ReliefError::TileCorrupt`] for malformed tile files, and
    /// [`ReliefError::TileNotFound`] under [`MissingTilePolicy::Strict`].
    pub fn elevation(&self, lat: f64, lon: f64) -> Result<Option<f64>> {
        let Some((tile, id)) = self.tile_for(lat, lon)? else {
            return Ok(None);
        };

        let pos = GridPosition::locate(id, lat, lon, tile.samples());
        self.interpolate(&tile, pos)
    }

    /// Elevation of the single grid sample closest to `(lat, lon)`.
    ///
    /// No interpolation; answers `None` on a void sample. Same error
    /// behavior as [`Self::elevation`].
    pub fn nearest_elevation(&self, lat: f64, lon: f64) -> Result<Option<i16>> {
        let Some((tile, id)) = self.tile_for(lat, lon)? else {
            return Ok(None);
        };

        let pos = GridPosition::locate(id, lat, lon, tile.samples());
        let last = tile.samples() - 1;
        let row = if pos.row_frac < 0.5 { pos.row } else { (pos.row + 1).min(last) };
        let col = if pos.col_frac < 0.5 { pos.col } else { (pos.col + 1).min(last) };

        let value = tile.sample(row, col)?;
        Ok(if value == VOID_VALUE { None } else { Some(value) })
    }

    /// The tile cache backing this resolver.
    pub fn cache(&self) -> &TileCache {
        &self.cache
    }

    /// Resolve the tile covering `(lat, lon)`.
    ///
    /// A coordinate on an exact degree boundary lies in up to four tiles.
    /// The floor-derived tile is queried first; when its file is absent,
    /// the south/west neighbors that also contain the point are tried
    /// before giving up, so an edge query still resolves when only the
    /// neighboring file is on disk.
    fn tile_for(&self, lat: f64, lon: f64) -> Result<Option<(Arc<TileReader>, TileId)>> {
        let primary = TileId::for_coords(lat, lon)?;

        let on_south_edge = lat == f64::from(primary.lat_band());
        let on_west_edge = lon == f64::from(primary.lon_band());

        let mut candidates = [Some(primary), None, None, None];
        if on_south_edge {
            candidates[1] = primary.south();
        }
        if on_west_edge {
            candidates[2] = primary.west();
        }
        if on_south_edge && on_west_edge {
            candidates[3] = primary.south().and_then(|t| t.west());
        }

        for id in candidates.into_iter().flatten() {
            match self.cache.get(id) {
                Ok(tile) => return Ok(Some((tile, id))),
                Err(ReliefError::TileNotFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        match self.missing {
            MissingTilePolicy::Lenient => {
                debug!(tile = %primary, "no tile file, answering no-data");
                Ok(None)
            }
            MissingTilePolicy::Strict => Err(ReliefError::TileNotFound {
                path: self.cache.tile_dir().join(primary.file_name()),
            }),
        }
    }

    /// Bilinear interpolation over the cell at `pos`, with void fallback.
    fn interpolate(&self, tile: &TileReader, pos: GridPosition) -> Result<Option<f64>> {
        let last = tile.samples() - 1;
        let row1 = (pos.row + 1).min(last);
        let col1 = (pos.col + 1).min(last);

        // Corner samples with their bilinear weights; weights sum to 1.
        let corners = [
            (
                tile.sample(pos.row, pos.col)?,
                (1.0 - pos.row_frac) * (1.0 - pos.col_frac),
            ),
            (tile.sample(pos.row, col1)?, (1.0 - pos.row_frac) * pos.col_frac),
            (tile.sample(row1, pos.col)?, pos.row_frac * (1.0 - pos.col_frac)),
            (tile.sample(row1, col1)?, pos.row_frac * pos.col_frac),
        ];

        if corners.iter().all(|&(s, _)| s == VOID_VALUE) {
            return Ok(None);
        }
        if corners.iter().any(|&(s, _)| s == VOID_VALUE) {
            return Ok(self.fill_voids(&corners));
        }

        let value = corners.iter().map(|&(s, w)| f64::from(s) * w).sum();
        Ok(Some(value))
    }

    /// Fallback when some (not all) corner samples are void.
    fn fill_voids(&self, corners: &[(i16, f64); 4]) -> Option<f64> {
        match self.void {
            VoidPolicy::NearestValid => corners
                .iter()
                .filter(|&&(s, _)| s != VOID_VALUE)
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .filter(|&&(_, w)| w > 0.0)
                .map(|&(s, _)| f64::from(s)),
            VoidPolicy::WeightedAverage => {
                let (sum, weight) = corners
                    .iter()
                    .filter(|&&(s, _)| s != VOID_VALUE)
                    .fold((0.0, 0.0), |(sum, weight), &(s, w)| {
                        (sum + f64::from(s) * w, weight + w)
                    });
                if weight > 0.0 {
                    Some(sum / weight)
                } else {
                    None
                }
            }
        }
    }
}

/// Builder for [`ElevationResolver`].
///
/// # Example
///
/// ```ignore
/// use relief::{ElevationResolver, MissingTilePolicy, VoidPolicy};
///
/// let resolver = ElevationResolver::builder("/data/srtm")
///     .cache_capacity(50)
///     .preload(true)
///     .missing_tile(MissingTilePolicy::Strict)
///     .void_policy(VoidPolicy::WeightedAverage)
///     .build();
/// ```
pub struct ElevationResolverBuilder {
    tile_dir: PathBuf,
    capacity: Option<u64>,
    preload: bool,
    missing: MissingTilePolicy,
    void: VoidPolicy,
}

impl ElevationResolverBuilder {
    /// Create a new builder over the given tile directory.
    pub fn new<P: AsRef<Path>>(tile_dir: P) -> Self {
        Self {
            tile_dir: tile_dir.as_ref().to_path_buf(),
            capacity: None,
            preload: false,
            missing: MissingTilePolicy::default(),
            void: VoidPolicy::default(),
        }
    }

    /// Bound the tile cache to at most `capacity` open mappings.
    ///
    /// Unbounded by default.
    pub fn cache_capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Eagerly open and map every tile found in the tile directory at
    /// build time, instead of lazily on first query.
    ///
    /// Tiles that fail to load are logged and skipped.
    pub fn preload(mut self, preload: bool) -> Self {
        self.preload = preload;
        self
    }

    /// Set how missing tile files are reported. Lenient by default.
    pub fn missing_tile(mut self, policy: MissingTilePolicy) -> Self {
        self.missing = policy;
        self
    }

    /// Set the fallback for partially-void interpolation cells.
    /// Nearest-valid by default.
    pub fn void_policy(mut self, policy: VoidPolicy) -> Self {
        self.void = policy;
        self
    }

    /// Build the [`ElevationResolver`].
    pub fn build(self) -> ElevationResolver {
        let cache = TileCache::new(&self.tile_dir, self.capacity);
        if self.preload {
            let stats = cache.preload();
            debug!(
                loaded = stats.loaded,
                failed = stats.failed,
                "eager preload at construction"
            );
        }
        ElevationResolver {
            cache,
            missing: self.missing,
            void: self.void,
        }
    }
}
