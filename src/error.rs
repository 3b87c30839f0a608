//! Error types for the relief library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when looking up elevation data.
#[derive(Error, Debug)]
pub enum ReliefError {
    /// IO error when opening or mapping a tile file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Coordinates are outside the WGS84 degree domain.
    #[error("coordinates out of range: lat={lat}, lon={lon} (valid: lat ±90°, lon ±180°)")]
    OutOfRange { lat: f64, lon: f64 },

    /// The required `.hgt` file was not found.
    #[error("tile not found: {path}")]
    TileNotFound { path: PathBuf },

    /// File size matches neither the SRTM1 nor the SRTM3 grid.
    #[error(
        "corrupt tile {path}: {size} bytes (expected 25934402 for SRTM1 or 2884802 for SRTM3)"
    )]
    TileCorrupt { path: PathBuf, size: u64 },

    /// Sample index outside the tile grid. Indicates a bug in the caller,
    /// not a data problem.
    #[error("sample index out of bounds: row={row}, col={col} for a {samples}×{samples} grid")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        samples: usize,
    },
}

/// Result type alias using [`ReliefError`].
pub type Result<T> = std::result::Result<T, ReliefError>;
