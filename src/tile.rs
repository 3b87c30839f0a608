//! Memory-mapped tile reading.
//!
//! [`TileReader`] maps one `.hgt` file read-only and serves random-access
//! sample reads without copying the file into process memory. The grid side
//! (1201 for SRTM3, 3601 for SRTM1) is derived from the file size at open
//! time; any other size is rejected as corrupt.

use std::fs::File;
use std::io;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{ReliefError, Result};

/// Number of samples per row/column for SRTM1 (1 arc-second, ~30m)
const SRTM1_SAMPLES: usize = 3601;

/// Number of samples per row/column for SRTM3 (3 arc-second, ~90m)
const SRTM3_SAMPLES: usize = 1201;

/// File size for SRTM1: 3601 × 3601 × 2 bytes
const SRTM1_SIZE: usize = SRTM1_SAMPLES * SRTM1_SAMPLES * 2; // 25,934,402 bytes

/// File size for SRTM3: 1201 × 1201 × 2 bytes
const SRTM3_SIZE: usize = SRTM3_SAMPLES * SRTM3_SAMPLES * 2; // 2,884,802 bytes

/// Sentinel sample value indicating void (no data).
pub const VOID_VALUE: i16 = -32768;

/// Resolution variant of a tile, derived from its file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// SRTM1: 1 arc-second (~30m) resolution
    Srtm1,
    /// SRTM3: 3 arc-second (~90m) resolution
    Srtm3,
}

impl Resolution {
    /// Returns the number of samples per row/column for this resolution.
    pub fn samples(&self) -> usize {
        match self {
            Resolution::Srtm1 => SRTM1_SAMPLES,
            Resolution::Srtm3 => SRTM3_SAMPLES,
        }
    }

    /// Returns the approximate ground resolution in meters.
    pub fn meters(&self) -> f64 {
        match self {
            Resolution::Srtm1 => 30.0,
            Resolution::Srtm3 => 90.0,
        }
    }
}

/// A memory-mapped SRTM tile serving raw grid samples.
///
/// The reader owns its mapping for its whole lifetime; dropping the reader
/// releases the mapping. The mapping is never written to, so any number of
/// threads may read samples concurrently.
pub struct TileReader {
    /// Memory-mapped file data
    data: Mmap,
    /// Number of samples per row/column (1201 or 3601)
    samples: usize,
    /// Resolution variant
    resolution: Resolution,
}

impl TileReader {
    /// Open a tile file and map it into memory.
    ///
    /// # Errors
    ///
    /// - [`ReliefError::TileNotFound`] if the file does not exist
    /// - [`ReliefError::TileCorrupt`] if the byte length matches neither
    ///   the SRTM1 nor the SRTM3 grid
    /// - [`ReliefError::Io`] for any other open or map failure
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ReliefError::TileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ReliefError::Io(e)
            }
        })?;

        // SAFETY: the mapping is read-only and private to this reader.
        // Tile files are treated as immutable while the process runs.
        let data = unsafe { Mmap::map(&file)? };

        let (samples, resolution) = match data.len() {
            SRTM1_SIZE => (SRTM1_SAMPLES, Resolution::Srtm1),
            SRTM3_SIZE => (SRTM3_SAMPLES, Resolution::Srtm3),
            size => {
                return Err(ReliefError::TileCorrupt {
                    path: path.to_path_buf(),
                    size: size as u64,
                })
            }
        };

        Ok(Self {
            data,
            samples,
            resolution,
        })
    }

    /// Raw sample at `(row, col)`; row 0 is the tile's north edge.
    ///
    /// This is a pure memory access into the mapping, no per-read syscall.
    /// The value [`VOID_VALUE`] marks a cell with no data.
    ///
    /// # Errors
    ///
    /// Returns [`ReliefError::IndexOutOfBounds`] if `row` or `col` is not
    /// within `[0, samples)`.
    pub fn sample(&self, row: usize, col: usize) -> Result<i16> {
        if row >= self.samples || col >= self.samples {
            return Err(ReliefError::IndexOutOfBounds {
                row,
                col,
                samples: self.samples,
            });
        }

        // 2 bytes per sample, row-major, big-endian
        let offset = (row * self.samples + col) * 2;
        Ok(i16::from_be_bytes([self.data[offset], self.data[offset + 1]]))
    }

    /// Returns the number of samples per row/column.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Returns the resolution variant of this tile.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
}
