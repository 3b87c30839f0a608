//! Tile identification and grid positioning.
//!
//! An SRTM tile covers one degree of latitude by one degree of longitude
//! and is named after its **southwest corner**: `N50E007.hgt` covers
//! 50°N–51°N, 7°E–8°E.
//!
//! # Filename Format
//!
//! `{N|S}{lat}{E|W}{lon}.hgt`
//!
//! - Latitude: 2 digits with N/S prefix (e.g., N35, S12)
//! - Longitude: 3 digits with E/W prefix (e.g., E138, W077)
//!
//! The equator band is encoded `N00` and the prime-meridian band `E000`;
//! `S00`/`W000` never appear in generated names but are accepted when
//! parsing.

use std::fmt;

use crate::error::{ReliefError, Result};

/// Key of a one-degree tile, identified by its southwest corner.
///
/// Bands are signed integer degrees: latitude in `[-90, 89]`, longitude in
/// `[-180, 179]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    lat_band: i32,
    lon_band: i32,
}

impl TileId {
    /// Create a tile id from integer bands, or `None` if either band is
    /// off the grid.
    pub fn new(lat_band: i32, lon_band: i32) -> Option<Self> {
        if (-90..=89).contains(&lat_band) && (-180..=179).contains(&lon_band) {
            Some(Self { lat_band, lon_band })
        } else {
            None
        }
    }

    /// Tile containing the given coordinate.
    ///
    /// Bands are derived by flooring. The north and east domain edges
    /// (lat 90°, lon 180°) belong to the last band in their direction.
    ///
    /// # Errors
    ///
    /// Returns [`ReliefError::OutOfRange`] if the coordinate is outside
    /// [-90, 90] × [-180, 180].
    ///
    /// # Examples
    ///
    /// ```
    /// use relief::TileId;
    ///
    /// let id = TileId::for_coords(50.7, 7.1)?;
    /// assert_eq!(id.file_name(), "N50E007.hgt");
    ///
    /// let id = TileId::for_coords(-12.3, -77.1)?;
    /// assert_eq!(id.file_name(), "S13W078.hgt");
    /// # Ok::<(), relief::ReliefError>(())
    /// ```
    pub fn for_coords(lat: f64, lon: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ReliefError::OutOfRange { lat, lon });
        }

        let lat_band = (lat.floor() as i32).min(89);
        let lon_band = (lon.floor() as i32).min(179);
        Ok(Self { lat_band, lon_band })
    }

    /// Latitude of the southwest corner (integer degrees).
    pub fn lat_band(&self) -> i32 {
        self.lat_band
    }

    /// Longitude of the southwest corner (integer degrees).
    pub fn lon_band(&self) -> i32 {
        self.lon_band
    }

    /// Southern neighbor, if it stays on the grid.
    pub(crate) fn south(&self) -> Option<Self> {
        Self::new(self.lat_band - 1, self.lon_band)
    }

    /// Western neighbor, if it stays on the grid.
    pub(crate) fn west(&self) -> Option<Self> {
        Self::new(self.lat_band, self.lon_band - 1)
    }

    /// Conventional filename for this tile (e.g., `N50E007.hgt`).
    pub fn file_name(&self) -> String {
        format!("{}.hgt", self)
    }

    /// Parse a tile id from an `.hgt` filename.
    ///
    /// The filename may carry a leading path and the `.hgt` extension is
    /// optional; hemisphere letters are case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use relief::TileId;
    ///
    /// assert!(TileId::from_file_name("N35E138.hgt").is_some());
    /// assert!(TileId::from_file_name("/data/srtm/s12w077.hgt").is_some());
    /// assert!(TileId::from_file_name("invalid").is_none());
    /// ```
    pub fn from_file_name(name: &str) -> Option<Self> {
        // Extract just the filename if a path is given
        let name = name
            .rsplit('/')
            .next()
            .unwrap_or(name)
            .rsplit('\\')
            .next()
            .unwrap_or(name);
        let name = name.strip_suffix(".hgt").unwrap_or(name);

        // Must be exactly 7 characters: N00E000
        if name.len() != 7 || !name.is_ascii() {
            return None;
        }

        let lat_sign = match name.as_bytes()[0] {
            b'N' | b'n' => 1,
            b'S' | b's' => -1,
            _ => return None,
        };
        let lat: i32 = name[1..3].parse().ok()?;

        let lon_sign = match name.as_bytes()[3] {
            b'E' | b'e' => 1,
            b'W' | b'w' => -1,
            _ => return None,
        };
        let lon: i32 = name[4..7].parse().ok()?;

        Self::new(lat * lat_sign, lon * lon_sign)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat_band >= 0 { 'N' } else { 'S' };
        let ew = if self.lon_band >= 0 { 'E' } else { 'W' };
        write!(
            f,
            "{}{:02}{}{:03}",
            ns,
            self.lat_band.abs(),
            ew,
            self.lon_band.abs()
        )
    }
}

/// Position of a coordinate within a tile's sample grid.
///
/// `row`/`col` index the northwest sample of the cell the coordinate falls
/// in; `row_frac`/`col_frac` are the remainders toward the next row and
/// column, both in `[0, 1]`. Row 0 is the tile's **north** edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
    pub row_frac: f64,
    pub col_frac: f64,
}

impl GridPosition {
    /// Locate `(lat, lon)` within `tile`'s grid of side `samples`.
    ///
    /// Coordinates exactly on the last grid line anchor on the previous
    /// cell with a remainder of 1.0, so interpolation degenerates to the
    /// edge sample.
    pub fn locate(tile: TileId, lat: f64, lon: f64, samples: usize) -> Self {
        let span = (samples - 1) as f64;
        let row_pos = ((f64::from(tile.lat_band()) + 1.0 - lat) * span).clamp(0.0, span);
        let col_pos = ((lon - f64::from(tile.lon_band())) * span).clamp(0.0, span);

        let (row, row_frac) = split_index(row_pos, samples);
        let (col, col_frac) = split_index(col_pos, samples);
        Self {
            row,
            col,
            row_frac,
            col_frac,
        }
    }
}

/// Split a grid-line position into a base index and fractional remainder,
/// anchoring the last grid line on the previous cell.
fn split_index(pos: f64, samples: usize) -> (usize, f64) {
    let base = pos.floor() as usize;
    if base >= samples - 1 {
        (samples - 2, 1.0)
    } else {
        (base, pos - base as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_coords_positive() {
        assert_eq!(TileId::for_coords(35.5, 138.7).unwrap().file_name(), "N35E138.hgt");
        assert_eq!(TileId::for_coords(0.5, 0.5).unwrap().file_name(), "N00E000.hgt");
        assert_eq!(TileId::for_coords(1.0, 1.0).unwrap().file_name(), "N01E001.hgt");
        assert_eq!(TileId::for_coords(59.9, 179.9).unwrap().file_name(), "N59E179.hgt");
    }

    #[test]
    fn test_for_coords_negative() {
        // floor(-12.3) = -13, floor(-77.1) = -78
        assert_eq!(TileId::for_coords(-12.3, -77.1).unwrap().file_name(), "S13W078.hgt");
        // floor(-0.5) = -1
        assert_eq!(TileId::for_coords(-0.5, -0.5).unwrap().file_name(), "S01W001.hgt");
        assert_eq!(TileId::for_coords(-1.0, -1.0).unwrap().file_name(), "S01W001.hgt");
        assert_eq!(TileId::for_coords(-89.9, -179.9).unwrap().file_name(), "S90W180.hgt");
    }

    #[test]
    fn test_for_coords_equator_and_meridian() {
        assert_eq!(TileId::for_coords(0.0, 0.0).unwrap().file_name(), "N00E000.hgt");
        assert_eq!(TileId::for_coords(0.1, 0.1).unwrap().file_name(), "N00E000.hgt");
        // floor(-0.1) = -1
        assert_eq!(TileId::for_coords(-0.1, -0.1).unwrap().file_name(), "S01W001.hgt");
    }

    #[test]
    fn test_for_coords_domain_edges() {
        // 90°N and 180°E clamp into the last band
        let id = TileId::for_coords(90.0, 180.0).unwrap();
        assert_eq!(id.lat_band(), 89);
        assert_eq!(id.lon_band(), 179);

        let id = TileId::for_coords(-90.0, -180.0).unwrap();
        assert_eq!(id.lat_band(), -90);
        assert_eq!(id.lon_band(), -180);
    }

    #[test]
    fn test_for_coords_out_of_range() {
        assert!(matches!(
            TileId::for_coords(90.1, 0.0),
            Err(ReliefError::OutOfRange { .. })
        ));
        assert!(matches!(
            TileId::for_coords(-90.1, 0.0),
            Err(ReliefError::OutOfRange { .. })
        ));
        assert!(matches!(
            TileId::for_coords(0.0, 180.1),
            Err(ReliefError::OutOfRange { .. })
        ));
        assert!(matches!(
            TileId::for_coords(0.0, -180.1),
            Err(ReliefError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_for_coords_consistent_within_cell() {
        let id = TileId::for_coords(35.5, 138.5).unwrap();
        assert_eq!(id, TileId::for_coords(35.5 + 1e-9, 138.5 + 1e-9).unwrap());
        assert_eq!(id, TileId::for_coords(35.0, 138.0).unwrap());

        // One band apart across a degree boundary
        let next = TileId::for_coords(36.0, 138.5).unwrap();
        assert_eq!(next.lat_band(), id.lat_band() + 1);
    }

    #[test]
    fn test_parse_file_name() {
        assert_eq!(TileId::from_file_name("N35E138.hgt"), TileId::new(35, 138));
        assert_eq!(TileId::from_file_name("S12W077.hgt"), TileId::new(-12, -77));
        assert_eq!(TileId::from_file_name("N00E000.hgt"), TileId::new(0, 0));
        assert_eq!(TileId::from_file_name("S00W000.hgt"), TileId::new(0, 0));
        assert_eq!(TileId::from_file_name("N35E138"), TileId::new(35, 138));
    }

    #[test]
    fn test_parse_file_name_with_path() {
        assert_eq!(
            TileId::from_file_name("/data/srtm/N35E138.hgt"),
            TileId::new(35, 138)
        );
        assert_eq!(
            TileId::from_file_name("C:\\data\\S12W077.hgt"),
            TileId::new(-12, -77)
        );
    }

    #[test]
    fn test_parse_file_name_case_insensitive() {
        assert_eq!(TileId::from_file_name("n35e138.hgt"), TileId::new(35, 138));
        assert_eq!(TileId::from_file_name("s12w077.hgt"), TileId::new(-12, -77));
    }

    #[test]
    fn test_parse_file_name_invalid() {
        assert_eq!(TileId::from_file_name("invalid"), None);
        assert_eq!(TileId::from_file_name("N35E13.hgt"), None); // too short
        assert_eq!(TileId::from_file_name("X35E138.hgt"), None); // bad prefix
        assert_eq!(TileId::from_file_name("N35X138.hgt"), None); // bad prefix
        assert_eq!(TileId::from_file_name("NAAE138.hgt"), None); // non-numeric
        assert_eq!(TileId::from_file_name("N95E000.hgt"), None); // off the grid
        assert_eq!(TileId::from_file_name("N00E190.hgt"), None); // off the grid
    }

    #[test]
    fn test_file_name_roundtrip() {
        let coords = [
            (35.5, 138.7),
            (-12.3, -77.1),
            (0.5, -0.5),
            (-0.5, 0.5),
            (59.9, 179.9),
            (-59.9, -179.9),
        ];

        for (lat, lon) in coords {
            let id = TileId::for_coords(lat, lon).unwrap();
            assert_eq!(TileId::from_file_name(&id.file_name()), Some(id));
        }
    }

    #[test]
    fn test_locate_exact_sample() {
        let id = TileId::new(35, 138).unwrap();

        // Southwest corner: bottom row, first column
        let pos = GridPosition::locate(id, 35.0, 138.0, 1201);
        assert_eq!(pos.row, 1199);
        assert_eq!(pos.row_frac, 1.0);
        assert_eq!(pos.col, 0);
        assert_eq!(pos.col_frac, 0.0);

        // Center sample of the grid
        let pos = GridPosition::locate(id, 35.5, 138.5, 1201);
        assert_eq!(pos.row, 600);
        assert_eq!(pos.row_frac, 0.0);
        assert_eq!(pos.col, 600);
        assert_eq!(pos.col_frac, 0.0);
    }

    #[test]
    fn test_locate_north_and_east_edges() {
        let id = TileId::new(35, 138).unwrap();

        // North edge is row 0
        let pos = GridPosition::locate(id, 36.0, 138.0, 1201);
        assert_eq!(pos.row, 0);
        assert_eq!(pos.row_frac, 0.0);

        // East edge anchors on the second-to-last column with remainder 1.0
        let pos = GridPosition::locate(id, 35.5, 139.0, 1201);
        assert_eq!(pos.col, 1199);
        assert_eq!(pos.col_frac, 1.0);
    }

    #[test]
    fn test_locate_fractional_cell() {
        let id = TileId::new(35, 138).unwrap();

        // Halfway between grid lines 600 and 601 in both directions
        let lat = 36.0 - 600.5 / 1200.0;
        let lon = 138.0 + 600.5 / 1200.0;
        let pos = GridPosition::locate(id, lat, lon, 1201);
        assert_eq!(pos.row, 600);
        assert_eq!(pos.col, 600);
        assert!((pos.row_frac - 0.5).abs() < 1e-9);
        assert!((pos.col_frac - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        assert_eq!(TileId::new(50, 7).unwrap().to_string(), "N50E007");
        assert_eq!(TileId::new(-13, -78).unwrap().to_string(), "S13W078");
        assert_eq!(TileId::new(0, 0).unwrap().to_string(), "N00E000");
    }
}
