use std::{fmt, ops::RangeInclusive, str::FromStr};

use crate::{
    coordinate::Coordinate,
    zoom::{InvalidZoom, Zoom},
};

pub(crate) fn total_tiles(zoom: Zoom) -> u32 {
    1u32 << zoom.get()
}

/// Identifies the tile in the tile grid.
///
/// The canonical identity is `"zoom/column/row"`, which doubles as the
/// retrieval path on the tile servers.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct TileId {
    zoom: Zoom,
    column: u32,
    row: u32,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseTileIdError {
    #[error("expected \"zoom/column/row\", got {0:?}")]
    Format(String),
    #[error(transparent)]
    Zoom(#[from] InvalidZoom),
}

impl TileId {
    /// The tile covering the whole world.
    pub const ZERO: Self = TileId {
        zoom: Zoom::MIN,
        column: 0,
        row: 0,
    };

    pub fn new(zoom: Zoom, column: u32, row: u32) -> Self {
        Self { zoom, column, row }
    }

    /// The tile at `zoom` that contains `coordinate`.
    pub fn containing(coordinate: Coordinate, zoom: Zoom) -> Self {
        let shift = zoom.tile_shift();
        Self {
            zoom,
            column: coordinate.x() >> shift,
            row: coordinate.y() >> shift,
        }
    }

    /// Top-left corner of the tile at full precision.
    pub fn origin(&self) -> Coordinate {
        let shift = self.zoom.tile_shift();
        Coordinate::new(self.column << shift, self.row << shift)
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    /// Whether the tile exists in the `2^zoom` by `2^zoom` grid.
    pub fn is_valid(&self) -> bool {
        self.column < total_tiles(self.zoom) && self.row < total_tiles(self.zoom)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.column, self.row)
    }
}

impl FromStr for TileId {
    type Err = ParseTileIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = || ParseTileIdError::Format(s.to_owned());

        let mut parts = s.split('/');
        let (Some(zoom), Some(column), Some(row), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(format());
        };

        let zoom: u8 = zoom.parse().map_err(|_| format())?;
        Ok(TileId {
            zoom: Zoom::try_from(zoom)?,
            column: column.parse().map_err(|_| format())?,
            row: row.parse().map_err(|_| format())?,
        })
    }
}

/// An inclusive rectangle of tiles at a single zoom level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRange {
    zoom: Zoom,
    columns: RangeInclusive<u32>,
    rows: RangeInclusive<u32>,
}

impl TileRange {
    /// Range spanning from `top_left` to `bottom_right`, clipped to the world grid.
    pub fn new(top_left: TileId, bottom_right: TileId) -> Self {
        let zoom = top_left.zoom;
        let last = total_tiles(zoom) - 1;
        Self {
            zoom,
            columns: top_left.column.min(last)..=bottom_right.column.min(last),
            rows: top_left.row.min(last)..=bottom_right.row.min(last),
        }
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn columns(&self) -> RangeInclusive<u32> {
        self.columns.clone()
    }

    pub fn rows(&self) -> RangeInclusive<u32> {
        self.rows.clone()
    }

    pub fn len(&self) -> usize {
        self.columns.clone().count() * self.rows.clone().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, tile: &TileId) -> bool {
        tile.zoom == self.zoom && self.columns.contains(&tile.column) && self.rows.contains(&tile.row)
    }

    /// Iterate column by column, top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.columns().flat_map(move |column| {
            self.rows()
                .map(move |row| TileId::new(self.zoom, column, row))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Geographic, coordinate::PRECISION};

    fn zoom(level: u8) -> Zoom {
        Zoom::try_from(level).unwrap()
    }

    #[test]
    fn identity_string() {
        let tile = TileId::new(zoom(16), 36235, 22910);
        assert_eq!(tile.to_string(), "16/36235/22910");
        assert_eq!("16/36235/22910".parse::<TileId>(), Ok(tile));
    }

    #[test]
    fn identity_string_rejects_garbage() {
        assert!(matches!("16/1".parse::<TileId>(), Err(ParseTileIdError::Format(_))));
        assert!(matches!("1/2/3/4".parse::<TileId>(), Err(ParseTileIdError::Format(_))));
        assert!(matches!("a/2/3".parse::<TileId>(), Err(ParseTileIdError::Format(_))));
        assert_eq!(
            "21/0/0".parse::<TileId>(),
            Err(ParseTileIdError::Zoom(InvalidZoom(21)))
        );
    }

    #[test]
    fn known_tile_for_budapest() {
        // Matches the slippy map tile name formula at zoom 16
        let tile = TileId::containing(Geographic::new(47.49658, 19.057811).project(), zoom(16));
        assert_eq!(tile.column(), 36237);
        assert_eq!(tile.row(), 22917);
    }

    #[test]
    fn tile_derivation_is_idempotent() {
        let positions = [
            Geographic::new(47.49658, 19.057811),
            Geographic::new(-33.8688, 151.2093),
            Geographic::new(40.7128, -74.0060),
            Geographic::new(0.0, 0.0),
            Geographic::new(64.1466, -21.9426),
        ];

        for position in positions {
            for level in 0..=20 {
                let tile = TileId::containing(position.project(), zoom(level));
                assert_eq!(TileId::containing(tile.origin(), zoom(level)), tile);
            }
        }
    }

    #[test]
    fn origin_never_overshoots() {
        let coordinates = [
            Coordinate::new(0, 0),
            Coordinate::new(123_456_789, 98_765_432),
            Coordinate::new(268_435_455, 1),
            Geographic::new(47.49658, 19.057811).project(),
        ];

        for coordinate in coordinates {
            for level in 0..=20 {
                let origin = TileId::containing(coordinate, zoom(level)).origin();
                let tile_extent = 1u32 << (PRECISION - level as u32);

                assert!(origin.x() <= coordinate.x());
                assert!(origin.y() <= coordinate.y());
                assert!(coordinate.x() - origin.x() < tile_extent);
                assert!(coordinate.y() - origin.y() < tile_extent);
            }
        }
    }

    #[test]
    fn validity() {
        assert!(TileId::ZERO.is_valid());
        assert!(TileId::new(zoom(2), 3, 3).is_valid());
        assert!(!TileId::new(zoom(2), 4, 0).is_valid());
    }

    #[test]
    fn range_iterates_inclusive_rectangle() {
        let range = TileRange::new(TileId::new(zoom(5), 3, 7), TileId::new(zoom(5), 5, 8));
        let tiles: Vec<_> = range.iter().collect();

        assert_eq!(range.len(), 6);
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles[0], TileId::new(zoom(5), 3, 7));
        assert_eq!(tiles[5], TileId::new(zoom(5), 5, 8));
        assert!(range.contains(&TileId::new(zoom(5), 4, 8)));
        assert!(!range.contains(&TileId::new(zoom(6), 4, 8)));
    }

    #[test]
    fn range_is_clipped_to_world() {
        let range = TileRange::new(TileId::new(zoom(1), 1, 0), TileId::new(zoom(1), 3, 3));
        assert_eq!(range.columns(), 1..=1);
        assert_eq!(range.rows(), 0..=1);
        assert!(range.iter().all(|tile| tile.is_valid()));
    }
}
