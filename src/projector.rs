use crate::{
    coordinate::{Coordinate, Offset},
    tile::{TileId, TileRange},
    zoom::Zoom,
};

/// Pixel displacement relative to the top-left corner of a viewport.
/// May be negative, or beyond the viewport size, for partially visible tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenOffset {
    pub dx: i32,
    pub dy: i32,
}

impl ScreenOffset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// Utility for projecting between full-precision coordinates and screen space.
///
/// A projector is a snapshot of the viewport's top-left corner and zoom level.
/// Everything it produces is a read-only view; moving the viewport means
/// building a new [`Coordinate`] and handing it to the [`Map`](crate::Map).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projector {
    pub top_left: Coordinate,
    pub zoom: Zoom,
}

impl Projector {
    pub fn new(top_left: Coordinate, zoom: Zoom) -> Self {
        Self { top_left, zoom }
    }

    /// Determines where `coordinate` lands on the screen.
    pub fn screen_offset(&self, coordinate: Coordinate) -> ScreenOffset {
        let shift = self.zoom.pixel_shift();
        let dx = (coordinate.x() as i64 - self.top_left.x() as i64) >> shift;
        let dy = (coordinate.y() as i64 - self.top_left.y() as i64) >> shift;
        ScreenOffset::new(dx as i32, dy as i32)
    }

    /// Where the top-left corner of `tile` is drawn.
    pub fn tile_offset(&self, tile: &TileId) -> ScreenOffset {
        self.screen_offset(tile.origin())
    }

    /// Scale a pixel delta at the current zoom up to full precision.
    ///
    /// The same pixel delta covers a different distance at every zoom level.
    pub fn offset_from_screen(&self, dx: i32, dy: i32) -> Offset {
        let shift = self.zoom.pixel_shift();
        Offset::new((dx as i64) << shift, (dy as i64) << shift)
    }

    /// The coordinate under a point of the viewport, e.g. the cursor.
    pub fn screen_to_coordinate(&self, x: i32, y: i32) -> Coordinate {
        self.top_left.offset(self.offset_from_screen(x, y))
    }

    /// The tiles needed to cover a `width` by `height` viewport.
    ///
    /// One extra column and row is included so partially visible edge tiles are drawn.
    pub fn visible_tiles(&self, width: u32, height: u32) -> TileRange {
        let bottom_right = self.screen_to_coordinate(
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );

        let first = TileId::containing(self.top_left, self.zoom);
        let last = TileId::containing(bottom_right, self.zoom);

        TileRange::new(
            first,
            TileId::new(self.zoom, last.column() + 1, last.row() + 1),
        )
    }
}
