//! The full-precision integer grid every other view is derived from.
//!
//! A [`Coordinate`] addresses one pixel of the world bitmap at [`MAX_ZOOM`].
//! Tile ids and screen offsets are obtained by right-shifting it, so the
//! only thing a derived view can ever lose is precision.

use std::f64::consts::PI;

use crate::Geographic;

/// Highest zoom level served by the tile servers.
pub const MAX_ZOOM: u8 = 20;

/// Bit-width of a single tile edge (256 px).
pub const TILE_BITS: u32 = 8;

/// Edge length of a tile in pixels.
pub const TILE_SIZE: u32 = 1 << TILE_BITS;

/// Total bits of resolution at the maximum zoom level.
pub const PRECISION: u32 = MAX_ZOOM as u32 + TILE_BITS;

/// Number of pixels along one axis of the world bitmap at [`MAX_ZOOM`].
pub const WORLD_SIZE: u32 = 1 << PRECISION;

/// A location on the world bitmap at full precision.
/// Both axes range from `[0 ..= WORLD_SIZE]`, x east positive and y south positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coordinate {
    x: u32,
    y: u32,
}

/// A signed full-precision displacement, added to a [`Coordinate`] with [`Coordinate::offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub dx: i64,
    pub dy: i64,
}

impl Offset {
    pub const fn new(dx: i64, dy: i64) -> Self {
        Self { dx, dy }
    }
}

impl std::ops::Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Self::Output {
        Offset::new(-self.dx, -self.dy)
    }
}

impl Coordinate {
    pub const fn new(x: u32, y: u32) -> Self {
        Self {
            x: if x > WORLD_SIZE { WORLD_SIZE } else { x },
            y: if y > WORLD_SIZE { WORLD_SIZE } else { y },
        }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    /// Produce a new coordinate displaced by `offset`, saturating at the world edges.
    pub fn offset(self, offset: Offset) -> Coordinate {
        let clamp = |value: i64| value.clamp(0, WORLD_SIZE as i64) as u32;
        Coordinate {
            x: clamp(self.x as i64 + offset.dx),
            y: clamp(self.y as i64 + offset.dy),
        }
    }

    /// Inverse of [`Geographic::project`], up to the rounding of the grid.
    pub fn to_geographic(&self) -> Geographic {
        let world = WORLD_SIZE as f64;
        let lon = self.x as f64 / world * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * self.y as f64 / world))
            .sinh()
            .atan()
            .to_degrees();
        Geographic::new(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_fits_the_grid() {
        assert_eq!(PRECISION, 28);
        assert_eq!(WORLD_SIZE, 268_435_456);
        assert_eq!(TILE_SIZE, 256);
    }

    #[test]
    fn offset_returns_new_coordinate() {
        let origin = Coordinate::new(1000, 2000);
        let moved = origin.offset(Offset::new(24, -1000));

        assert_eq!(origin, Coordinate::new(1000, 2000));
        assert_eq!(moved, Coordinate::new(1024, 1000));
        assert_eq!(moved.offset(-Offset::new(24, -1000)), origin);
    }

    #[test]
    fn offset_saturates_at_world_edges() {
        let corner = Coordinate::new(10, WORLD_SIZE - 10);
        let moved = corner.offset(Offset::new(-100, 100));
        assert_eq!(moved, Coordinate::new(0, WORLD_SIZE));
    }

    #[test]
    fn new_clamps_out_of_range_values() {
        assert_eq!(Coordinate::new(u32::MAX, 3).x(), WORLD_SIZE);
    }

    #[test]
    fn geographic_round_trip() {
        let budapest = Geographic::new(47.49658, 19.057811);
        let back = budapest.project().to_geographic();

        approx::assert_relative_eq!(back.latitude(), budapest.latitude(), epsilon = 1e-5);
        approx::assert_relative_eq!(back.longitude(), budapest.longitude(), epsilon = 1e-5);
    }
}
