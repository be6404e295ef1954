use crate::coordinate::MAX_ZOOM;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("zoom level {0} is outside of 0..={max}", max = MAX_ZOOM)]
pub struct InvalidZoom(pub i16);

/// A discrete zoom level in `[0 ..= MAX_ZOOM]`, where 0 means the whole world in one tile.
/// See: <https://wiki.openstreetmap.org/wiki/Zoom_levels>
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Zoom(u8);

impl Zoom {
    pub const MIN: Zoom = Zoom(0);
    pub const MAX: Zoom = Zoom(MAX_ZOOM);

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn zoom_in(self) -> Result<Zoom, InvalidZoom> {
        Zoom::try_from(self.0 as i16 + 1)
    }

    pub fn zoom_out(self) -> Result<Zoom, InvalidZoom> {
        Zoom::try_from(self.0 as i16 - 1)
    }

    /// Bits dropped when going from full precision to a tile index at this zoom.
    pub(crate) fn tile_shift(&self) -> u32 {
        (MAX_ZOOM - self.0) as u32 + crate::coordinate::TILE_BITS
    }

    /// Bits dropped when going from full precision to a screen pixel at this zoom.
    pub(crate) fn pixel_shift(&self) -> u32 {
        (MAX_ZOOM - self.0) as u32
    }
}

impl TryFrom<i16> for Zoom {
    type Error = InvalidZoom;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        if (0..=MAX_ZOOM as i16).contains(&value) {
            Ok(Zoom(value as u8))
        } else {
            Err(InvalidZoom(value))
        }
    }
}

impl TryFrom<u8> for Zoom {
    type Error = InvalidZoom;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Zoom::try_from(value as i16)
    }
}

impl std::fmt::Display for Zoom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert_eq!(Zoom::try_from(0u8), Ok(Zoom::MIN));
        assert_eq!(Zoom::try_from(20u8), Ok(Zoom::MAX));
        assert_eq!(Zoom::try_from(21u8), Err(InvalidZoom(21)));
        assert_eq!(Zoom::try_from(-1i16), Err(InvalidZoom(-1)));
    }

    #[test]
    fn stepping() {
        let zoom = Zoom::try_from(15u8).unwrap();
        assert_eq!(zoom.zoom_in().unwrap().get(), 16);
        assert_eq!(zoom.zoom_out().unwrap().get(), 14);
        assert!(Zoom::MAX.zoom_in().is_err());
        assert!(Zoom::MIN.zoom_out().is_err());
    }

    #[test]
    fn shifts() {
        let zoom = Zoom::try_from(15u8).unwrap();
        assert_eq!(zoom.tile_shift(), 13);
        assert_eq!(zoom.pixel_shift(), 5);
        assert_eq!(Zoom::MAX.pixel_shift(), 0);
    }
}
