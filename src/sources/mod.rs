//! Some common HTTP tile sources. Make sure you follow terms of usage of the particular source.

mod openstreetmap;
mod ovi;

use rand::seq::SliceRandom;

use crate::tile::TileId;
pub use openstreetmap::OpenStreetMap;
pub use ovi::OviMaps;

/// Remote tile server definition, used by the [`crate::Map`] to address tiles.
pub trait Source: core::fmt::Debug + Send + Sync {
    fn tile_url(&self, tile_id: TileId) -> String;

    fn max_zoom(&self) -> u8 {
        crate::coordinate::MAX_ZOOM
    }
}

/// Pick one of several equivalent mirrors, spreading the load between them.
pub(crate) fn pick_mirror(mirrors: &[&'static str]) -> &'static str {
    mirrors.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}
