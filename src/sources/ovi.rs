use crate::{TileId, coordinate::TILE_SIZE};

const MIRRORS: [&str; 3] = ["a", "b", "c"];

/// Day-time street map tiles served as 8-bit-palette PNGs.
#[derive(Debug, Default)]
pub struct OviMaps;

impl super::Source for OviMaps {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "http://{}.maptile.maps.svc.ovi.com/maptiler/v2/maptile/newest/normal.day/{}/{}/png8",
            super::pick_mirror(&MIRRORS),
            tile_id,
            TILE_SIZE,
        )
    }
}
