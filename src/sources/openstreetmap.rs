use super::{Source, pick_mirror};
use crate::tile::TileId;

const MIRRORS: [&str; 3] = ["a", "b", "c"];

/// <https://www.openstreetmap.org/about>
#[derive(Debug, Default)]
pub struct OpenStreetMap;

impl Source for OpenStreetMap {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://{}.tile.openstreetmap.org/{}/{}/{}.png",
            pick_mirror(&MIRRORS),
            tile_id.zoom(),
            tile_id.column(),
            tile_id.row()
        )
    }

    fn max_zoom(&self) -> u8 {
        19
    }
}
