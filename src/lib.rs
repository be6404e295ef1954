mod canvas;
mod coordinate;
mod driver;
mod fetcher;
mod input;
mod map;
mod map_widget;
mod options;
mod position;
mod projector;
mod tile;
mod tile_cache;
mod zoom;

pub mod sources;

#[cfg(test)]
mod testing;

pub use canvas::{Canvas, DeferredPaint};
pub use coordinate::{Coordinate, MAX_ZOOM, Offset, PRECISION, TILE_BITS, TILE_SIZE, WORLD_SIZE};
pub use driver::Driver;
pub use fetcher::{FetchError, HttpLoader, TileLoader};
pub use input::{Control, DOUBLE_CLICK, InputEvent, InputState, PAN_STEP};
pub use map::{Fetch, Intent, Map, Redraw, TileEvent, TileLookup};
pub use map_widget::{FrameCanvas, MapWidget};
pub use options::{MapOptions, OptionsError};
pub use position::Geographic;
pub use projector::{Projector, ScreenOffset};
pub use tile::{ParseTileIdError, TileId, TileRange};
pub use tile_cache::{EvictionPolicy, Lru, NeverEvict, TileCache};
pub use zoom::{InvalidZoom, Zoom};
