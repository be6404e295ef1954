use crate::{
    Canvas, Geographic, MapOptions, Projector,
    coordinate::{Coordinate, Offset},
    sources::Source,
    tile::{TileId, TileRange},
    tile_cache::{Lru, TileCache},
    zoom::{InvalidZoom, Zoom},
};

/// What a user asked the map to do. Produced by [`crate::InputState`] or by
/// application buttons, and applied with [`Map::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Move the viewport by a number of screen pixels.
    Pan { dx: i32, dy: i32 },
    /// Zoom in, keeping the point under `(x, y)` in place.
    ZoomInAt { x: i32, y: i32 },
    /// Zoom out, keeping the point under `(x, y)` in place.
    ZoomOutAt { x: i32, y: i32 },
    ZoomIn,
    ZoomOut,
    StartMove,
    StopMove,
    Resize { width: u32, height: u32 },
}

/// Returned by every mutation of a [`Map`]: whether a render pass is now due.
///
/// Mutations never render by themselves, the caller decides when to call
/// [`Map::render`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Required,
    Skip,
}

impl Redraw {
    pub fn is_required(self) -> bool {
        self == Redraw::Required
    }
}

/// A tile that has to be retrieved from its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetch {
    pub tile: TileId,
    pub url: String,
}

/// Completion of a [`Fetch`], fed back into [`Map::handle`].
#[derive(Debug, Clone)]
pub enum TileEvent<I> {
    Loaded { tile: TileId, image: I },
    Failed { tile: TileId },
}

/// Outcome of looking up a single tile, see [`Map::tile`].
#[derive(Debug)]
pub enum TileLookup<'a, I> {
    /// Already loaded, can be drawn right away.
    Cached(&'a I),
    /// Not loaded yet, the caller should retrieve it.
    Fetch(Fetch),
    /// Requested by an earlier render pass and not resolved yet.
    InFlight,
    /// Not loaded, and the map is being dragged, so it stays blank for now.
    Deferred,
}

/// A pannable, zoomable viewport onto the tiled world map.
///
/// The map owns the top-left corner and zoom level of the viewport and the
/// cache of loaded tiles. It does no I/O itself: [`Map::render`] hands back
/// the tiles to fetch, and their results come back through [`Map::handle`].
#[derive(Debug)]
pub struct Map<I> {
    top_left: Coordinate,
    zoom: Zoom,
    width: u32,
    height: u32,
    moving: bool,
    rendered: bool,
    cache: TileCache<I>,
    source: Box<dyn Source>,
}

impl<I> Map<I> {
    pub fn new(
        options: &MapOptions,
        source: impl Source + 'static,
        width: u32,
        height: u32,
    ) -> Result<Self, InvalidZoom> {
        let max_zoom = source.max_zoom();
        let zoom = Zoom::try_from(options.zoom_level)?;
        if zoom.get() > max_zoom {
            return Err(InvalidZoom(zoom.get() as i16));
        }

        let cache = match options.cache_capacity {
            Some(capacity) => TileCache::with_eviction(Lru::new(capacity)),
            None => TileCache::new(),
        };

        Ok(Self {
            top_left: options.start_position.project(),
            zoom,
            width,
            height,
            moving: false,
            rendered: false,
            cache,
            source: Box::new(source),
        })
    }

    pub fn top_left(&self) -> Coordinate {
        self.top_left
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Whether the first render pass has completed.
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    pub fn cache(&self) -> &TileCache<I> {
        &self.cache
    }

    pub fn projector(&self) -> Projector {
        Projector::new(self.top_left, self.zoom)
    }

    pub fn visible_tiles(&self) -> TileRange {
        self.projector().visible_tiles(self.width, self.height)
    }

    /// Geographic position under a point of the viewport.
    pub fn geographic_at(&self, x: i32, y: i32) -> Geographic {
        self.projector().screen_to_coordinate(x, y).to_geographic()
    }

    fn changed(&self) -> Redraw {
        if self.rendered {
            Redraw::Required
        } else {
            Redraw::Skip
        }
    }

    fn checked(&self, zoom: Result<Zoom, InvalidZoom>) -> Result<Zoom, InvalidZoom> {
        let zoom = zoom?;
        if zoom.get() > self.source.max_zoom() {
            return Err(InvalidZoom(zoom.get() as i16));
        }
        Ok(zoom)
    }

    pub fn pan(&mut self, dx: i32, dy: i32) -> Redraw {
        let offset = self.projector().offset_from_screen(dx, dy);
        self.top_left = self.top_left.offset(offset);
        self.changed()
    }

    /// Move the top-left corner of the viewport to `position`.
    pub fn move_to(&mut self, position: Geographic) -> Redraw {
        self.top_left = position.project();
        self.changed()
    }

    pub fn set_zoom(&mut self, level: u8) -> Result<Redraw, InvalidZoom> {
        self.zoom = self.checked(Zoom::try_from(level))?;
        Ok(self.changed())
    }

    pub fn zoom_in(&mut self) -> Result<Redraw, InvalidZoom> {
        self.zoom = self.checked(self.zoom.zoom_in())?;
        Ok(self.changed())
    }

    pub fn zoom_out(&mut self) -> Result<Redraw, InvalidZoom> {
        self.zoom = self.checked(self.zoom.zoom_out())?;
        Ok(self.changed())
    }

    /// Zoom in while the point under `(x, y)` stays where it is on screen.
    ///
    /// After zooming in, the same pixel offset covers half the distance, so
    /// the top-left corner moves by half the offset at the current zoom.
    pub fn zoom_in_at(&mut self, x: i32, y: i32) -> Result<Redraw, InvalidZoom> {
        let zoom = self.checked(self.zoom.zoom_in())?;

        let anchor = self.projector().offset_from_screen(x, y);
        self.top_left = self.top_left.offset(Offset::new(anchor.dx >> 1, anchor.dy >> 1));
        self.zoom = zoom;

        Ok(self.changed())
    }

    /// Zoom out while the point under `(x, y)` stays where it is on screen.
    pub fn zoom_out_at(&mut self, x: i32, y: i32) -> Result<Redraw, InvalidZoom> {
        let zoom = self.checked(self.zoom.zoom_out())?;

        let anchor = self.projector().offset_from_screen(x, y);
        self.top_left = self.top_left.offset(-anchor);
        self.zoom = zoom;

        Ok(self.changed())
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Redraw {
        if (width, height) == (self.width, self.height) {
            return Redraw::Skip;
        }
        self.width = width;
        self.height = height;
        self.changed()
    }

    /// Begin a drag. Until [`Map::stop_move`], only cached tiles are drawn.
    pub fn start_move(&mut self) {
        self.moving = true;
    }

    /// End a drag. A render pass is due to fetch the tiles skipped meanwhile.
    pub fn stop_move(&mut self) -> Redraw {
        self.moving = false;
        self.changed()
    }

    pub fn apply(&mut self, intent: Intent) -> Result<Redraw, InvalidZoom> {
        Ok(match intent {
            Intent::Pan { dx, dy } => self.pan(dx, dy),
            Intent::ZoomInAt { x, y } => self.zoom_in_at(x, y)?,
            Intent::ZoomOutAt { x, y } => self.zoom_out_at(x, y)?,
            Intent::ZoomIn => self.zoom_in()?,
            Intent::ZoomOut => self.zoom_out()?,
            Intent::StartMove => {
                self.start_move();
                Redraw::Skip
            }
            Intent::StopMove => self.stop_move(),
            Intent::Resize { width, height } => self.resize(width, height),
        })
    }

    /// Look up a tile, registering a fetch for it if it is missing and may be loaded now.
    pub fn tile(&mut self, tile: TileId) -> TileLookup<'_, I> {
        if !self.cache.contains(&tile) {
            if self.moving {
                return TileLookup::Deferred;
            }
            if !self.cache.begin_fetch(tile) {
                return TileLookup::InFlight;
            }
            return TileLookup::Fetch(Fetch {
                tile,
                url: self.source.tile_url(tile),
            });
        }

        match self.cache.get(&tile) {
            Some(image) => TileLookup::Cached(image),
            None => TileLookup::InFlight,
        }
    }

    /// Draw every cached visible tile and collect the missing ones to fetch.
    ///
    /// The visible rectangle and the draw offsets all come from the state at
    /// the start of the pass.
    pub fn render<C>(&mut self, canvas: &mut C) -> Vec<Fetch>
    where
        C: Canvas<Image = I>,
    {
        let projector = self.projector();
        let visible = projector.visible_tiles(self.width, self.height);
        log::trace!(
            "render zoom {} columns {:?} rows {:?}",
            self.zoom,
            visible.columns(),
            visible.rows()
        );

        let mut fetches = Vec::new();
        for tile in visible.iter() {
            match self.tile(tile) {
                TileLookup::Cached(image) => {
                    let offset = projector.tile_offset(&tile);
                    canvas.draw_image(image, offset.dx, offset.dy);
                }
                TileLookup::Fetch(fetch) => fetches.push(fetch),
                TileLookup::InFlight | TileLookup::Deferred => {}
            }
        }

        if !fetches.is_empty() {
            log::debug!("requesting {} tiles at zoom {}", fetches.len(), self.zoom);
        }

        self.rendered = true;
        fetches
    }

    /// Draw the cached visible tiles without requesting anything.
    pub fn paint<C>(&self, canvas: &mut C)
    where
        C: Canvas<Image = I>,
    {
        let projector = self.projector();
        for tile in self.visible_tiles().iter() {
            if let Some(image) = self.cache.peek(&tile) {
                let offset = projector.tile_offset(&tile);
                canvas.draw_image(image, offset.dx, offset.dy);
            }
        }
    }

    /// Store a loaded tile and draw it if it is still part of the viewport.
    /// Returns whether it was drawn.
    pub fn tile_loaded<C>(&mut self, tile: TileId, image: I, canvas: &mut C) -> bool
    where
        C: Canvas<Image = I>,
    {
        self.cache.insert(tile, image);

        if !self.visible_tiles().contains(&tile) {
            log::trace!("tile {tile} loaded after leaving the viewport");
            return false;
        }

        let offset = self.projector().tile_offset(&tile);
        match self.cache.peek(&tile) {
            Some(image) => {
                canvas.draw_image(image, offset.dx, offset.dy);
                true
            }
            None => false,
        }
    }

    /// The tile stays blank, a later render pass requests it again.
    pub fn tile_failed(&mut self, tile: TileId) {
        log::debug!("tile {tile} left unpainted");
        self.cache.fetch_failed(&tile);
    }

    pub fn handle<C>(&mut self, event: TileEvent<I>, canvas: &mut C) -> bool
    where
        C: Canvas<Image = I>,
    {
        match event {
            TileEvent::Loaded { tile, image } => self.tile_loaded(tile, image, canvas),
            TileEvent::Failed { tile } => {
                self.tile_failed(tile);
                false
            }
        }
    }
}
