use std::collections::HashMap;

use tokio::task::{self, JoinSet};

use crate::{
    Canvas, Intent, Map, MapOptions, Redraw, TileEvent, TileId,
    fetcher::TileLoader,
    sources::Source,
    zoom::InvalidZoom,
};

/// Runs a [`Map`] against a retained [`Canvas`] on the current tokio runtime.
///
/// All state changes happen on the caller's task; fetches run as independent
/// tasks that only hand their result back. Dropping the driver aborts the
/// fetches still in flight, so nothing is ever drawn into a dropped canvas.
pub struct Driver<L, C>
where
    L: TileLoader,
    C: Canvas<Image = L::Image>,
{
    map: Map<L::Image>,
    canvas: C,
    loader: L,
    in_flight: JoinSet<TileEvent<L::Image>>,
    tasks: HashMap<task::Id, TileId>,
}

impl<L, C> Driver<L, C>
where
    L: TileLoader,
    C: Canvas<Image = L::Image>,
{
    /// Build the map from `options` and perform the first render pass.
    /// Must be called from within a tokio runtime.
    pub fn new(
        options: &MapOptions,
        source: impl Source + 'static,
        loader: L,
        canvas: C,
    ) -> Result<Self, InvalidZoom> {
        let (width, height) = canvas.size();
        let mut driver = Self {
            map: Map::new(options, source, width, height)?,
            canvas,
            loader,
            in_flight: JoinSet::new(),
            tasks: HashMap::new(),
        };
        driver.render();
        Ok(driver)
    }

    pub fn map(&self) -> &Map<L::Image> {
        &self.map
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Number of fetches not resolved yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn render(&mut self) {
        for fetch in self.map.render(&mut self.canvas) {
            let tile = fetch.tile;
            let handle = self.in_flight.spawn(self.loader.fetch(fetch));
            self.tasks.insert(handle.id(), tile);
        }
    }

    /// Apply `intent`, rendering once if it changed the viewport.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Redraw, InvalidZoom> {
        let redraw = self.map.apply(intent)?;
        if redraw.is_required() {
            self.render();
        }
        Ok(redraw)
    }

    /// Wait for the next fetch to resolve and apply it.
    ///
    /// Returns `None` when nothing is in flight, otherwise whether a tile was drawn.
    pub async fn next(&mut self) -> Option<bool> {
        match self.in_flight.join_next_with_id().await? {
            Ok((id, event)) => {
                self.tasks.remove(&id);
                Some(self.map.handle(event, &mut self.canvas))
            }
            Err(error) => {
                log::warn!("tile fetch task failed: {error}");
                // Release the tile so the next pass requests it again
                if let Some(tile) = self.tasks.remove(&error.id()) {
                    self.map.tile_failed(tile);
                }
                Some(false)
            }
        }
    }

    /// Apply fetch results until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.next().await.is_some() {}
    }
}
