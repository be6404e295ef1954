//! Instrumented collaborators for the unit tests.

use std::{
    collections::HashSet,
    future::Future,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{
    Canvas, TileId,
    fetcher::{FetchError, TileLoader},
    sources::Source,
};

/// Addresses every tile by its identity, so loaded images name their tile.
#[derive(Debug, Default)]
pub struct Ids;

impl Source for Ids {
    fn tile_url(&self, tile_id: TileId) -> String {
        tile_id.to_string()
    }
}

/// Records every draw call.
#[derive(Debug, Default)]
pub struct Recorder {
    pub width: u32,
    pub height: u32,
    pub draws: Vec<(String, i32, i32)>,
}

impl Recorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            draws: Vec::new(),
        }
    }

    pub fn drew(&self, tile: &TileId) -> bool {
        let id = tile.to_string();
        self.draws.iter().any(|(image, _, _)| *image == id)
    }
}

impl Canvas for Recorder {
    type Image = String;

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_image(&mut self, image: &String, x: i32, y: i32) {
        self.draws.push((image.clone(), x, y));
    }
}

/// Resolves immediately with the URL as the image, counting every load.
#[derive(Debug, Default, Clone)]
pub struct FakeLoader {
    calls: Arc<AtomicUsize>,
    failing: Arc<Mutex<HashSet<String>>>,
    crashing: Arc<Mutex<HashSet<String>>>,
}

impl FakeLoader {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_owned());
    }

    /// Make the load of `url` panic inside its task.
    pub fn crash(&self, url: &str) {
        self.crashing.lock().unwrap().insert(url.to_owned());
    }

    pub fn recover(&self, url: &str) {
        self.failing.lock().unwrap().remove(url);
        self.crashing.lock().unwrap().remove(url);
    }
}

impl TileLoader for FakeLoader {
    type Image = String;

    fn load(&self, url: String) -> impl Future<Output = Result<String, FetchError>> + Send + 'static {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing.lock().unwrap().contains(&url);
        let crashing = self.crashing.lock().unwrap().contains(&url);

        async move {
            if crashing {
                panic!("loader crashed on {url}");
            }
            if failing {
                Err(FetchError::Empty(url))
            } else {
                Ok(url)
            }
        }
    }
}
