use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::tile::TileId;

/// Decides which tiles to drop after a new one was cached.
pub trait EvictionPolicy: core::fmt::Debug + Send {
    /// Called after `inserted` was stored and the cache holds `cached` tiles.
    fn evict(&mut self, inserted: TileId, cached: usize) -> Vec<TileId>;

    /// Called whenever a cached tile is read for drawing.
    fn touch(&mut self, _tile: &TileId) {}
}

/// Keep every tile for the lifetime of the cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverEvict;

impl EvictionPolicy for NeverEvict {
    fn evict(&mut self, _inserted: TileId, _cached: usize) -> Vec<TileId> {
        Vec::new()
    }
}

/// Drop the least recently drawn tiles once more than `capacity` are cached.
#[derive(Debug)]
pub struct Lru {
    recent: LruCache<TileId, ()>,
}

impl Lru {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            recent: LruCache::new(capacity),
        }
    }
}

impl EvictionPolicy for Lru {
    fn evict(&mut self, inserted: TileId, _cached: usize) -> Vec<TileId> {
        match self.recent.push(inserted, ()) {
            Some((evicted, ())) if evicted != inserted => vec![evicted],
            _ => Vec::new(),
        }
    }

    fn touch(&mut self, tile: &TileId) {
        let _ = self.recent.get(tile);
    }
}

/// The cache which holds the loaded raster tiles, along with the tiles
/// currently being fetched. Failed loads are never remembered, so the
/// next render pass retries them.
#[derive(Debug)]
pub struct TileCache<I> {
    tiles: HashMap<TileId, I>,
    in_flight: HashSet<TileId>,
    eviction: Box<dyn EvictionPolicy>,
}

impl<I> Default for TileCache<I> {
    fn default() -> Self {
        TileCache::new()
    }
}

impl<I> TileCache<I> {
    pub fn new() -> Self {
        Self::with_eviction(NeverEvict)
    }

    pub fn with_eviction(policy: impl EvictionPolicy + 'static) -> Self {
        Self {
            tiles: HashMap::new(),
            in_flight: HashSet::new(),
            eviction: Box::new(policy),
        }
    }

    /// Read a tile for drawing, marking it as recently used.
    pub fn get(&mut self, tile: &TileId) -> Option<&I> {
        if self.tiles.contains_key(tile) {
            self.eviction.touch(tile);
        }
        self.tiles.get(tile)
    }

    /// Read a tile without affecting eviction.
    pub fn peek(&self, tile: &TileId) -> Option<&I> {
        self.tiles.get(tile)
    }

    pub fn contains(&self, tile: &TileId) -> bool {
        self.tiles.contains_key(tile)
    }

    pub fn is_in_flight(&self, tile: &TileId) -> bool {
        self.in_flight.contains(tile)
    }

    /// Mark `tile` as being fetched. Returns `false` if it is cached or already in flight.
    pub fn begin_fetch(&mut self, tile: TileId) -> bool {
        !self.tiles.contains_key(&tile) && self.in_flight.insert(tile)
    }

    /// Store a loaded tile. Inserting the same tile twice replaces the image.
    pub fn insert(&mut self, tile: TileId, image: I) {
        self.in_flight.remove(&tile);
        self.tiles.insert(tile, image);

        for evicted in self.eviction.evict(tile, self.tiles.len()) {
            log::trace!("evicting tile {evicted}");
            self.tiles.remove(&evicted);
        }
    }

    pub fn fetch_failed(&mut self, tile: &TileId) {
        self.in_flight.remove(tile);
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Zoom;

    fn tile(column: u32) -> TileId {
        TileId::new(Zoom::try_from(10u8).unwrap(), column, 7)
    }

    #[test]
    fn basic_operations() {
        let mut cache = TileCache::new();
        assert!(cache.is_empty());

        cache.insert(tile(1), "one");
        assert_eq!(cache.get(&tile(1)), Some(&"one"));
        assert!(cache.contains(&tile(1)));
        assert!(!cache.contains(&tile(2)));

        // Last write wins
        cache.insert(tile(1), "uno");
        assert_eq!(cache.get(&tile(1)), Some(&"uno"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn fetches_are_tracked_until_resolved() {
        let mut cache = TileCache::<&str>::new();

        assert!(cache.begin_fetch(tile(3)));
        assert!(cache.is_in_flight(&tile(3)));
        assert!(!cache.begin_fetch(tile(3)));

        cache.fetch_failed(&tile(3));
        assert!(!cache.is_in_flight(&tile(3)));
        assert!(!cache.contains(&tile(3)));
        assert!(cache.begin_fetch(tile(3)));

        cache.insert(tile(3), "three");
        assert!(!cache.is_in_flight(&tile(3)));
        assert!(!cache.begin_fetch(tile(3)));
    }

    #[test]
    fn never_evicts_by_default() {
        let mut cache = TileCache::new();
        for column in 0..2000 {
            cache.insert(tile(column), column);
        }
        assert_eq!(cache.len(), 2000);
    }

    #[test]
    fn lru_drops_least_recently_used() {
        let mut cache = TileCache::with_eviction(Lru::new(2));
        cache.insert(tile(1), 1);
        cache.insert(tile(2), 2);
        cache.insert(tile(1), 10);
        cache.insert(tile(3), 3);

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&tile(2)));
        assert_eq!(cache.peek(&tile(1)), Some(&10));
        assert_eq!(cache.peek(&tile(3)), Some(&3));
    }

    #[test]
    fn drawn_tiles_survive_eviction() {
        let mut cache = TileCache::with_eviction(Lru::new(2));
        cache.insert(tile(1), 1);
        cache.insert(tile(2), 2);

        // Reading tile 1 makes tile 2 the oldest
        assert_eq!(cache.get(&tile(1)), Some(&1));
        cache.insert(tile(3), 3);
        assert!(cache.contains(&tile(1)));
        assert!(!cache.contains(&tile(2)));

        // Peeking does not count as a use
        assert_eq!(cache.peek(&tile(1)), Some(&1));
        cache.insert(tile(4), 4);
        assert!(!cache.contains(&tile(1)));
        assert!(cache.contains(&tile(3)));
        assert!(cache.contains(&tile(4)));
    }
}
