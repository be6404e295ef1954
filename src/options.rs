use std::time::Duration;

use serde::Deserialize;

use crate::Geographic;

#[derive(thiserror::Error, Debug)]
pub enum OptionsError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Construction options of a [`Map`](crate::Map).
///
/// Keys follow the `camelCase` naming of the embedding page, e.g.
/// `{"startPosition": {"lat": 47.5, "lon": 19.05}, "zoomLevel": 16}`.
/// Unrecognized keys are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapOptions {
    /// Geographic position of the top-left corner of the viewport.
    pub start_position: Geographic,
    pub zoom_level: u8,
    /// Number of tiles kept before the least recently drawn are dropped. Unbounded when `None`.
    pub cache_capacity: Option<usize>,
    /// Minimum time between two wheel zoom steps.
    pub wheel_debounce_ms: u64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            start_position: Geographic::new(47.49658, 19.057811),
            zoom_level: 15,
            cache_capacity: None,
            wheel_debounce_ms: 100,
        }
    }
}

impl MapOptions {
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_start_position(self, start_position: Geographic) -> Self {
        Self {
            start_position,
            ..self
        }
    }

    pub fn with_zoom_level(self, zoom_level: u8) -> Self {
        Self { zoom_level, ..self }
    }

    pub fn with_cache_capacity(self, capacity: usize) -> Self {
        Self {
            cache_capacity: Some(capacity),
            ..self
        }
    }

    pub fn wheel_debounce(&self) -> Duration {
        Duration::from_millis(self.wheel_debounce_ms)
    }
}
