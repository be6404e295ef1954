//! Project the lat/lon coordinates onto the full-precision grid using the Web Mercator.
//! <https://en.wikipedia.org/wiki/Web_Mercator_projection>
//! <https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames>

use std::f64::consts::PI;

use serde::Deserialize;

use crate::coordinate::{Coordinate, WORLD_SIZE};

/// A position on a sphere consisting of latitude and longitude
/// components, ranging from `[-90 .. =90]` and `[-180 .. =180]`
/// respectively.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "LatLon")]
pub struct Geographic {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

impl From<LatLon> for Geographic {
    fn from(value: LatLon) -> Self {
        Geographic::new(value.lat, value.lon)
    }
}

impl Geographic {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: lat.clamp(-90., 90.),
            lon: lon.clamp(-180., 180.),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.lat
    }

    pub fn longitude(&self) -> f64 {
        self.lon
    }

    /// Flatten the position onto the world bitmap at full precision.
    ///
    /// The normalized y is clamped to `[0, 1]` before scaling, so the poles
    /// saturate to the top and bottom edge instead of leaving the grid.
    pub fn project(&self) -> Coordinate {
        let world = WORLD_SIZE as f64;

        let x = (self.lon / 360.0 + 0.5) * world;
        let y = 0.5 - (PI / 4.0 + PI / 2.0 * self.lat / 180.0).tan().ln() / (2.0 * PI);
        let y = y.clamp(0.0, 1.0) * world;

        Coordinate::new(x.round() as u32, y.round() as u32)
    }
}

#[cfg(test)]
mod position_tests {
    use super::*;

    #[test]
    fn origin_projects_to_world_center() {
        let center = Geographic::new(0.0, 0.0).project();
        assert_eq!(center, Coordinate::new(WORLD_SIZE / 2, WORLD_SIZE / 2));
    }

    #[test]
    fn longitude_edges() {
        assert_eq!(Geographic::new(0.0, -180.0).project().x(), 0);
        assert_eq!(Geographic::new(0.0, 180.0).project().x(), WORLD_SIZE);
        assert_eq!(Geographic::new(0.0, 90.0).project().x(), WORLD_SIZE / 4 * 3);
    }

    #[test]
    fn poles_saturate() {
        for lon in [-180.0, -45.5, 0.0, 19.05, 180.0] {
            assert_eq!(Geographic::new(90.0, lon).project().y(), 0);
            assert_eq!(Geographic::new(-90.0, lon).project().y(), WORLD_SIZE);
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let position = Geographic::new(123.0, -500.0);
        assert_eq!(position.latitude(), 90.0);
        assert_eq!(position.longitude(), -180.0);
        assert_eq!(position.project(), Coordinate::new(0, 0));
    }

    #[test]
    fn northern_positions_are_above_the_equator() {
        let budapest = Geographic::new(47.49658, 19.057811).project();
        assert!(budapest.y() < WORLD_SIZE / 2);
        assert!(budapest.x() > WORLD_SIZE / 2);
    }

    #[test]
    fn deserialize_clamps() {
        let position: Geographic = serde_json::from_str(r#"{"lat": 95.0, "lon": 19.0}"#).unwrap();
        assert_eq!(position, Geographic::new(90.0, 19.0));
    }
}
