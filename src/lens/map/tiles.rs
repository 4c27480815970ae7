//! Slippy-map tile adapter for terminal output
//!
//! [`TileMap`] implements [`MapWidget`] without a rendering surface: a handle
//! is a [`TileMapView`] describing the tile under the marker, its concrete URL
//! and an OpenStreetMap permalink, which is what a terminal can show.

use super::{LatLng, MapWidget};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Web-mercator latitude limit
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// Subdomains substituted for `{s}` in tile templates
const TILE_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

/// XYZ tile coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    /// Tile containing a point at the given zoom
    pub fn containing(at: LatLng, z: u8) -> Self {
        Self {
            x: lon_to_tile_x(at.lng, z),
            y: lat_to_tile_y(at.lat, z),
            z,
        }
    }
}

fn lon_to_tile_x(lon: f64, z: u8) -> u32 {
    let n = 1u32 << z;
    let x = ((lon + 180.0) / 360.0 * n as f64).floor() as i64;
    x.clamp(0, n as i64 - 1) as u32
}

fn lat_to_tile_y(lat: f64, z: u8) -> u32 {
    let n = 1u32 << z;
    let lat_rad = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / std::f64::consts::PI) / 2.0 * n as f64).floor() as i64;
    y.clamp(0, n as i64 - 1) as u32
}

/// A tile layer attached to a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

/// State of one map created by [`TileMap`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMapView {
    pub container_id: String,
    pub center: LatLng,
    pub zoom: u8,
    pub layers: Vec<TileLayer>,
    pub markers: Vec<LatLng>,
}

impl TileMapView {
    /// Tile under the current center
    pub fn center_tile(&self) -> TileCoord {
        TileCoord::containing(self.center, self.zoom)
    }

    /// Concrete URL of the center tile on the first layer
    pub fn tile_url(&self) -> Option<String> {
        let layer = self.layers.first()?;
        let tile = self.center_tile();
        let subdomain = TILE_SUBDOMAINS[((tile.x + tile.y) as usize) % TILE_SUBDOMAINS.len()];
        Some(
            layer
                .url_template
                .replace("{s}", subdomain)
                .replace("{z}", &tile.z.to_string())
                .replace("{x}", &tile.x.to_string())
                .replace("{y}", &tile.y.to_string()),
        )
    }

    /// openstreetmap.org link showing the first marker (or the center)
    pub fn permalink(&self) -> String {
        let at = self.markers.first().copied().unwrap_or(self.center);
        format!(
            "https://www.openstreetmap.org/?mlat={lat:.4}&mlon={lng:.4}#map={z}/{lat:.4}/{lng:.4}",
            lat = at.lat,
            lng = at.lng,
            z = self.zoom
        )
    }

    pub fn attribution(&self) -> Option<&str> {
        self.layers.first().map(|l| l.attribution.as_str())
    }
}

/// Map widget that computes tiles and links instead of drawing
#[derive(Debug, Default)]
pub struct TileMap {
    created: u64,
    destroyed: u64,
}

impl TileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of maps currently alive
    pub fn live(&self) -> u64 {
        self.created - self.destroyed
    }
}

fn check_point(at: LatLng) -> Result<()> {
    if !at.lat.is_finite() || !at.lng.is_finite() || at.lat.abs() > 90.0 || at.lng.abs() > 180.0 {
        return Err(anyhow!("coordinates out of range: {}", at));
    }
    Ok(())
}

impl MapWidget for TileMap {
    type Handle = TileMapView;

    fn create(&mut self, container_id: &str, center: LatLng, zoom: u8) -> Result<TileMapView> {
        check_point(center)?;
        if zoom > 19 {
            return Err(anyhow!("zoom level {} is not supported", zoom));
        }
        self.created += 1;
        Ok(TileMapView {
            container_id: container_id.to_string(),
            center,
            zoom,
            layers: vec![],
            markers: vec![],
        })
    }

    fn add_tile_layer(
        &mut self,
        handle: &mut TileMapView,
        url_template: &str,
        attribution: &str,
    ) -> Result<()> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !url_template.contains(placeholder) {
                return Err(anyhow!(
                    "tile url template '{}' is missing {}",
                    url_template,
                    placeholder
                ));
            }
        }
        handle.layers.push(TileLayer {
            url_template: url_template.to_string(),
            attribution: attribution.to_string(),
        });
        Ok(())
    }

    fn add_marker(&mut self, handle: &mut TileMapView, at: LatLng) -> Result<()> {
        check_point(at)?;
        handle.markers.push(at);
        Ok(())
    }

    fn set_view(&mut self, handle: &mut TileMapView, center: LatLng, zoom: u8) -> Result<()> {
        check_point(center)?;
        handle.center = center;
        handle.zoom = zoom;
        Ok(())
    }

    fn destroy(&mut self, _handle: TileMapView) {
        self.destroyed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TILE_URL;

    #[test]
    fn test_tile_coords() {
        // zoom 0 is a single tile
        assert_eq!(
            TileCoord::containing(LatLng::new(37.4, -122.1), 0),
            TileCoord { x: 0, y: 0, z: 0 }
        );
        // Mountain View at zoom 13
        assert_eq!(
            TileCoord::containing(LatLng::new(37.4, -122.1), 13),
            TileCoord {
                x: 1317,
                y: 3177,
                z: 13
            }
        );
        // poles clamp into the mercator range
        let north = TileCoord::containing(LatLng::new(90.0, 0.0), 3);
        assert_eq!(north.y, 0);
        let south = TileCoord::containing(LatLng::new(-90.0, 180.0), 3);
        assert_eq!((south.x, south.y), (7, 7));
    }

    #[test]
    fn test_view_lifecycle() {
        let mut map = TileMap::new();
        let center = LatLng::new(37.4, -122.1);
        let mut view = map.create("map", center, 13).unwrap();
        map.add_tile_layer(&mut view, DEFAULT_TILE_URL, "OSM").unwrap();
        map.add_marker(&mut view, center).unwrap();
        assert_eq!(map.live(), 1);

        let url = view.tile_url().unwrap();
        assert!(url.ends_with("/13/1317/3177.png?lang=en"));
        assert!(url.starts_with("https://a.tile.openstreetmap.org"));
        assert_eq!(
            view.permalink(),
            "https://www.openstreetmap.org/?mlat=37.4000&mlon=-122.1000#map=13/37.4000/-122.1000"
        );
        assert_eq!(view.attribution(), Some("OSM"));

        map.set_view(&mut view, LatLng::new(0.0, 0.0), 2).unwrap();
        assert_eq!(view.center_tile(), TileCoord { x: 2, y: 2, z: 2 });

        map.destroy(view);
        assert_eq!(map.live(), 0);
    }

    #[test]
    fn test_binder_keeps_one_live_tile_map() {
        use crate::lens::map::{MapBinder, MapSettings};

        let settings = MapSettings {
            zoom: 9,
            ..Default::default()
        };
        let mut binder = MapBinder::new(TileMap::new(), settings);
        assert_eq!(binder.settings().zoom, 9);

        binder.bind("8.8.8.8", LatLng::new(37.4, -122.1)).unwrap();
        binder.bind("1.1.1.1", LatLng::new(-33.5, 151.0)).unwrap();
        assert_eq!(binder.widget().live(), 1);
        assert_eq!(binder.handle().map(|v| v.zoom), Some(9));

        binder.teardown();
        assert_eq!(binder.widget().live(), 0);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut map = TileMap::new();
        assert!(map.create("map", LatLng::new(91.0, 0.0), 13).is_err());
        assert!(map.create("map", LatLng::new(0.0, f64::NAN), 13).is_err());
        assert!(map.create("map", LatLng::new(0.0, 0.0), 20).is_err());

        let mut view = map.create("map", LatLng::new(0.0, 0.0), 1).unwrap();
        assert!(map
            .add_tile_layer(&mut view, "https://tiles/{z}/{x}.png", "")
            .is_err());
        assert!(view.tile_url().is_none());
    }
}
