//! Map binding
//!
//! The map widget is an external resource consumed through the [`MapWidget`]
//! capability trait. [`MapBinder`] owns at most one live handle and ties it to
//! the address of the result it shows: the previous handle is always destroyed
//! before a new one is created.

mod tiles;

pub use tiles::{TileCoord, TileMap, TileMapView};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// DOM-style id of the container the map is rendered into
pub const MAP_CONTAINER_ID: &str = "map";

/// A geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

/// Capabilities of a map widget library
///
/// `destroy` consumes the handle, so a destroyed map can't be touched again.
pub trait MapWidget {
    type Handle;

    fn create(&mut self, container_id: &str, center: LatLng, zoom: u8) -> Result<Self::Handle>;

    fn add_tile_layer(
        &mut self,
        handle: &mut Self::Handle,
        url_template: &str,
        attribution: &str,
    ) -> Result<()>;

    fn add_marker(&mut self, handle: &mut Self::Handle, at: LatLng) -> Result<()>;

    fn set_view(&mut self, handle: &mut Self::Handle, center: LatLng, zoom: u8) -> Result<()>;

    fn destroy(&mut self, handle: Self::Handle);
}

/// Fixed settings applied to every map the binder creates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    pub zoom: u8,
    pub tile_url: String,
    pub tile_attribution: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: 13,
            tile_url: crate::config::DEFAULT_TILE_URL.to_string(),
            tile_attribution: crate::config::DEFAULT_TILE_ATTRIBUTION.to_string(),
        }
    }
}

impl From<&crate::IpgeoConfig> for MapSettings {
    fn from(config: &crate::IpgeoConfig) -> Self {
        Self {
            zoom: config.map_zoom,
            tile_url: config.tile_url.clone(),
            tile_attribution: config.tile_attribution.clone(),
        }
    }
}

struct BoundMap<H> {
    handle: H,
    address: String,
    center: LatLng,
}

/// Owns the single live map handle
pub struct MapBinder<W: MapWidget> {
    widget: W,
    settings: MapSettings,
    bound: Option<BoundMap<W::Handle>>,
}

impl<W: MapWidget> MapBinder<W> {
    pub fn new(widget: W, settings: MapSettings) -> Self {
        Self {
            widget,
            settings,
            bound: None,
        }
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Address of the result the live map belongs to
    pub fn bound_address(&self) -> Option<&str> {
        self.bound.as_ref().map(|b| b.address.as_str())
    }

    pub fn handle(&self) -> Option<&W::Handle> {
        self.bound.as_ref().map(|b| &b.handle)
    }

    /// Create a map centered on `center` with one marker, replacing any live map.
    pub fn bind(&mut self, address: &str, center: LatLng) -> Result<()> {
        self.teardown();

        let zoom = self.settings.zoom;
        let mut handle = self.widget.create(MAP_CONTAINER_ID, center, zoom)?;
        let attached = self
            .widget
            .add_tile_layer(
                &mut handle,
                &self.settings.tile_url,
                &self.settings.tile_attribution,
            )
            .and_then(|_| self.widget.add_marker(&mut handle, center));
        if let Err(e) = attached {
            self.widget.destroy(handle);
            return Err(e);
        }

        debug!("map bound to {} at {} (zoom {})", address, center, zoom);
        self.bound = Some(BoundMap {
            handle,
            address: address.to_string(),
            center,
        });
        Ok(())
    }

    /// Re-center the live map if `query` still names its address.
    ///
    /// Returns whether a map was re-centered.
    pub fn recenter(&mut self, query: &str) -> Result<bool> {
        let zoom = self.settings.zoom;
        match self.bound.as_mut() {
            Some(bound) if bound.address == query => {
                self.widget.set_view(&mut bound.handle, bound.center, zoom)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Destroy the live map, if any. Returns whether one was destroyed.
    pub fn teardown(&mut self) -> bool {
        match self.bound.take() {
            Some(bound) => {
                debug!("map for {} destroyed", bound.address);
                self.widget.destroy(bound.handle);
                true
            }
            None => false,
        }
    }
}

impl<W: MapWidget> Drop for MapBinder<W> {
    fn drop(&mut self) {
        self.teardown();
    }
}
