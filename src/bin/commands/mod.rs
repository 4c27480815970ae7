pub mod config;
pub mod interactive;
pub mod lookup;
pub mod validate;

use ipgeo::lens::lookup::GeoSource;
use ipgeo::lens::map::{MapWidget, TileMapView};
use ipgeo::lens::view::LookupSession;
use serde_json::json;
use std::time::Duration;

/// How long to wait for a lookup: the HTTP timeout plus a second so the
/// transport reports its own timeout first
pub(crate) fn lookup_wait(timeout: Duration) -> Duration {
    timeout.saturating_add(Duration::from_secs(1))
}

/// Wait for the outstanding lookup with a spinner on stderr; false on timeout
pub(crate) fn wait_with_spinner<S, W>(
    session: &mut LookupSession<S, W>,
    timeout: Duration,
) -> bool
where
    S: GeoSource + Send + Sync + 'static,
    W: MapWidget,
{
    if !session.view().is_loading() {
        return true;
    }

    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_message(format!("looking up {}", session.view().query()));
    pb.enable_steady_tick(Duration::from_millis(100));
    let done = session.wait(timeout);
    pb.finish_and_clear();
    done
}

/// Human-readable lines describing the map panel
pub(crate) fn map_lines(view: &TileMapView) -> Vec<String> {
    let tile = view.center_tile();
    let mut lines = vec![
        format!("Map:    {}", view.permalink()),
        format!("Center: {} (zoom {})", view.center, view.zoom),
        format!("Tile:   {}/{}/{}", tile.z, tile.x, tile.y),
    ];
    if let Some(url) = view.tile_url() {
        lines.push(format!("Image:  {}", url));
    }
    if let Some(attribution) = view.attribution() {
        lines.push(attribution.to_string());
    }
    lines
}

/// JSON description of the map panel
pub(crate) fn map_json(view: &TileMapView) -> serde_json::Value {
    json!({
        "center": view.center,
        "zoom": view.zoom,
        "tile": view.center_tile(),
        "tile_url": view.tile_url(),
        "permalink": view.permalink(),
        "attribution": view.attribution(),
    })
}
