//! Geolocation Lookup Example
//!
//! Demonstrates a lookup session: submitting an address, waiting for the
//! service, rendering the result panel and reading the map position.
//!
//! # Running
//!
//! ```bash
//! cargo run --example lookup_lens --features lens-http
//! ```

use ipgeo::lens::lookup::{LookupLens, LookupOutcome};
use ipgeo::lens::map::{MapBinder, MapSettings, TileMap};
use ipgeo::lens::utils::OutputFormat;
use ipgeo::lens::view::presenter::format_panel;
use ipgeo::lens::view::LookupSession;
use ipgeo::IpgeoConfig;

fn main() -> anyhow::Result<()> {
    let config = IpgeoConfig::default();

    // One-shot lookup with the lens alone
    let lens = LookupLens::from_config(&config);
    match lens.lookup("1.1.1.1") {
        LookupOutcome::Success(record) => {
            println!("1.1.1.1 is in {:?}, {:?}", record.city, record.country_name);
        }
        LookupOutcome::Failure(failure) => println!("1.1.1.1: {}", failure),
    }

    // A session drives the same lens plus the map binder
    let binder = MapBinder::new(TileMap::new(), MapSettings::from(&config));
    let mut session = LookupSession::new(LookupLens::from_config(&config), binder);

    session.input("8.8.8.8");
    for alert in session.submit() {
        println!("alert: {}", alert);
    }
    if !session.wait(config.timeout()) {
        anyhow::bail!("lookup timed out");
    }

    session.show_more();
    println!("\n{}", format_panel(&session.panel(), OutputFormat::Text));

    if let Some(map) = session.visible_map() {
        let tile = map.center_tile();
        println!("\nMap: {}", map.permalink());
        println!("Tile: {}/{}/{}", tile.z, tile.x, tile.y);
    }

    Ok(())
}
