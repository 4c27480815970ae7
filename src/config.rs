use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Default geolocation service base URL
pub const DEFAULT_API_URL: &str = "https://ipapi.co";

/// Default map tile URL template (Leaflet-style placeholders)
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png?lang=en";

/// Default attribution shown with the tile layer
pub const DEFAULT_TILE_ATTRIBUTION: &str = "Map data © OpenStreetMap contributors";

/// Longest accepted lookup timeout (one day)
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

#[derive(Debug, Clone, Serialize)]
pub struct IpgeoConfig {
    /// Base URL of the geolocation service, requests go to `<api_url>/<address>/json/`
    pub api_url: String,

    /// HTTP timeout for a single lookup in seconds (default: 10)
    pub timeout_secs: u64,

    /// Zoom level used when centering the map on a result (default: 13)
    pub map_zoom: u8,

    /// Tile layer URL template
    pub tile_url: String,

    /// Attribution text for the tile layer
    pub tile_attribution: String,
}

const EMPTY_CONFIG: &str = r#"### ipgeo configuration file

### geolocation service base URL
# api_url = "https://ipapi.co"

### lookup timeout (in seconds)
# timeout_secs = 10

### map settings
# map_zoom = 13
# tile_url = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png?lang=en"
# tile_attribution = "Map data © OpenStreetMap contributors"
"#;

impl Default for IpgeoConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 10,
            map_zoom: 13,
            tile_url: DEFAULT_TILE_URL.to_string(),
            tile_attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
        }
    }
}

impl IpgeoConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<IpgeoConfig> {
        let mut builder = Config::builder();

        // Add in toml configuration file
        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                // By default use $HOME/.ipgeo/ipgeo.toml as the configuration file path
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not find home directory"))?
                    .to_str()
                    .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
                    .to_owned();
                let ipgeo_dir = format!("{}/.ipgeo", home_dir.as_str());

                std::fs::create_dir_all(ipgeo_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create ipgeo directory: {}", e))?;
                let p = format!("{}/ipgeo.toml", ipgeo_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // Add in settings from the environment (with a prefix of IPGEO)
        // E.g., `IPGEO_API_URL=http://localhost:8080 ./ipgeo` would set the service URL
        builder = builder.add_source(config::Environment::with_prefix("IPGEO"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    /// Build a configuration from flat key/value settings, falling back to defaults
    fn from_map(config: &HashMap<String, String>) -> Result<IpgeoConfig> {
        let defaults = IpgeoConfig::default();

        let api_url = match config.get("api_url") {
            Some(url) if url.trim().is_empty() => return Err(anyhow!("api_url must not be empty")),
            Some(url) => url.trim_end_matches('/').to_string(),
            None => defaults.api_url,
        };

        let timeout_secs = match config.get("timeout_secs").and_then(|s| s.parse::<u64>().ok()) {
            Some(secs) if secs == 0 || secs > MAX_TIMEOUT_SECS => {
                return Err(anyhow!(
                    "timeout_secs must be between 1 and {}",
                    MAX_TIMEOUT_SECS
                ))
            }
            Some(secs) => secs,
            None => defaults.timeout_secs,
        };

        // Zoom levels beyond 19 have no OpenStreetMap tiles
        let map_zoom = match config.get("map_zoom").and_then(|s| s.parse::<u8>().ok()) {
            Some(zoom) if zoom > 19 => return Err(anyhow!("map_zoom must be between 0 and 19")),
            Some(zoom) => zoom,
            None => defaults.map_zoom,
        };

        let tile_url = config
            .get("tile_url")
            .cloned()
            .unwrap_or(defaults.tile_url);

        let tile_attribution = config
            .get("tile_attribution")
            .cloned()
            .unwrap_or(defaults.tile_attribution);

        Ok(IpgeoConfig {
            api_url,
            timeout_secs,
            map_zoom,
            tile_url,
            tile_attribution,
        })
    }

    /// Get lookup timeout as Duration
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let lines = [
            format!("Config File:        {}", Self::config_file_path()),
            format!("API URL:            {}", self.api_url),
            format!("Timeout:            {} seconds", self.timeout_secs),
            format!("Map Zoom:           {}", self.map_zoom),
            format!("Tile URL:           {}", self.tile_url),
            format!("Tile Attribution:   {}", self.tile_attribution),
        ];
        lines.join("\n")
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.ipgeo/ipgeo.toml", home_dir)
    }
}
