#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! ipgeo - IP address geolocation toolkit
//!
//! ipgeo validates IP address literals, looks them up against an
//! `ipapi.co`-style geolocation service and presents the result together with
//! a map position. It can be used as both a command-line application and a
//! library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `lens-core` | Validator, view state machine, presenter, map binder | `regex`, `thiserror` |
//! | `lens-http` | HTTP lookup source | `ureq` |
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | Full CLI binary | All above + `clap`, `indicatif` |
//!
//! ```toml
//! # Validation and view logic only, bring your own transport
//! ipgeo = { version = "0.1", default-features = false, features = ["lens-core"] }
//!
//! # Default (CLI binary)
//! ipgeo = "0.1"
//! ```
//!
//! # Architecture
//!
//! - **[`lens`]**: business logic (feature-gated)
//!   - `validate`: IPv4/IPv6 format validation
//!   - `lookup`: geolocation lookups and outcome classification
//!   - `view`: lookup view state machine, presenter and session driver
//!   - `map`: map widget capability trait, binder and tile adapter
//!
//! - **[`config`]**: Configuration management
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ipgeo::lens::lookup::LookupLens;
//! use ipgeo::lens::map::{MapBinder, MapSettings, TileMap};
//! use ipgeo::lens::view::LookupSession;
//! use ipgeo::IpgeoConfig;
//!
//! let config = IpgeoConfig::new(&None)?;
//! let mut session = LookupSession::new(
//!     LookupLens::from_config(&config),
//!     MapBinder::new(TileMap::new(), MapSettings::from(&config)),
//! );
//!
//! session.input("8.8.8.8");
//! session.submit();
//! session.wait(config.timeout());
//!
//! if let Some(record) = session.view().visible_result() {
//!     println!("{:?}, {:?}", record.city, record.country_name);
//! }
//! ```

pub mod config;

// Lens module - feature gated
#[cfg(feature = "lens-core")]
pub mod lens;

// =============================================================================
// Configuration (always available)
// =============================================================================

pub use config::IpgeoConfig;

// =============================================================================
// Lens Module - Feature-gated exports
// =============================================================================

#[cfg(feature = "lens-core")]
pub use lens::utils::OutputFormat;

#[cfg(feature = "lens-core")]
pub use lens::lookup::{GeoResponse, GeoSource, LookupFailure, LookupLens, LookupOutcome, LookupRecord};

#[cfg(feature = "lens-http")]
pub use lens::lookup::IpapiSource;

#[cfg(feature = "lens-core")]
pub use lens::validate::{detect_format, is_valid_ip_format, IpFormat};

#[cfg(feature = "lens-core")]
pub use lens::view::{LookupSession, LookupView, Panel, Phase};
