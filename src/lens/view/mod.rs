//! Lookup view lens
//!
//! The lookup view is one state machine ([`LookupView`]) driven by discrete
//! events (text input, submit, toggle clicks, lookup completion). Transitions
//! are pure and return [`Effect`]s; [`LookupSession`] runs those effects
//! against a lookup lens and a map widget.
//!
//! # Example
//!
//! ```rust,ignore
//! use ipgeo::lens::lookup::LookupLens;
//! use ipgeo::lens::map::{MapBinder, MapSettings, TileMap};
//! use ipgeo::lens::view::{presenter, LookupSession};
//!
//! let lens = LookupLens::from_config(&config);
//! let binder = MapBinder::new(TileMap::new(), MapSettings::from(&config));
//! let mut session = LookupSession::new(lens, binder);
//!
//! session.input("8.8.8.8");
//! for alert in session.submit() {
//!     eprintln!("{alert}");
//! }
//! session.wait(config.timeout());
//! println!("{}", presenter::format_panel(&session.panel(), OutputFormat::Text));
//! ```

pub mod presenter;
mod session;
mod state;

pub use presenter::{Panel, ResultField};
pub use session::LookupSession;
pub use state::{Effect, LookupView, Phase, RequestId, Toggle, ViewEvent};
