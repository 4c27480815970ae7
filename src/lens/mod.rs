//! Lens module
//!
//! This module provides high-level "lens" abstractions that combine business logic
//! with output formatting. Lenses are designed to be reusable across different
//! interfaces (CLI, GUI, web front ends).
//!
//! # Feature Requirements
//!
//! | Lens | Feature Required | Dependencies |
//! |------|-----------------|--------------|
//! | `validate` | `lens-core` | regex |
//! | `view` | `lens-core` | (none) |
//! | `map` | `lens-core` | (none) |
//! | `lookup` (`IpapiSource`) | `lens-http` | ureq |
//!
//! # Architecture
//!
//! - **`validate`**: IPv4/IPv6 literal grammar checks gating every submission
//! - **`lookup`**: one request per query, classified into a `LookupOutcome`
//! - **`view`**: the view state machine, its presenter and the session driver
//! - **`map`**: the map widget capability trait, binder and tile adapter
//!
//! # Usage
//!
//! ```rust,ignore
//! // Format validation (lens-core)
//! use ipgeo::lens::validate::{is_valid_ip_format, detect_format};
//!
//! // Lookups (lens-http)
//! use ipgeo::lens::lookup::{IpapiSource, LookupLens, LookupOutcome};
//!
//! // Interactive session (lens-core + a GeoSource)
//! use ipgeo::lens::view::{LookupSession, Panel};
//! ```

// =============================================================================
// Utility module (always available when any lens feature is enabled)
// =============================================================================
pub mod utils;

// =============================================================================
// Core lenses (lens-core feature)
// =============================================================================

// Format validator - IPv4/IPv6 literal grammars
pub mod validate;

// Lookup lens - classification always, HTTP source with lens-http
pub mod lookup;

// Map binder - capability trait and tile adapter
pub mod map;

// Lookup view - state machine, presenter, session
pub mod view;
