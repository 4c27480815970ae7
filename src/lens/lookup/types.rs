//! Types for geolocation lookups

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when the service has no city for the address
pub const NOT_FOUND_MESSAGE: &str = "This IP address does not exist";

/// Message shown for reserved (private/special-use) address blocks
pub const RESERVED_MESSAGE: &str = "Reserved IP Address";

/// Message shown when the request itself fails
pub const TRANSPORT_MESSAGE: &str = "An error occurred. Please try again.";

/// Fallback when the service flags an error without giving a reason
pub const UNKNOWN_SERVICE_ERROR: &str = "Lookup failed";

/// Raw response body of the geolocation service
///
/// Every field is optional: error bodies carry only `ip`, `error`, `reason`
/// and sometimes `reserved`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoResponse {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub error: Option<bool>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub reserved: Option<bool>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub country_capital: Option<String>,
}

/// A successful location record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupRecord {
    /// The address the service resolved (compared against the query text)
    pub ip: String,
    pub country_name: Option<String>,
    pub city: Option<String>,
    pub version: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub currency: Option<String>,
    pub country_capital: Option<String>,
}

impl LookupRecord {
    /// Both coordinates, when the service provided them
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Every way a lookup can fail, with the message shown in the error panel
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum LookupFailure {
    /// The service answered with an explicit error; the reason is shown verbatim
    #[error("{0}")]
    ServiceError(String),
    /// The service has no city for the address
    #[error("This IP address does not exist")]
    NotFound,
    /// The address belongs to a reserved block
    #[error("Reserved IP Address")]
    Reserved,
    /// The request failed or the body was unusable; the detail is logged, not shown
    #[error("An error occurred. Please try again.")]
    TransportFailure(String),
}

/// Classified result of one lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    Success(LookupRecord),
    Failure(LookupFailure),
}

impl LookupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LookupOutcome::Success(_))
    }

    /// User-facing error message, if this is a failure
    pub fn message(&self) -> Option<String> {
        match self {
            LookupOutcome::Success(_) => None,
            LookupOutcome::Failure(failure) => Some(failure.to_string()),
        }
    }
}

impl From<LookupFailure> for LookupOutcome {
    fn from(failure: LookupFailure) -> Self {
        LookupOutcome::Failure(failure)
    }
}
