//! Geolocation lookup lens
//!
//! Issues one request per validated query to the geolocation service and
//! classifies the response into a [`LookupOutcome`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ipgeo::lens::lookup::{IpapiSource, LookupLens, LookupOutcome};
//!
//! let lens = LookupLens::new(IpapiSource::new("https://ipapi.co", timeout));
//! match lens.lookup("8.8.8.8") {
//!     LookupOutcome::Success(record) => println!("{:?}", record.city),
//!     LookupOutcome::Failure(failure) => eprintln!("{failure}"),
//! }
//! ```

mod types;

pub use types::*;

use anyhow::Result;
use tracing::debug;

// =============================================================================
// Source
// =============================================================================

/// Where lookup responses come from
///
/// Implementations perform the transport only; classification happens in
/// [`classify_response`]. Any `Err` is reported as a transport failure.
pub trait GeoSource {
    fn fetch(&self, address: &str) -> Result<GeoResponse>;
}

impl<S: GeoSource + ?Sized> GeoSource for std::sync::Arc<S> {
    fn fetch(&self, address: &str) -> Result<GeoResponse> {
        (**self).fetch(address)
    }
}

/// `ipapi.co` style JSON endpoint: `GET <base_url>/<address>/json/`
///
/// Error statuses are not transport failures: their JSON body carries the
/// `error`/`reason` fields the classifier reads.
#[cfg(feature = "lens-http")]
pub struct IpapiSource {
    base_url: String,
    agent: ureq::Agent,
}

#[cfg(feature = "lens-http")]
impl IpapiSource {
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn from_config(config: &crate::IpgeoConfig) -> Self {
        Self::new(config.api_url.as_str(), config.timeout())
    }

    /// Request URL for an address
    pub fn url_for(&self, address: &str) -> String {
        format!("{}/{}/json/", self.base_url, address)
    }
}

#[cfg(feature = "lens-http")]
impl GeoSource for IpapiSource {
    fn fetch(&self, address: &str) -> Result<GeoResponse> {
        let url = self.url_for(address);
        debug!("requesting {}", url);
        let body: serde_json::Value = self.agent.get(&url).call()?.body_mut().read_json()?;
        debug!("API response: {}", body);
        Ok(serde_json::from_value(body)?)
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Classify a service response into exactly one outcome.
///
/// Precedence: reserved block, explicit service error, missing city, success.
/// A body without an `ip` field is not a location record and counts as a
/// transport failure.
pub fn classify_response(resp: GeoResponse) -> LookupOutcome {
    if resp.reserved == Some(true) {
        return LookupFailure::Reserved.into();
    }
    if resp.error == Some(true) {
        let reason = resp
            .reason
            .unwrap_or_else(|| UNKNOWN_SERVICE_ERROR.to_string());
        return LookupFailure::ServiceError(reason).into();
    }
    if resp.city.is_none() {
        return LookupFailure::NotFound.into();
    }
    let Some(ip) = resp.ip else {
        return LookupFailure::TransportFailure("response has no ip field".to_string()).into();
    };

    LookupOutcome::Success(LookupRecord {
        ip,
        country_name: resp.country_name,
        city: resp.city,
        version: resp.version,
        latitude: resp.latitude,
        longitude: resp.longitude,
        currency: resp.currency,
        country_capital: resp.country_capital,
    })
}

// =============================================================================
// Lens
// =============================================================================

/// Geolocation lookup lens
pub struct LookupLens<S> {
    source: S,
}

impl<S: GeoSource> LookupLens<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Look up one address. Never fails: transport errors become
    /// [`LookupFailure::TransportFailure`].
    pub fn lookup(&self, address: &str) -> LookupOutcome {
        match self.source.fetch(address) {
            Ok(resp) => classify_response(resp),
            Err(e) => {
                debug!("lookup for {} failed: {:#}", address, e);
                LookupFailure::TransportFailure(e.to_string()).into()
            }
        }
    }
}

#[cfg(feature = "lens-http")]
impl LookupLens<IpapiSource> {
    /// Lens backed by the configured HTTP service
    pub fn from_config(config: &crate::IpgeoConfig) -> Self {
        Self::new(IpapiSource::from_config(config))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct JsonSource(&'static str);

    impl GeoSource for JsonSource {
        fn fetch(&self, _address: &str) -> Result<GeoResponse> {
            Ok(serde_json::from_str(self.0)?)
        }
    }

    struct FailingSource;

    impl GeoSource for FailingSource {
        fn fetch(&self, _address: &str) -> Result<GeoResponse> {
            Err(anyhow!("connection refused"))
        }
    }

    const GOOGLE_DNS: &str = r#"{
        "ip": "8.8.8.8",
        "version": "IPv4",
        "city": "Mountain View",
        "country_name": "United States",
        "country_capital": "Washington",
        "latitude": 37.4,
        "longitude": -122.1,
        "currency": "USD"
    }"#;

    #[test]
    fn test_success() {
        let lens = LookupLens::new(JsonSource(GOOGLE_DNS));
        let LookupOutcome::Success(record) = lens.lookup("8.8.8.8") else {
            panic!("expected success");
        };
        assert_eq!(record.ip, "8.8.8.8");
        assert_eq!(record.city.as_deref(), Some("Mountain View"));
        assert_eq!(record.coordinates(), Some((37.4, -122.1)));
        assert_eq!(record.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_service_error_reason_is_verbatim() {
        let lens = LookupLens::new(JsonSource(r#"{"error": true, "reason": "Invalid IP"}"#));
        let outcome = lens.lookup("1.2.3.4");
        assert_eq!(
            outcome,
            LookupOutcome::Failure(LookupFailure::ServiceError("Invalid IP".to_string()))
        );
        assert_eq!(outcome.message().as_deref(), Some("Invalid IP"));
    }

    #[test]
    fn test_service_error_without_reason() {
        let lens = LookupLens::new(JsonSource(r#"{"error": true}"#));
        assert_eq!(
            lens.lookup("1.2.3.4").message().as_deref(),
            Some(UNKNOWN_SERVICE_ERROR)
        );
    }

    #[test]
    fn test_not_found() {
        let lens = LookupLens::new(JsonSource(r#"{"ip": "1.2.3.4", "city": null}"#));
        assert_eq!(
            lens.lookup("1.2.3.4"),
            LookupOutcome::Failure(LookupFailure::NotFound)
        );
    }

    #[test]
    fn test_reserved_wins_over_missing_city_and_error() {
        let body = r#"{"ip": "10.0.0.1", "error": true, "reason": "Reserved IP Address", "reserved": true, "city": null}"#;
        let lens = LookupLens::new(JsonSource(body));
        assert_eq!(
            lens.lookup("10.0.0.1"),
            LookupOutcome::Failure(LookupFailure::Reserved)
        );

        let lens = LookupLens::new(JsonSource(r#"{"ip": "192.168.0.1", "reserved": true}"#));
        assert_eq!(
            lens.lookup("192.168.0.1").message().as_deref(),
            Some(RESERVED_MESSAGE)
        );
    }

    #[test]
    fn test_missing_ip_is_transport_failure() {
        let lens = LookupLens::new(JsonSource(r#"{"city": "Nowhere"}"#));
        assert!(matches!(
            lens.lookup("1.2.3.4"),
            LookupOutcome::Failure(LookupFailure::TransportFailure(_))
        ));
    }

    #[test]
    fn test_transport_failure() {
        let lens = LookupLens::new(FailingSource);
        let outcome = lens.lookup("8.8.8.8");
        assert_eq!(
            outcome,
            LookupOutcome::Failure(LookupFailure::TransportFailure(
                "connection refused".to_string()
            ))
        );
        assert_eq!(outcome.message().as_deref(), Some(TRANSPORT_MESSAGE));
    }

    #[test]
    fn test_non_json_body_is_transport_failure() {
        let lens = LookupLens::new(JsonSource("<html>rate limited</html>"));
        assert!(!lens.lookup("8.8.8.8").is_success());
        assert_eq!(
            lens.lookup("8.8.8.8").message().as_deref(),
            Some(TRANSPORT_MESSAGE)
        );
    }

    #[cfg(feature = "lens-http")]
    #[test]
    fn test_ipapi_url() {
        let source = IpapiSource::new("https://ipapi.co/", std::time::Duration::from_secs(1));
        assert_eq!(source.url_for("8.8.8.8"), "https://ipapi.co/8.8.8.8/json/");
        assert_eq!(source.url_for("::1"), "https://ipapi.co/::1/json/");
    }
}
