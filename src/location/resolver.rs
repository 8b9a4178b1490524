//! Location resolver: the single entry point for IP lookup and geocoding.
//!
//! Every failure comes back as a `LocationError` value; nothing here panics
//! or retries. A failed call is reported immediately and the caller decides
//! whether to try again.

use super::providers::{
    check_ip, Geocoder, IpApiClient, IpLocator, NominatimClient, ProviderConfig,
};
use super::types::{GeocodedLocation, IpLocation, LocationError};

/// Country filter applied to geocoding when the caller does not give one.
pub const DEFAULT_COUNTRY_CODE: &str = "py";

/// The location resolver over an IP locator and a geocoder.
pub struct LocationResolver {
    ip: Box<dyn IpLocator>,
    geocoder: Box<dyn Geocoder>,
}

impl LocationResolver {
    /// Resolver backed by the real network providers.
    pub fn new(config: &ProviderConfig) -> Self {
        Self::with_providers(
            Box::new(IpApiClient::new(config)),
            Box::new(NominatimClient::new(config)),
        )
    }

    /// Create a resolver over arbitrary providers (stubs in tests).
    pub fn with_providers(ip: Box<dyn IpLocator>, geocoder: Box<dyn Geocoder>) -> Self {
        Self { ip, geocoder }
    }

    /// Locate an IP address; `None` locates the caller's own public address.
    pub fn locate_by_ip(&self, ip: Option<&str>) -> Result<IpLocation, LocationError> {
        let ip = ip.map(str::trim).filter(|s| !s.is_empty());
        if let Some(ip) = ip {
            if let Err(e) = check_ip(ip) {
                tracing::warn!(error = %e, "IP location rejected");
                return Err(e);
            }
        }
        match self.ip.locate(ip) {
            Ok(loc) => {
                tracing::info!(
                    ip = loc.ip.as_deref().unwrap_or("-"),
                    city = %loc.city,
                    has_coordinates = loc.coordinates().is_some(),
                    "IP location resolved"
                );
                Ok(loc)
            }
            Err(e) => {
                tracing::warn!(error = %e, "IP location failed");
                Err(e)
            }
        }
    }

    /// Approximate location of this machine.
    pub fn current_location(&self) -> Result<IpLocation, LocationError> {
        self.locate_by_ip(None)
    }

    /// Geocode free text. An empty or blank country code means unrestricted.
    ///
    /// The provider sees the trimmed query; the result and any not-found
    /// error echo the caller's text as given.
    pub fn geocode(
        &self,
        query: &str,
        country_code: Option<&str>,
    ) -> Result<GeocodedLocation, LocationError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(LocationError::EmptyQuery);
        }
        let country_code = country_code.map(str::trim).filter(|cc| !cc.is_empty());

        let result = self
            .geocoder
            .geocode(trimmed, country_code)
            .map(|loc| GeocodedLocation {
                query: query.to_string(),
                ..loc
            })
            .map_err(|e| match e {
                LocationError::NotFound(_) => LocationError::NotFound(query.to_string()),
                other => other,
            });

        match result {
            Ok(loc) => {
                tracing::info!(
                    query,
                    country = country_code.unwrap_or("*"),
                    display_name = %loc.display_name,
                    "geocoded"
                );
                Ok(loc)
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "geocoding failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod stubs {
    //! Canned providers for tests across the crate.

    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Returns a fixed result and counts calls.
    pub struct StubIp {
        pub result: Result<IpLocation, LocationError>,
        pub calls: Arc<AtomicUsize>,
        pub last_ip: Arc<Mutex<Option<String>>>,
    }

    impl IpLocator for StubIp {
        fn locate(&self, ip: Option<&str>) -> Result<IpLocation, LocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_ip.lock().unwrap() = ip.map(str::to_string);
            self.result.clone()
        }
    }

    /// Returns a fixed result and records the arguments it was called with.
    pub struct StubGeocoder {
        pub result: Result<GeocodedLocation, LocationError>,
        pub calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
    }

    impl Geocoder for StubGeocoder {
        fn geocode(
            &self,
            query: &str,
            country_code: Option<&str>,
        ) -> Result<GeocodedLocation, LocationError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), country_code.map(str::to_string)));
            self.result.clone()
        }
    }

    pub fn asuncion_ip() -> IpLocation {
        IpLocation {
            latitude: Some(-25.2822),
            longitude: Some(-57.6352),
            city: "Asunción".into(),
            country: "Paraguay".into(),
            country_code: "PY".into(),
            ip: Some("181.120.0.1".into()),
            raw: json!({"status": "success", "lat": -25.2822, "lon": -57.6352}),
        }
    }

    pub fn asuncion_geocoded(query: &str) -> GeocodedLocation {
        GeocodedLocation {
            latitude: -25.28,
            longitude: -57.635,
            display_name: "Asunción, Paraguay".into(),
            query: query.into(),
            raw: json!({"display_name": "Asunción, Paraguay"}),
        }
    }

    pub fn stub_ip(result: Result<IpLocation, LocationError>) -> StubIp {
        StubIp {
            result,
            calls: Arc::new(AtomicUsize::new(0)),
            last_ip: Arc::new(Mutex::new(None)),
        }
    }

    pub fn stub_geocoder(result: Result<GeocodedLocation, LocationError>) -> StubGeocoder {
        StubGeocoder {
            result,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn resolver(ip: StubIp, geocoder: StubGeocoder) -> LocationResolver {
        LocationResolver::with_providers(Box::new(ip), Box::new(geocoder))
    }
}
