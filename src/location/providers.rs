//! Location providers: ip-api.com for IP geolocation, OpenStreetMap
//! Nominatim for geocoding.

use super::types::{GeocodedLocation, IpLocation, LocationError};
use crate::geo::Coordinate;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_IP_API_URL: &str = "http://ip-api.com/json/";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str =
    "ParaguayTourism/0.3 (tourist-places-catalog; contact: tourism@example.com)";

const IP_API: &str = "ip-api";
const NOMINATIM: &str = "nominatim";
const IP_API_FIELDS: &str = "status,message,lat,lon,city,country,countryCode,query";

// ─── Configuration ──────────────────────────────────────────────

/// Endpoints, timeouts and client identification for the providers.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub ip_api_url: String,
    pub geocoder_url: String,
    pub ip_timeout: Duration,
    pub geocode_timeout: Duration,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            ip_api_url: DEFAULT_IP_API_URL.into(),
            geocoder_url: DEFAULT_GEOCODER_URL.into(),
            ip_timeout: Duration::from_secs(5),
            geocode_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

fn agent(timeout: Duration, user_agent: &str) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
}

fn transport_error(provider: &'static str, e: ureq::Error) -> LocationError {
    let message = match e {
        ureq::Error::Status(code, _) => format!("HTTP status {}", code),
        ureq::Error::Transport(t) => t.to_string(),
    };
    LocationError::Network { provider, message }
}

/// An IP address or host name is sent as one URL path segment, so only
/// address characters are allowed through.
pub fn check_ip(ip: &str) -> Result<(), LocationError> {
    let ok = !ip.is_empty()
        && ip
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '-'));
    if ok {
        Ok(())
    } else {
        Err(LocationError::InvalidIp(ip.to_string()))
    }
}

// ─── Seams ──────────────────────────────────────────────────────

/// Something that can locate an IP address.
pub trait IpLocator: Send + Sync {
    /// Locate `ip`, or the caller's own address when `None`.
    fn locate(&self, ip: Option<&str>) -> Result<IpLocation, LocationError>;
}

/// Something that can turn free text into coordinates.
pub trait Geocoder: Send + Sync {
    /// Top match for `query`, restricted to `country_code` when given.
    fn geocode(
        &self,
        query: &str,
        country_code: Option<&str>,
    ) -> Result<GeocodedLocation, LocationError>;
}

// ─── ip-api.com provider ────────────────────────────────────────

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct IpApiResult {
    status: Option<String>,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    country: Option<String>,
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
    query: Option<String>,
}

/// Blocking client for the ip-api.com JSON endpoint.
pub struct IpApiClient {
    agent: ureq::Agent,
    base_url: String,
}

impl IpApiClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            agent: agent(config.ip_timeout, &config.user_agent),
            base_url: config.ip_api_url.clone(),
        }
    }
}

impl IpLocator for IpApiClient {
    fn locate(&self, ip: Option<&str>) -> Result<IpLocation, LocationError> {
        if let Some(ip) = ip {
            check_ip(ip)?;
        }
        let url = format!("{}{}", self.base_url, ip.unwrap_or(""));

        let response = self
            .agent
            .get(&url)
            .query("fields", IP_API_FIELDS)
            .call()
            .map_err(|e| transport_error(IP_API, e))?;

        let raw: Value = response
            .into_json()
            .map_err(|e| LocationError::InvalidResponse {
                provider: IP_API,
                message: e.to_string(),
            })?;

        parse_ip_api(raw, ip)
    }
}

/// Interpret an ip-api.com payload.
pub fn parse_ip_api(raw: Value, requested_ip: Option<&str>) -> Result<IpLocation, LocationError> {
    let r: IpApiResult =
        serde_json::from_value(raw.clone()).map_err(|e| LocationError::InvalidResponse {
            provider: IP_API,
            message: e.to_string(),
        })?;

    if r.status.as_deref() == Some("fail") {
        return Err(LocationError::Provider {
            provider: IP_API,
            message: r.message.unwrap_or_else(|| "geolocation failed".into()),
        });
    }

    Ok(IpLocation {
        latitude: r.lat,
        longitude: r.lon,
        city: r.city.unwrap_or_default(),
        country: r.country.unwrap_or_default(),
        country_code: r.country_code.unwrap_or_default(),
        ip: r.query.or_else(|| requested_ip.map(str::to_string)),
        raw,
    })
}

// ─── Nominatim provider ─────────────────────────────────────────

#[derive(Deserialize, Debug, Clone)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

/// Blocking client for the Nominatim search endpoint.
pub struct NominatimClient {
    agent: ureq::Agent,
    url: String,
}

impl NominatimClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            agent: agent(config.geocode_timeout, &config.user_agent),
            url: config.geocoder_url.clone(),
        }
    }
}

impl Geocoder for NominatimClient {
    fn geocode(
        &self,
        query: &str,
        country_code: Option<&str>,
    ) -> Result<GeocodedLocation, LocationError> {
        let mut request = self
            .agent
            .get(&self.url)
            .query("q", query)
            .query("format", "json")
            .query("limit", "1")
            .query("addressdetails", "1");
        if let Some(cc) = country_code {
            request = request.query("countrycodes", cc);
        }

        let response = request.call().map_err(|e| transport_error(NOMINATIM, e))?;

        let raw: Value = response
            .into_json()
            .map_err(|e| LocationError::InvalidResponse {
                provider: NOMINATIM,
                message: e.to_string(),
            })?;

        parse_nominatim(query, raw)
    }
}

/// Interpret a Nominatim search payload, keeping only the top match.
pub fn parse_nominatim(query: &str, raw: Value) -> Result<GeocodedLocation, LocationError> {
    let invalid = |message: String| LocationError::InvalidResponse {
        provider: NOMINATIM,
        message,
    };

    let Value::Array(mut matches) = raw else {
        return Err(invalid("expected a JSON array".into()));
    };
    if matches.is_empty() {
        return Err(LocationError::NotFound(query.to_string()));
    }

    let top = matches.swap_remove(0);
    let result: NominatimResult =
        serde_json::from_value(top.clone()).map_err(|e| invalid(e.to_string()))?;

    let latitude: f64 = result
        .lat
        .trim()
        .parse()
        .map_err(|_| invalid(format!("unparsable latitude '{}'", result.lat)))?;
    let longitude: f64 = result
        .lon
        .trim()
        .parse()
        .map_err(|_| invalid(format!("unparsable longitude '{}'", result.lon)))?;
    // "NaN" and "inf" parse as f64 but are not coordinates
    Coordinate::new(latitude, longitude).map_err(|e| invalid(e.to_string()))?;

    Ok(GeocodedLocation {
        latitude,
        longitude,
        display_name: result.display_name,
        query: query.to_string(),
        raw: top,
    })
}
