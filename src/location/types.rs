//! Core types for the location subsystem.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Approximate location of an IP address.
///
/// Coordinates are optional: the provider may report success without them,
/// and callers must decide what that means rather than assume (0, 0).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: String,
    pub country: String,
    pub country_code: String,
    /// The address the provider located (the caller's own when none was given)
    pub ip: Option<String>,
    /// Untouched provider payload
    pub raw: Value,
}

impl IpLocation {
    /// Both coordinates, or `None` if either is missing.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Top geocoding match for a free-text query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
    pub query: String,
    pub raw: Value,
}

/// Location resolution errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("{provider} request failed: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} reported failure: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned an invalid response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },

    #[error("location not found: {0}")]
    NotFound(String),

    #[error("empty location query")]
    EmptyQuery,

    #[error("invalid IP address or host '{0}'")]
    InvalidIp(String),
}

/// Wire shape of a location lookup: `{"success": true, ...fields}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct LocationReport<T> {
    pub success: bool,
    #[serde(flatten)]
    pub location: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<Result<T, LocationError>> for LocationReport<T> {
    fn from(result: Result<T, LocationError>) -> Self {
        match result {
            Ok(location) => Self {
                success: true,
                location: Some(location),
                error: None,
            },
            Err(e) => Self {
                success: false,
                location: None,
                error: Some(e.to_string()),
            },
        }
    }
}
