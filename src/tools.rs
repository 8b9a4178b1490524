//! Tool surface: the named operations exposed to callers.
//!
//! Every tool takes JSON arguments and returns a JSON payload. Location
//! failures are ordinary payloads (`"success": false`); only caller
//! mistakes (unknown tool, bad arguments) are `ToolError`s.

use crate::catalog::PlaceCatalog;
use crate::format::{self, PlaceListing, PlaceLookup, RankedListing};
use crate::geo::{filter_by_distance, Coordinate};
use crate::location::{
    GeocodedLocation, IpLocation, LocationReport, LocationResolver, DEFAULT_COUNTRY_CODE,
};
use crate::nearby::{self, DEFAULT_RADIUS_KM};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("invalid coordinates ({latitude}, {longitude}): latitude must be in -90..90, longitude in -180..180")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("invalid radius {0}: must be a finite, non-negative number of kilometers")]
    InvalidRadius(f64),

    #[error("cannot encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Name and description of a tool, for discovery.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

pub const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "list_all_tourist_places",
        description: "Lists every tourist place in Paraguay with name, city, category and GPS coordinates (lat, lng).",
    },
    ToolDescriptor {
        name: "get_tourist_place_by_id",
        description: "Returns all information about a tourist place by its ID.",
    },
    ToolDescriptor {
        name: "find_tourist_places_by_distance",
        description: "Finds tourist places within a distance of a given point, nearest first.",
    },
    ToolDescriptor {
        name: "get_current_location",
        description: "Returns the approximate current location based on the IP address.",
    },
    ToolDescriptor {
        name: "geocode_location",
        description: "Converts a city, address or place name into latitude and longitude.",
    },
    ToolDescriptor {
        name: "find_nearby_tourist_places",
        description: "Locates you by IP and finds tourist places within a distance, all in one call.",
    },
];

// ─── Arguments ──────────────────────────────────────────────────

/// Arguments of `get_tourist_place_by_id`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetPlaceArgs {
    /// ID of the place, e.g. "palacio-lopez".
    pub place_id: String,
}

/// Arguments of `find_tourist_places_by_distance`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DistanceArgs {
    /// Reference latitude in decimal degrees (e.g. -25.2822 for Asunción).
    pub latitude: f64,
    /// Reference longitude in decimal degrees (e.g. -57.6352 for Asunción).
    pub longitude: f64,
    /// Maximum distance in kilometers from the reference point (e.g. 50.0).
    pub max_distance_km: f64,
}

/// Arguments of `get_current_location`.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct LocateArgs {
    /// IP address or host to locate; omit to locate this machine.
    #[serde(default)]
    pub ip: Option<String>,
}

/// Arguments of `geocode_location`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GeocodeArgs {
    /// Location name, e.g. "Asunción", "Asunción, Paraguay" or "Palacio de los López".
    pub query: String,
    /// ISO 3166-1 alpha-2 code limiting the search (default "py"); "" searches worldwide.
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}

/// Arguments of `find_nearby_tourist_places`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NearbyArgs {
    /// Maximum distance in kilometers to search (default 100).
    #[serde(default = "default_radius")]
    pub max_distance_km: f64,
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_KM
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    // a missing body means "no arguments"
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

fn check_radius(max_distance_km: f64) -> Result<(), ToolError> {
    if max_distance_km.is_finite() && max_distance_km >= 0.0 {
        Ok(())
    } else {
        Err(ToolError::InvalidRadius(max_distance_km))
    }
}

// ─── Surface ────────────────────────────────────────────────────

/// All tools over one catalog and one resolver, built once at startup.
pub struct ToolSurface {
    catalog: Arc<dyn PlaceCatalog>,
    resolver: LocationResolver,
}

impl ToolSurface {
    pub fn new(catalog: Arc<dyn PlaceCatalog>, resolver: LocationResolver) -> Self {
        Self { catalog, resolver }
    }

    pub fn descriptors(&self) -> &'static [ToolDescriptor] {
        TOOLS
    }

    pub fn list_all_tourist_places(&self) -> PlaceListing {
        format::list_places(self.catalog.list())
    }

    pub fn get_tourist_place_by_id(&self, place_id: &str) -> PlaceLookup {
        PlaceLookup::from(self.catalog.get(place_id))
    }

    pub fn find_tourist_places_by_distance(
        &self,
        latitude: f64,
        longitude: f64,
        max_distance_km: f64,
    ) -> Result<RankedListing, ToolError> {
        Coordinate::new(latitude, longitude)
            .map_err(|_| ToolError::InvalidCoordinates { latitude, longitude })?;
        check_radius(max_distance_km)?;

        let ranked = filter_by_distance(self.catalog.list(), latitude, longitude, max_distance_km);
        Ok(format::list_ranked(&ranked))
    }

    pub fn get_current_location(&self, ip: Option<&str>) -> LocationReport<IpLocation> {
        self.resolver.locate_by_ip(ip).into()
    }

    pub fn geocode_location(
        &self,
        query: &str,
        country_code: &str,
    ) -> LocationReport<GeocodedLocation> {
        self.resolver.geocode(query, Some(country_code)).into()
    }

    pub fn find_nearby_tourist_places(&self, max_distance_km: f64) -> Result<Value, ToolError> {
        check_radius(max_distance_km)?;
        let outcome = nearby::find_nearby(&self.resolver, self.catalog.as_ref(), max_distance_km);
        Ok(serde_json::to_value(&outcome)?)
    }

    /// Dispatch a tool by name with JSON arguments.
    pub fn call(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        tracing::debug!(tool = name, "tool call");
        let result = match name {
            "list_all_tourist_places" => serde_json::to_value(self.list_all_tourist_places())?,
            "get_tourist_place_by_id" => {
                let a: GetPlaceArgs = parse_args(name, args)?;
                serde_json::to_value(self.get_tourist_place_by_id(&a.place_id))?
            }
            "find_tourist_places_by_distance" => {
                let a: DistanceArgs = parse_args(name, args)?;
                serde_json::to_value(self.find_tourist_places_by_distance(
                    a.latitude,
                    a.longitude,
                    a.max_distance_km,
                )?)?
            }
            "get_current_location" => {
                let a: LocateArgs = parse_args(name, args)?;
                serde_json::to_value(self.get_current_location(a.ip.as_deref()))?
            }
            "geocode_location" => {
                let a: GeocodeArgs = parse_args(name, args)?;
                serde_json::to_value(self.geocode_location(&a.query, &a.country_code))?
            }
            "find_nearby_tourist_places" => {
                let a: NearbyArgs = parse_args(name, args)?;
                self.find_nearby_tourist_places(a.max_distance_km)?
            }
            _ => return Err(ToolError::UnknownTool(name.to_string())),
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::location::resolver::stubs::*;
    use crate::location::LocationError;
    use serde_json::json;

    fn surface() -> ToolSurface {
        let resolver = resolver(
            stub_ip(Ok(asuncion_ip())),
            stub_geocoder(Ok(asuncion_geocoded("Asunción"))),
        );
        ToolSurface::new(Arc::new(Catalog::builtin().unwrap()), resolver)
    }

    #[test]
    fn test_every_descriptor_dispatches() {
        let s = surface();
        let args = json!({
            "place_id": "mercado-4",
            "latitude": -25.28,
            "longitude": -57.63,
            "max_distance_km": 10.0,
            "query": "Asunción"
        });
        for tool in s.descriptors() {
            let result = s.call(tool.name, args.clone());
            assert!(result.is_ok(), "{} failed: {:?}", tool.name, result);
        }
    }

    #[test]
    fn test_list_all() {
        let v = surface().call("list_all_tourist_places", Value::Null).unwrap();
        assert_eq!(v["total"], v["raw"].as_array().unwrap().len());
        assert!(v["table"].as_str().unwrap().contains("Palacio de los López"));
    }

    #[test]
    fn test_get_by_id() {
        let s = surface();
        let v = s.call("get_tourist_place_by_id", json!({"place_id": "basilica-caacupe"})).unwrap();
        assert_eq!(v["found"], true);
        assert_eq!(v["place"]["name"], "Basílica de Caacupé");

        let v = s.call("get_tourist_place_by_id", json!({"place_id": "nope"})).unwrap();
        assert_eq!(v["found"], false);
        assert!(v["message"].is_string());
    }

    #[test]
    fn test_get_by_id_requires_argument() {
        let err = surface().call("get_tourist_place_by_id", json!({})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn test_by_distance_nearest_first() {
        let v = surface()
            .call(
                "find_tourist_places_by_distance",
                json!({"latitude": -27.1311, "longitude": -55.7031, "max_distance_km": 40.0}),
            )
            .unwrap();
        let raw = v["raw"].as_array().unwrap();
        assert_eq!(raw[0]["id"], "trinidad-jesuit");
        assert_eq!(raw[0]["distance_km"], 0.0);
        let distances: Vec<f64> = raw.iter().map(|r| r["distance_km"].as_f64().unwrap()).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert!(distances.iter().all(|d| *d <= 40.0));
    }

    #[test]
    fn test_by_distance_rejects_bad_input() {
        let s = surface();
        assert!(matches!(
            s.find_tourist_places_by_distance(91.0, 0.0, 10.0),
            Err(ToolError::InvalidCoordinates { .. })
        ));
        assert!(matches!(
            s.find_tourist_places_by_distance(f64::NAN, 0.0, 10.0),
            Err(ToolError::InvalidCoordinates { .. })
        ));
        assert!(matches!(
            s.find_tourist_places_by_distance(0.0, 0.0, -5.0),
            Err(ToolError::InvalidRadius(_))
        ));
        assert!(matches!(
            s.find_nearby_tourist_places(f64::INFINITY),
            Err(ToolError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_current_location_payload() {
        let v = surface().call("get_current_location", Value::Null).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["country_code"], "PY");
        assert_eq!(v["ip"], "181.120.0.1");
    }

    #[test]
    fn test_geocode_defaults_to_paraguay() {
        let geocoder = stub_geocoder(Ok(asuncion_geocoded("Asunción")));
        let calls = geocoder.calls.clone();
        let s = ToolSurface::new(
            Arc::new(Catalog::builtin().unwrap()),
            resolver(stub_ip(Ok(asuncion_ip())), geocoder),
        );

        let v = s.call("geocode_location", json!({"query": "Asunción"})).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["display_name"], "Asunción, Paraguay");
        assert_eq!(calls.lock().unwrap()[0].1.as_deref(), Some("py"));
    }

    #[test]
    fn test_geocode_failure_payload() {
        let s = ToolSurface::new(
            Arc::new(Catalog::builtin().unwrap()),
            resolver(
                stub_ip(Ok(asuncion_ip())),
                stub_geocoder(Err(LocationError::NotFound("Atlantis".into()))),
            ),
        );
        let v = s.call("geocode_location", json!({"query": "Atlantis", "country_code": ""})).unwrap();
        assert_eq!(v, json!({"success": false, "error": "location not found: Atlantis"}));
    }

    #[test]
    fn test_nearby_default_radius() {
        let v = surface().call("find_nearby_tourist_places", json!({})).unwrap();
        assert_eq!(v["success"], true);
        let raw = v["places"]["raw"].as_array().unwrap();
        assert!(raw.iter().all(|r| r["distance_km"].as_f64().unwrap() <= DEFAULT_RADIUS_KM));
        assert!(raw.iter().any(|r| r["id"] == "basilica-caacupe"));
    }

    #[test]
    fn test_unknown_tool() {
        let err = surface().call("delete_everything", Value::Null).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref n) if n == "delete_everything"));
    }
}
