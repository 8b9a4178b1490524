//! Nearby-places workflow: locate the caller by IP, then rank the catalog
//! by distance from that point.
//!
//! Flow:  IP lookup → coordinates check → radius filter
//!
//! A failed lookup stops the flow before the catalog is touched.

use crate::catalog::PlaceCatalog;
use crate::format;
use crate::geo::{filter_by_distance, RankedPlace};
use crate::location::{IpLocation, LocationError, LocationResolver};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const DEFAULT_RADIUS_KM: f64 = 100.0;

pub const SUGGESTION: &str = "Try 'geocode_location' with the name of your city, \
     or 'find_tourist_places_by_distance' with manual coordinates.";

pub const MISSING_COORDINATES: &str = "could not obtain coordinates for the current location";

/// Where the search was centered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
}

/// The three ways a nearby search can end.
#[derive(Debug, Clone, PartialEq)]
pub enum NearbyOutcome<'a> {
    Found {
        location: LocationSummary,
        places: Vec<RankedPlace<'a>>,
    },
    /// The IP lookup itself failed.
    LocationUnavailable { error: LocationError },
    /// The lookup succeeded but carried no usable coordinates.
    MissingCoordinates { location: IpLocation },
}

impl NearbyOutcome<'_> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Places within `max_distance_km` of the caller's IP location.
pub fn find_nearby<'a>(
    resolver: &LocationResolver,
    catalog: &'a dyn PlaceCatalog,
    max_distance_km: f64,
) -> NearbyOutcome<'a> {
    let location = match resolver.current_location() {
        Ok(loc) => loc,
        Err(error) => {
            tracing::warn!(error = %error, "nearby search aborted: no location");
            return NearbyOutcome::LocationUnavailable { error };
        }
    };

    let Some((latitude, longitude)) = location.coordinates() else {
        tracing::warn!(raw = %location.raw, "nearby search aborted: location has no coordinates");
        return NearbyOutcome::MissingCoordinates { location };
    };

    let places = filter_by_distance(catalog.list(), latitude, longitude, max_distance_km);
    tracing::info!(
        latitude,
        longitude,
        radius_km = max_distance_km,
        found = places.len(),
        "nearby search complete"
    );

    NearbyOutcome::Found {
        location: LocationSummary {
            latitude,
            longitude,
            city: location.city,
            country: location.country,
        },
        places,
    }
}

impl Serialize for NearbyOutcome<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        match self {
            Self::Found { location, places } => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("location", location)?;
                map.serialize_entry("places", &format::list_ranked(places))?;
            }
            Self::LocationUnavailable { error } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", &error.to_string())?;
                map.serialize_entry("suggestion", SUGGESTION)?;
            }
            Self::MissingCoordinates { location } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", MISSING_COORDINATES)?;
                map.serialize_entry("location_data", location)?;
            }
        }
        map.end()
    }
}
