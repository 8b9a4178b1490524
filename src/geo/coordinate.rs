use thiserror::Error;

/// A validated (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid coordinates ({lat}, {lng}): latitude must be in -90..90, longitude in -180..180")]
pub struct CoordinateError {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Rejects non-finite values and out-of-range degrees.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        // RangeInclusive::contains is false for NaN
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
            Ok(Self { lat, lng })
        } else {
            Err(CoordinateError { lat, lng })
        }
    }
}
