//! Distance engine: coordinates, Haversine distance and radius filtering.

pub mod coordinate;
pub mod distance;

pub use coordinate::{Coordinate, CoordinateError};
pub use distance::{distance_km, filter_by_distance, RankedPlace, EARTH_RADIUS_KM};
