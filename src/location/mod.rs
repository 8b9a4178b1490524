//! Location subsystem: IP-based geolocation and free-text geocoding.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{Geocoder, IpApiClient, IpLocator, NominatimClient, ProviderConfig};
pub use resolver::{LocationResolver, DEFAULT_COUNTRY_CODE};
pub use types::{GeocodedLocation, IpLocation, LocationError, LocationReport};
