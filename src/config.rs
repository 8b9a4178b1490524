//! Runtime configuration shared by every subcommand.
//!
//! Each option can also come from the environment, so the server can be
//! configured without flags.

use crate::catalog::{Catalog, CatalogError};
use crate::location::providers::{
    ProviderConfig, DEFAULT_GEOCODER_URL, DEFAULT_IP_API_URL, DEFAULT_USER_AGENT,
};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Place catalog (JSON array). Defaults to the user data directory
    /// catalog if present, else the built-in one.
    #[arg(long, global = true, env = "TOURISM_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// IP geolocation endpoint; the IP is appended to it.
    #[arg(long, global = true, env = "TOURISM_IP_API_URL", default_value = DEFAULT_IP_API_URL)]
    pub ip_api_url: String,

    /// Geocoding search endpoint.
    #[arg(long, global = true, env = "TOURISM_GEOCODER_URL", default_value = DEFAULT_GEOCODER_URL)]
    pub geocoder_url: String,

    /// IP lookup timeout in seconds.
    #[arg(long, global = true, env = "TOURISM_IP_TIMEOUT_SECS", default_value_t = 5)]
    pub ip_timeout_secs: u64,

    /// Geocoding timeout in seconds.
    #[arg(long, global = true, env = "TOURISM_GEOCODE_TIMEOUT_SECS", default_value_t = 10)]
    pub geocode_timeout_secs: u64,

    /// User-Agent sent to the providers. Public geocoders require one that
    /// identifies the application.
    #[arg(long, global = true, env = "TOURISM_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Settings {
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            ip_api_url: self.ip_api_url.clone(),
            geocoder_url: self.geocoder_url.clone(),
            ip_timeout: Duration::from_secs(self.ip_timeout_secs),
            geocode_timeout: Duration::from_secs(self.geocode_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            Some(path) => Catalog::load(path),
            None => Catalog::load_default(),
        }
    }
}
