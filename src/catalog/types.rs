//! Core types for the place catalog.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// A tourist point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Free-form tag (e.g. "historic", "nature")
    pub category: String,
    pub lat: f64,
    pub lng: f64,
    pub city: String,
    pub region: String,
}

/// Catalog loading errors. Any of these means the catalog is unavailable.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate place id '{0}' in catalog")]
    DuplicateId(String),

    #[error("place '{id}' has invalid coordinates ({lat}, {lng})")]
    InvalidCoordinates { id: String, lat: f64, lng: f64 },
}
