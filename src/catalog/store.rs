//! JSON-backed place catalog.
//!
//! The whole file is read once and kept in memory; nothing writes to it
//! afterwards, so the catalog can be shared freely between requests.

use super::types::{CatalogError, Place};
use crate::geo::Coordinate;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Catalog shipped inside the binary.
const BUILTIN_CATALOG: &str = include_str!("../../data/places.json");

/// Read access to the place catalog.
pub trait PlaceCatalog: Send + Sync {
    /// All places, in catalog order.
    fn list(&self) -> &[Place];

    /// Look up a place by id.
    fn get(&self, id: &str) -> Option<&Place> {
        self.list().iter().find(|p| p.id == id)
    }
}

/// An immutable, fully loaded catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    places: Vec<Place>,
}

impl Catalog {
    /// Load a catalog from a JSON file containing an array of places.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&data, &path.display().to_string())?;
        tracing::info!(path = %path.display(), places = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Parse a catalog from a JSON string.
    pub fn from_json(data: &str) -> Result<Self, CatalogError> {
        Self::parse(data, "<inline>")
    }

    /// The catalog embedded in the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::parse(BUILTIN_CATALOG, "<builtin>")
    }

    /// Load the user's catalog from the data directory if one exists,
    /// otherwise fall back to the built-in catalog.
    pub fn load_default() -> Result<Self, CatalogError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                tracing::debug!("no user catalog found, using built-in catalog");
                Self::builtin()
            }
        }
    }

    /// `<data dir>/paraguay-tourism/places.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("paraguay-tourism").join("places.json"))
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    fn parse(data: &str, origin: &str) -> Result<Self, CatalogError> {
        let places: Vec<Place> =
            serde_json::from_str(data).map_err(|source| CatalogError::Parse {
                origin: origin.to_string(),
                source,
            })?;
        Self::from_places(places)
    }

    /// Build a catalog from already-parsed places, enforcing unique ids and
    /// valid coordinates.
    pub fn from_places(places: Vec<Place>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(places.len());
        for place in &places {
            if !seen.insert(place.id.as_str()) {
                return Err(CatalogError::DuplicateId(place.id.clone()));
            }
            if Coordinate::new(place.lat, place.lng).is_err() {
                return Err(CatalogError::InvalidCoordinates {
                    id: place.id.clone(),
                    lat: place.lat,
                    lng: place.lng,
                });
            }
        }
        Ok(Self { places })
    }
}

impl PlaceCatalog for Catalog {
    fn list(&self) -> &[Place] {
        &self.places
    }
}
