//! Read-only catalog of tourist places.

pub mod store;
pub mod types;

pub use store::{Catalog, PlaceCatalog};
pub use types::{CatalogError, Place};
