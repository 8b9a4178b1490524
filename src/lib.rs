//! Paraguay Tourism: a catalog of tourist places with proximity search,
//! IP geolocation and geocoding.

pub mod catalog;
pub mod config;
pub mod format;
pub mod geo;
pub mod location;
pub mod mcp;
pub mod nearby;
pub mod server;
pub mod tools;
