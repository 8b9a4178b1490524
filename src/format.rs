//! Result formatting: grid tables for people, raw records for programs.

use crate::catalog::Place;
use crate::geo::RankedPlace;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const NOT_FOUND_MESSAGE: &str = "Tourist place not found";
pub const EMPTY_RANGE_MESSAGE: &str = "No places found within the requested range.";

/// Every place, as a table plus raw records.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceListing {
    pub total: usize,
    pub table: String,
    pub raw: Vec<Place>,
}

/// A place record with its distance from the search center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecord {
    #[serde(flatten)]
    pub place: Place,
    /// Rounded to 2 decimals
    pub distance_km: f64,
}

/// Places ranked by distance, as a table plus raw records.
#[derive(Debug, Clone, Serialize)]
pub struct RankedListing {
    pub total: usize,
    pub table: String,
    pub raw: Vec<RankedRecord>,
}

/// Outcome of a lookup by id.
///
/// Serializes as `{"found": true, "place": {...}}` or
/// `{"found": false, "message": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceLookup {
    Found(Place),
    NotFound,
}

impl From<Option<&Place>> for PlaceLookup {
    fn from(place: Option<&Place>) -> Self {
        match place {
            Some(p) => Self::Found(p.clone()),
            None => Self::NotFound,
        }
    }
}

impl Serialize for PlaceLookup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            Self::Found(place) => {
                map.serialize_entry("found", &true)?;
                map.serialize_entry("place", place)?;
            }
            Self::NotFound => {
                map.serialize_entry("found", &false)?;
                map.serialize_entry("message", NOT_FOUND_MESSAGE)?;
            }
        }
        map.end()
    }
}

pub fn list_places(places: &[Place]) -> PlaceListing {
    PlaceListing {
        total: places.len(),
        table: places_table(places),
        raw: places.to_vec(),
    }
}

pub fn list_ranked(ranked: &[RankedPlace<'_>]) -> RankedListing {
    RankedListing {
        total: ranked.len(),
        table: ranked_table(ranked),
        raw: ranked
            .iter()
            .map(|r| RankedRecord {
                place: r.place.clone(),
                distance_km: round2(r.distance_km),
            })
            .collect(),
    }
}

pub fn places_table(places: &[Place]) -> String {
    let rows: Vec<Vec<String>> = places
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.city.clone(),
                p.category.clone(),
                format!("{}, {}", p.lat, p.lng),
            ]
        })
        .collect();
    grid(&["Place", "City", "Category", "Lat, lng"], &rows)
}

pub fn ranked_table(ranked: &[RankedPlace<'_>]) -> String {
    if ranked.is_empty() {
        return EMPTY_RANGE_MESSAGE.to_string();
    }
    let rows: Vec<Vec<String>> = ranked
        .iter()
        .map(|r| {
            vec![
                r.place.name.clone(),
                r.place.city.clone(),
                r.place.category.clone(),
                format!("{}, {}", r.place.lat, r.place.lng),
                format!("{:.2} km", r.distance_km),
            ]
        })
        .collect();
    grid(&["Place", "City", "Category", "Coordinates", "Distance"], &rows)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Render a `+---+` grid. Widths count chars, not bytes.
fn grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = rule(&widths, '-');
    out.push_str(&cells_line(&widths, headers.iter().copied()));
    out.push_str(&rule(&widths, '='));
    for row in rows {
        out.push_str(&cells_line(&widths, row.iter().map(String::as_str)));
        out.push_str(&rule(&widths, '-'));
    }
    out.pop(); // trailing newline
    out
}

fn rule(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for w in widths {
        line.extend(std::iter::repeat(fill).take(w + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn cells_line<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (cell, w) in cells.zip(widths) {
        let pad = w - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.extend(std::iter::repeat(' ').take(pad + 1));
        line.push('|');
    }
    line.push('\n');
    line
}
