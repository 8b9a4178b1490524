//! Great-circle distance and proximity ranking.
//!
//! Haversine on a sphere of radius 6371 km. Inputs are not validated here;
//! non-finite degrees propagate as NaN and a NaN distance never passes a
//! radius filter.

use crate::catalog::Place;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A place annotated with its distance from a reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedPlace<'a> {
    pub place: &'a Place,
    pub distance_km: f64,
}

/// Haversine distance in kilometers between two points in decimal degrees.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let dlat = lat2 - lat1;
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Places within `max_distance_km` of the center, nearest first.
///
/// The boundary is inclusive. Equal distances keep catalog order.
pub fn filter_by_distance(
    places: &[Place],
    center_lat: f64,
    center_lng: f64,
    max_distance_km: f64,
) -> Vec<RankedPlace<'_>> {
    let mut ranked: Vec<RankedPlace<'_>> = places
        .iter()
        .map(|place| RankedPlace {
            place,
            distance_km: distance_km(center_lat, center_lng, place.lat, place.lng),
        })
        .filter(|r| r.distance_km <= max_distance_km)
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn place(id: &str, lat: f64, lng: f64) -> Place {
        Place {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            category: "test".into(),
            lat,
            lng,
            city: "Asunción".into(),
            region: "Capital".into(),
        }
    }

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_km(-25.2822, -57.6352, -25.2822, -57.6352), 0.0);
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let d = distance_km(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(d, 111.19, max_relative = 0.005);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ((-25.2822, -57.6352), (-27.1311, -55.7031)),
            ((59.3293, 18.0686), (-33.8688, 151.2093)),
            ((89.9, 0.0), (-89.9, 179.9)),
            ((0.0, -179.5), (0.0, 179.5)),
        ];
        for ((a_lat, a_lng), (b_lat, b_lng)) in pairs {
            let ab = distance_km(a_lat, a_lng, b_lat, b_lng);
            let ba = distance_km(b_lat, b_lng, a_lat, a_lng);
            assert_relative_eq!(ab, ba, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_antimeridian_short_way() {
        // 1 degree apart across the date line, not 359
        let d = distance_km(0.0, -179.5, 0.0, 179.5);
        assert_relative_eq!(d, 111.19, max_relative = 0.005);
    }

    #[test]
    fn test_non_finite_input_is_nan() {
        assert!(distance_km(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }

    #[test]
    fn test_filter_sorted_and_within_radius() {
        let places = vec![
            place("far", -27.1311, -55.7031),
            place("near", -25.2808, -57.6397),
            place("mid", -25.3, -57.35),
        ];
        let ranked = filter_by_distance(&places, -25.2822, -57.6352, 50.0);

        let ids: Vec<&str> = ranked.iter().map(|r| r.place.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid"]);
        assert!(ranked.iter().all(|r| r.distance_km <= 50.0));
        assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn test_filter_empty_input() {
        assert!(filter_by_distance(&[], 0.0, 0.0, 100.0).is_empty());
    }

    #[test]
    fn test_filter_zero_radius_keeps_coincident_only() {
        let places = vec![
            place("other", -25.2808, -57.6397),
            place("here", -25.2822, -57.6352),
        ];
        let ranked = filter_by_distance(&places, -25.2822, -57.6352, 0.0);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].place.id, "here");
        assert_eq!(ranked[0].distance_km, 0.0);
    }

    #[test]
    fn test_filter_boundary_inclusive() {
        let places = vec![place("edge", 0.0, 1.0)];
        let exact = distance_km(0.0, 0.0, 0.0, 1.0);
        assert_eq!(filter_by_distance(&places, 0.0, 0.0, exact).len(), 1);
        assert!(filter_by_distance(&places, 0.0, 0.0, exact - 1e-9).is_empty());
    }

    #[test]
    fn test_filter_ties_keep_catalog_order() {
        let places = vec![
            place("first", 0.0, 1.0),
            place("closer", 0.0, 0.5),
            place("second", 0.0, -1.0),
            place("third", 1.0, 0.0),
        ];
        let ranked = filter_by_distance(&places, 0.0, 0.0, 500.0);
        let ids: Vec<&str> = ranked.iter().map(|r| r.place.id.as_str()).collect();
        // one degree along either axis from the origin gives the same `a` term
        assert_eq!(ids, vec!["closer", "first", "second", "third"]);
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let places = vec![place("b", 0.0, 2.0), place("a", 0.0, 1.0)];
        let before = places.clone();
        let _ = filter_by_distance(&places, 0.0, 0.0, 1000.0);
        assert_eq!(places, before);
    }

    #[test]
    fn test_filter_nan_center_matches_nothing() {
        let places = vec![place("a", 0.0, 0.0)];
        assert!(filter_by_distance(&places, f64::NAN, 0.0, 1000.0).is_empty());
    }
}
