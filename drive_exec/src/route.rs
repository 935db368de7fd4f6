//! # Offline route and place providers
//!
//! Stand-ins for the mapping service: a table of named places loaded from a parameter file, and
//! a router which joins two points with a great circle sampled at a fixed spacing.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;

// Internal
use crate::geo::{distance_m, intermediate_point};
use nav_if::{
    geo::{GeoPoint, Path},
    svc::{PlaceResolver, ResolveError, RouteError, Router},
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Largest number of segments a single route may be split into.
const MAX_ROUTE_SEGMENTS: f64 = 100_000.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Routes along the great circle between the origin and destination.
#[derive(Debug, Clone)]
pub struct DirectRouter {
    /// Maximum distance between consecutive points in a route.
    ///
    /// Units: meters
    point_sep_m: f64,
}

/// A fixed table of named places.
///
/// Loaded from TOML in the form:
///
/// ```toml
/// [places]
/// home = { lat = 51.5007, lng = -0.1246 }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceTable {
    places: HashMap<String, GeoPoint>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DirectRouter {
    pub fn new(point_sep_m: f64) -> Self {
        Self { point_sep_m }
    }
}

impl Router for DirectRouter {
    fn route(&self, origin: GeoPoint, destination: GeoPoint) -> Result<Path, RouteError> {
        if !self.point_sep_m.is_finite() || self.point_sep_m <= 0.0 {
            return Err(RouteError::ServiceError(format!(
                "Invalid point separation of {} m",
                self.point_sep_m
            )));
        }

        let dist_m = distance_m(&origin, &destination);
        if dist_m.is_nan() || dist_m <= 0.0 {
            return Err(RouteError::NoRouteFound(origin, destination));
        }

        let num_segs_f = (dist_m / self.point_sep_m).ceil().max(1.0);
        if num_segs_f > MAX_ROUTE_SEGMENTS {
            return Err(RouteError::ServiceError(format!(
                "A point separation of {} m over {:.1} m needs more than {} segments",
                self.point_sep_m, dist_m, MAX_ROUTE_SEGMENTS
            )));
        }
        let num_segs = num_segs_f as usize;

        let mut points: Vec<GeoPoint> = (0..=num_segs)
            .map(|i| intermediate_point(&origin, &destination, i as f64 / num_segs as f64))
            .collect();

        // Pin the ends exactly
        points[0] = origin;
        points[num_segs] = destination;

        debug!(
            "Routed {:.1} m with {} points between {:?} and {:?}",
            dist_m,
            points.len(),
            origin,
            destination
        );

        Ok(Path::from(points))
    }
}

impl PlaceTable {
    /// Add a place to the table, replacing any existing place with the same identifier.
    pub fn insert(&mut self, place_id: &str, point: GeoPoint) {
        self.places.insert(place_id.to_string(), point);
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl PlaceResolver for PlaceTable {
    fn resolve(&self, place_id: &str) -> Result<GeoPoint, ResolveError> {
        self.places
            .get(place_id)
            .copied()
            .ok_or_else(|| ResolveError::NotFound(place_id.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geo::path_length_m;

    #[test]
    fn test_direct_route() {
        let router = DirectRouter::new(25.0);
        let origin = GeoPoint::new(51.5007, -0.1246);
        let destination = GeoPoint::new(51.5033, -0.1196);

        let path = router.route(origin, destination).unwrap();
        let dist_m = distance_m(&origin, &destination);

        assert_eq!(path.origin(), Some(origin));
        assert_eq!(path.destination(), Some(destination));
        assert_eq!(path.get_num_points(), (dist_m / 25.0).ceil() as usize + 1);

        // Points are evenly spaced along the great circle
        for w in path.points.windows(2) {
            assert!(distance_m(&w[0], &w[1]) <= 25.0 + 1e-6);
        }
        assert!((path_length_m(&path) - dist_m).abs() < 1e-3);
    }

    #[test]
    fn test_short_route() {
        // Shorter than the separation still gives a followable path
        let router = DirectRouter::new(1000.0);
        let path = router
            .route(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.001))
            .unwrap();
        assert_eq!(path.get_num_points(), 2);
    }

    #[test]
    fn test_no_route() {
        let router = DirectRouter::new(25.0);
        let p = GeoPoint::new(10.0, 10.0);
        assert!(matches!(
            router.route(p, p),
            Err(RouteError::NoRouteFound(_, _))
        ));

        assert!(matches!(
            DirectRouter::new(0.0).route(p, GeoPoint::new(10.0, 10.1)),
            Err(RouteError::ServiceError(_))
        ));
    }

    #[test]
    fn test_too_many_points() {
        let (origin, destination) = (GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.01));

        // About 1.1 km
        assert!(matches!(
            DirectRouter::new(1e-9).route(origin, destination),
            Err(RouteError::ServiceError(_))
        ));
        assert!(matches!(
            DirectRouter::new(std::f64::MIN_POSITIVE).route(origin, destination),
            Err(RouteError::ServiceError(_))
        ));

        // Just under the limit is fine
        assert!(DirectRouter::new(0.02).route(origin, destination).is_ok());
    }

    #[test]
    fn test_place_table() {
        let table: PlaceTable = util::params::from_str(
            "[places]\n\
             home = { lat = 51.5007, lng = -0.1246 }\n\
             work = { lat = 51.5033, lng = -0.1196 }\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.resolve("home").unwrap(),
            GeoPoint::new(51.5007, -0.1246)
        );
        assert!(matches!(
            table.resolve("moon"),
            Err(ResolveError::NotFound(_))
        ));
    }
}
