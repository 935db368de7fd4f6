//! # Geometry primitives
//!
//! Distances and bearings on a spherical earth, and the cumulative-length profile of a path used
//! to locate a distance along it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nav_if::geo::{GeoPoint, Path};
use util::maths::{get_ang_dist_deg, wrap_deg_360};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Mean radius of the earth.
///
/// Units: meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Cumulative distance from the start of a path to each of its points.
#[derive(Debug, Clone)]
pub struct PathProfile {
    cum_dist_m: Vec<f64>,
}

/// A location along a path, given as a segment and the fraction of that segment travelled.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SegmentLocation {
    /// Index of the segment's start point. The segment ends at `index + 1`.
    pub index: usize,

    /// Fraction of the segment's length, within [0, 1].
    pub fraction: f64,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Great-circle distance between two points using the haversine formula.
///
/// Units: meters
pub fn distance_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat_a_rad = a.lat_deg.to_radians();
    let lat_b_rad = b.lat_deg.to_radians();
    let d_lat_rad = (b.lat_deg - a.lat_deg).to_radians();
    let d_lng_rad = (b.lng_deg - a.lng_deg).to_radians();

    let h = (d_lat_rad / 2.0).sin().powi(2)
        + lat_a_rad.cos() * lat_b_rad.cos() * (d_lng_rad / 2.0).sin().powi(2);

    // Round-off can push h just outside [0, 1] for antipodal points
    2.0 * EARTH_RADIUS_M * h.min(1.0).max(0.0).sqrt().asin()
}

/// Initial compass bearing when travelling from `a` to `b` along the great circle, in [0, 360).
///
/// Coincident points have no bearing, for them 0 is returned.
pub fn bearing_deg(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat_a_rad = a.lat_deg.to_radians();
    let lat_b_rad = b.lat_deg.to_radians();
    let d_lng_rad = (b.lng_deg - a.lng_deg).to_radians();

    let x = d_lng_rad.sin() * lat_b_rad.cos();
    let y = lat_a_rad.cos() * lat_b_rad.sin() - lat_a_rad.sin() * lat_b_rad.cos() * d_lng_rad.cos();

    if x == 0.0 && y == 0.0 {
        return 0.0;
    }

    wrap_deg_360(x.atan2(y).to_degrees())
}

/// Total length of the path, 0 for paths with fewer than two points.
///
/// Units: meters
pub fn path_length_m(path: &Path) -> f64 {
    path.points
        .windows(2)
        .map(|w| distance_m(&w[0], &w[1]))
        .sum()
}

/// Signed shortest turn from `current_deg` onto `target_deg`, in (-180, 180].
pub fn heading_delta_deg(target_deg: f64, current_deg: f64) -> f64 {
    get_ang_dist_deg(target_deg, current_deg)
}

/// Linear interpolation of latitude and longitude between two points.
///
/// This is a planar approximation which is only valid for points close together.
pub fn lerp(a: &GeoPoint, b: &GeoPoint, fraction: f64) -> GeoPoint {
    GeoPoint {
        lat_deg: a.lat_deg + (b.lat_deg - a.lat_deg) * fraction,
        lng_deg: a.lng_deg + (b.lng_deg - a.lng_deg) * fraction,
    }
}

/// The point a given fraction of the way along the great circle from `a` to `b`.
pub fn intermediate_point(a: &GeoPoint, b: &GeoPoint, fraction: f64) -> GeoPoint {
    let delta = distance_m(a, b) / EARTH_RADIUS_M;

    // For very short or antipodal arcs slerp is ill-conditioned, fall back on lerp
    if delta < 1e-12 || (std::f64::consts::PI - delta).abs() < 1e-12 {
        return lerp(a, b, fraction);
    }

    let (lat_a, lng_a) = (a.lat_deg.to_radians(), a.lng_deg.to_radians());
    let (lat_b, lng_b) = (b.lat_deg.to_radians(), b.lng_deg.to_radians());

    let k_a = ((1.0 - fraction) * delta).sin() / delta.sin();
    let k_b = (fraction * delta).sin() / delta.sin();

    let x = k_a * lat_a.cos() * lng_a.cos() + k_b * lat_b.cos() * lng_b.cos();
    let y = k_a * lat_a.cos() * lng_a.sin() + k_b * lat_b.cos() * lng_b.sin();
    let z = k_a * lat_a.sin() + k_b * lat_b.sin();

    GeoPoint {
        lat_deg: z.atan2((x * x + y * y).sqrt()).to_degrees(),
        lng_deg: y.atan2(x).to_degrees(),
    }
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl PathProfile {
    /// Build the profile of a path.
    pub fn new(path: &Path) -> Self {
        let mut cum_dist_m = Vec::with_capacity(path.points.len());
        let mut total_m = 0f64;

        for (i, p) in path.points.iter().enumerate() {
            if i > 0 {
                total_m += distance_m(&path.points[i - 1], p);
            }
            cum_dist_m.push(total_m);
        }

        Self { cum_dist_m }
    }

    /// Total length of the path.
    ///
    /// Units: meters
    pub fn length_m(&self) -> f64 {
        self.cum_dist_m.last().copied().unwrap_or(0.0)
    }

    pub fn get_num_segments(&self) -> usize {
        self.cum_dist_m.len().saturating_sub(1)
    }

    /// Length of the segment starting at `index`, or `None` if there is no such segment.
    ///
    /// Units: meters
    pub fn segment_length_m(&self, index: usize) -> Option<f64> {
        if index + 1 < self.cum_dist_m.len() {
            Some(self.cum_dist_m[index + 1] - self.cum_dist_m[index])
        } else {
            None
        }
    }

    /// Find the segment containing the given distance from the start of the path.
    ///
    /// Segments are scanned from the start and the first whose end is at or beyond the distance
    /// wins, so a distance landing exactly on a point belongs to the earlier segment. Distances
    /// beyond the end of the path resolve to the end of the last segment.
    ///
    /// Returns `None` if the path has fewer than two points.
    pub fn locate(&self, dist_m: f64) -> Option<SegmentLocation> {
        let num_segs = self.get_num_segments();
        if num_segs == 0 {
            return None;
        }

        for i in 0..num_segs {
            let end_m = self.cum_dist_m[i + 1];

            if end_m >= dist_m {
                let seg_m = end_m - self.cum_dist_m[i];

                // Zero length segments are only reached when the distance is at their start
                let fraction = if seg_m > 0.0 {
                    ((dist_m - self.cum_dist_m[i]) / seg_m).min(1.0).max(0.0)
                } else {
                    0.0
                };

                return Some(SegmentLocation { index: i, fraction });
            }
        }

        Some(SegmentLocation {
            index: num_segs - 1,
            fraction: 1.0,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn p(lat_deg: f64, lng_deg: f64) -> GeoPoint {
        GeoPoint::new(lat_deg, lng_deg)
    }

    #[test]
    fn test_distance() {
        let a = p(0.0, 0.0);
        let b = p(0.0, 0.001);
        let c = p(0.001, 0.001);

        assert_eq!(distance_m(&a, &a), 0.0);
        assert_eq!(distance_m(&a, &b), distance_m(&b, &a));

        // 0.001 degrees of arc on the equator
        let expected_m = EARTH_RADIUS_M * 0.001f64.to_radians();
        assert!((distance_m(&a, &b) - expected_m).abs() < 1e-6);
        assert!((expected_m - 111.195).abs() < 1e-3);

        // Triangle inequality
        assert!(distance_m(&a, &c) <= distance_m(&a, &b) + distance_m(&b, &c) + 1e-9);

        // London to Paris is about 344 km
        let london = p(51.5074, -0.1278);
        let paris = p(48.8566, 2.3522);
        assert!((distance_m(&london, &paris) - 343_500.0).abs() < 1_000.0);
    }

    #[test]
    fn test_bearing() {
        let origin = p(0.0, 0.0);

        assert!((bearing_deg(&origin, &p(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing_deg(&origin, &p(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing_deg(&origin, &p(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing_deg(&origin, &p(0.0, -1.0)) - 270.0).abs() < 1e-9);

        // Coincident points do not panic and give a stable value
        assert_eq!(bearing_deg(&origin, &origin), 0.0);

        let b = bearing_deg(&p(10.0, 10.0), &p(9.0, 9.0));
        assert!(b >= 0.0 && b < 360.0);
    }

    #[test]
    fn test_path_length() {
        assert_eq!(path_length_m(&Path::new_empty()), 0.0);
        assert_eq!(path_length_m(&Path::from(vec![p(1.0, 1.0)])), 0.0);

        let path = Path::from(vec![p(0.0, 0.0), p(0.0, 0.001), p(0.0, 0.002)]);
        let expected_m = 2.0 * EARTH_RADIUS_M * 0.001f64.to_radians();
        assert!((path_length_m(&path) - expected_m).abs() < 1e-6);
        assert!((PathProfile::new(&path).length_m() - expected_m).abs() < 1e-6);
    }

    #[test]
    fn test_heading_delta() {
        assert_eq!(heading_delta_deg(10.0, 350.0), 20.0);
        assert_eq!(heading_delta_deg(350.0, 10.0), -20.0);
        assert_eq!(heading_delta_deg(270.0, 0.0), -90.0);
    }

    #[test]
    fn test_locate() {
        let path = Path::from(vec![p(0.0, 0.0), p(0.0, 0.001), p(0.0, 0.002)]);
        let profile = PathProfile::new(&path);
        let seg_m = profile.segment_length_m(0).unwrap();

        assert_eq!(
            profile.locate(0.0),
            Some(SegmentLocation {
                index: 0,
                fraction: 0.0
            })
        );

        let half = profile.locate(0.5 * seg_m).unwrap();
        assert_eq!(half.index, 0);
        assert!((half.fraction - 0.5).abs() < 1e-9);

        // Exactly on the shared point resolves to the earlier segment
        let joint = profile.locate(seg_m).unwrap();
        assert_eq!(joint.index, 0);
        assert_eq!(joint.fraction, 1.0);

        let later = profile.locate(1.5 * seg_m).unwrap();
        assert_eq!(later.index, 1);

        assert_eq!(
            profile.locate(10.0 * seg_m),
            Some(SegmentLocation {
                index: 1,
                fraction: 1.0
            })
        );

        assert!(PathProfile::new(&Path::from(vec![p(0.0, 0.0)]))
            .locate(0.0)
            .is_none());
    }

    #[test]
    fn test_locate_zero_length_segment() {
        let path = Path::from(vec![p(0.0, 0.0), p(0.0, 0.0), p(0.0, 0.001)]);
        let profile = PathProfile::new(&path);

        assert_eq!(profile.segment_length_m(0), Some(0.0));

        let loc = profile.locate(1.0).unwrap();
        assert_eq!(loc.index, 1);
        assert!(loc.fraction > 0.0 && loc.fraction < 1.0);
    }

    #[test]
    fn test_intermediate_point() {
        let a = p(0.0, 0.0);
        let b = p(0.0, 10.0);

        let mid = intermediate_point(&a, &b, 0.5);
        assert!(mid.lat_deg.abs() < 1e-9);
        assert!((mid.lng_deg - 5.0).abs() < 1e-9);

        let start = intermediate_point(&a, &b, 0.0);
        assert!(distance_m(&start, &a) < 1e-6);
        let end = intermediate_point(&a, &b, 1.0);
        assert!(distance_m(&end, &b) < 1e-6);

        assert_eq!(intermediate_point(&a, &a, 0.3), a);
    }
}
