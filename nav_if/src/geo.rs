//! # Geographic data types
//!
//! Points are expressed in degrees on a spherical earth. Headings follow the compass convention:
//! 0 is geographic north and angles increase clockwise.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A point on the earth's surface.
///
/// Serialised as `{"lat": .., "lng": ..}` to match the mapping service's literal format.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude.
    ///
    /// Units: degrees
    #[serde(rename = "lat")]
    pub lat_deg: f64,

    /// Longitude.
    ///
    /// Units: degrees
    #[serde(rename = "lng")]
    pub lng_deg: f64,
}

/// An ordered sequence of points from origin to destination.
///
/// A path is produced once per route request and is not modified while a simulation runs on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub points: Vec<GeoPoint>,
}

/// The kinematic state of the simulated vehicle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Current position of the vehicle.
    pub position: GeoPoint,

    /// Compass heading, always within [0, 360).
    ///
    /// Units: degrees
    pub heading_deg: f64,

    /// Signed speed along the heading. Only driven in manual mode.
    ///
    /// Units: meters/second
    pub speed_ms: f64,

    /// Fraction of the path length travelled, within [0, 1]. Only driven in path following mode.
    pub progress: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl GeoPoint {
    pub fn new(lat_deg: f64, lng_deg: f64) -> Self {
        Self { lat_deg, lng_deg }
    }
}

impl Path {
    /// Create a new empty path
    pub fn new_empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Get the number of points in the path
    pub fn get_num_points(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The first point of the path, if any.
    pub fn origin(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }

    /// The last point of the path, if any.
    pub fn destination(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }
}

impl From<Vec<GeoPoint>> for Path {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }
}

impl VehicleState {
    /// A stationary vehicle at the given position, pointing north with no progress.
    pub fn at(position: GeoPoint) -> Self {
        Self {
            position,
            heading_deg: 0.0,
            speed_ms: 0.0,
            progress: 0.0,
        }
    }
}
