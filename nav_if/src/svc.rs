//! # External collaborators
//!
//! The kinematics core never talks to the mapping service directly. Place resolution, routing and
//! rendering are reached through these traits so that hosts can plug in whichever service they
//! use.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::geo::{GeoPoint, Path, VehicleState};

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Errors returned by a `PlaceResolver`.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("No place with the identifier \"{0}\" could be found")]
    NotFound(String),

    #[error("The place service returned an error: {0}")]
    ServiceError(String),
}

/// Errors returned by a `Router`.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("No route could be found between {0:?} and {1:?}")]
    NoRouteFound(GeoPoint, GeoPoint),

    #[error("The routing service returned an error: {0}")]
    ServiceError(String),
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Turns an opaque place identifier into a point.
pub trait PlaceResolver {
    fn resolve(&self, place_id: &str) -> Result<GeoPoint, ResolveError>;
}

/// Produces a path between two points.
pub trait Router {
    fn route(&self, origin: GeoPoint, destination: GeoPoint) -> Result<Path, RouteError>;
}

/// Displays the vehicle. The core only pushes state into a renderer and never reads from it.
pub trait Renderer {
    fn render(&mut self, state: &VehicleState, path: Option<&Path>, destination: Option<GeoPoint>);
}
