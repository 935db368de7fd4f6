//! # Navigation interface crate.
//!
//! Provides the types shared between the kinematics core and the collaborators around it (place
//! resolution, routing, rendering and input sources).

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Geographic points, paths and the vehicle's kinematic state
pub mod geo;

/// Directional input flags and the shared snapshot used by the tick function
pub mod input;

/// External collaborator interfaces
pub mod svc;

pub mod tc;
