//! # Path following module
//!
//! Path following plays the vehicle along a fixed path. Rather than tracking the vehicle's
//! position against the path, the follower advances a progress scalar (the fraction of the path
//! length travelled) and derives everything else from it:
//!
//! - The position is interpolated within the segment containing the current distance.
//! - The heading is smoothed towards the bearing of the segment a fixed look-ahead distance
//!   further along, so turns are anticipated rather than snapped to.
//! - The speed is the base speed scaled down by the turn severity between the current segment and
//!   the next one, the sharper the turn the slower the vehicle.
//!
//! Once progress reaches 1 the follower reports completion and does no further work.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during PathFollow operation.
#[derive(Debug, thiserror::Error)]
pub enum PathFollowError {
    #[error("A path needs at least 2 points to be followed, found {0}")]
    PathTooShort(usize),
}
