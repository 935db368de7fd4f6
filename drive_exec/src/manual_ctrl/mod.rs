//! # Manual control module
//!
//! Manual control drives the vehicle directly from the directional inputs. Steering turns the
//! heading at a fixed rate (even when stationary), throttle and brake integrate into a signed
//! speed, and the speed is projected along the heading to move the vehicle over the earth's
//! surface.
//!
//! There is no friction, with no input held the vehicle keeps its current speed.

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
