//! # Simulation manager module
//!
//! The simulation manager owns the vehicle's state and decides which controller, if any, drives
//! it on each tick. It is in one of three modes:
//!
//! - `Idle` - Nothing moves the vehicle.
//! - `PathFollowing` - The path follower plays the vehicle along a route until it arrives.
//! - `Manual` - The manual controller drives the vehicle from the directional inputs.
//!
//! Modes are only entered from `Idle`, starting a mode while another one is active does nothing.
//! Path following drops back to `Idle` on arrival, any mode can be left with a reset.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The controller currently driving the vehicle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum SimMode {
    Idle,
    PathFollowing,
    Manual,
}

/// Reasons a mode may refuse to start.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RefusedStart {
    #[error("A path needs at least 2 points to be followed, found {0}")]
    PathTooShort(usize),

    #[error("No origin has been resolved")]
    NoOrigin,
}

/// Possible errors that can occur during SimMgr operation.
#[derive(Debug, thiserror::Error)]
pub enum SimMgrError {
    #[error("Refused to start: {0}")]
    RefusedStart(RefusedStart),
}

impl Default for SimMode {
    fn default() -> Self {
        SimMode::Idle
    }
}

impl From<crate::path_follow::PathFollowError> for RefusedStart {
    fn from(e: crate::path_follow::PathFollowError) -> Self {
        match e {
            crate::path_follow::PathFollowError::PathTooShort(n) => RefusedStart::PathTooShort(n),
        }
    }
}

impl From<RefusedStart> for SimMgrError {
    fn from(r: RefusedStart) -> Self {
        SimMgrError::RefusedStart(r)
    }
}
