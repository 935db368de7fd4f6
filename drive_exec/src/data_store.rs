//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nav_if::{
    geo::{GeoPoint, Path},
    input::SharedInputFlags,
};

use crate::{
    frame::CancelToken,
    sim_mgr::{self, SimMgr, TickOutput},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    /// Session elapsed time at the start of the cycle
    pub sim_time_s: f64,

    /// Cancelled by the stop TC, stops the frame loop before the next cycle
    pub cancel: CancelToken,

    // Route
    pub origin: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
    pub path: Option<Path>,

    // Input
    /// Directional keys, written by TCs and snapshotted once per cycle
    pub input: SharedInputFlags,

    // SimMgr
    pub sim_mgr: SimMgr,
    pub sim_mgr_output: TickOutput,
    pub sim_mgr_status_rpt: sim_mgr::StatusReport,

    /// Number of times path following has reached the end of a path
    pub num_completions: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    pub fn cycle_start(&mut self) {
        self.sim_mgr_output.completed = false;
        self.sim_mgr_status_rpt = sim_mgr::StatusReport::default();

        self.sim_time_s = util::session::get_elapsed_seconds();
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        if self.sim_mgr_output.completed {
            self.num_completions += 1;
        }

        self.num_cycles += 1;
    }

    /// The point the vehicle returns to on a reset.
    ///
    /// The resolved origin if there is one, otherwise the start of the path, otherwise wherever
    /// the vehicle currently is.
    pub fn home(&self) -> GeoPoint {
        self.origin
            .or_else(|| self.path.as_ref().and_then(|p| p.origin()))
            .unwrap_or_else(|| self.sim_mgr.state().position)
    }
}
