//! Simulation manager state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::Serialize;

// Internal
use super::{RefusedStart, SimMgrError, SimMode};
use crate::{
    manual_ctrl::{self, ManualCtrl},
    path_follow::{self, PathFollow},
};
use nav_if::{
    geo::{GeoPoint, Path, VehicleState},
    input::InputFlags,
};
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Simulation manager state
#[derive(Default)]
pub struct SimMgr {
    pf_params: path_follow::Params,

    manual_ctrl: ManualCtrl,

    mode: ModeCtx,

    state: VehicleState,

    report: StatusReport,
}

/// Input data to the simulation manager.
#[derive(Debug, Copy, Clone, Default)]
pub struct TickInput {
    /// Time elapsed since the previous tick.
    ///
    /// Units: seconds
    pub dt_s: f64,

    /// Snapshot of the directional inputs for this tick.
    pub input: InputFlags,
}

/// Output of one simulation tick.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct TickOutput {
    pub state: VehicleState,

    /// True on the tick at which path following reaches the end of the path.
    pub completed: bool,
}

/// Status report for the simulation manager.
#[derive(Debug, Copy, Clone, Default, Serialize)]
pub struct StatusReport {
    pub mode: SimMode,

    /// Only set while following a path.
    pub segment_index: Option<usize>,

    /// Only set while following a path.
    pub speed_factor: Option<f64>,

    /// Only set while following a path.
    pub target_heading_deg: Option<f64>,

    /// Only set in manual mode.
    pub speed_limited: Option<bool>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The active mode along with the context that mode needs.
enum ModeCtx {
    Idle,
    PathFollowing(PathFollow),
    Manual,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ModeCtx {
    fn default() -> Self {
        ModeCtx::Idle
    }
}

impl ModeCtx {
    fn mode(&self) -> SimMode {
        match self {
            ModeCtx::Idle => SimMode::Idle,
            ModeCtx::PathFollowing(_) => SimMode::PathFollowing,
            ModeCtx::Manual => SimMode::Manual,
        }
    }
}

impl SimMgr {
    pub fn new(pf_params: path_follow::Params, mc_params: manual_ctrl::Params) -> Self {
        Self {
            pf_params,
            manual_ctrl: ManualCtrl::new(mc_params),
            ..Default::default()
        }
    }

    pub fn mode(&self) -> SimMode {
        self.mode.mode()
    }

    /// The current state of the vehicle.
    pub fn state(&self) -> VehicleState {
        self.state
    }

    /// The path being followed, if in path following mode.
    pub fn path(&self) -> Option<&Path> {
        match &self.mode {
            ModeCtx::PathFollowing(pf) => Some(pf.path()),
            _ => None,
        }
    }

    /// Start following the given path.
    ///
    /// The vehicle is placed at `origin`, or the start of the path if no origin is given, with
    /// zero heading, speed and progress. If a mode is already active nothing changes and the
    /// current state is returned.
    pub fn start_path_following(
        &mut self,
        path: &Path,
        origin: Option<GeoPoint>,
    ) -> Result<VehicleState, SimMgrError> {
        if self.mode() != SimMode::Idle {
            debug!("Start path following ignored, already in {:?}", self.mode());
            return Ok(self.state);
        }

        let pf = PathFollow::new(self.pf_params.clone(), path.clone()).map_err(RefusedStart::from)?;

        let origin = origin.or_else(|| path.origin()).ok_or(RefusedStart::NoOrigin)?;

        info!(
            "Starting path following over {} points ({:.1} m)",
            path.get_num_points(),
            pf.length_m()
        );

        self.state = VehicleState::at(origin);
        self.mode = ModeCtx::PathFollowing(pf);

        Ok(self.state)
    }

    /// Start manual control from the given origin.
    ///
    /// If a mode is already active nothing changes and the current state is returned.
    pub fn start_manual(&mut self, origin: Option<GeoPoint>) -> Result<VehicleState, SimMgrError> {
        if self.mode() != SimMode::Idle {
            debug!("Start manual ignored, already in {:?}", self.mode());
            return Ok(self.state);
        }

        let origin = origin.ok_or(RefusedStart::NoOrigin)?;

        info!(
            "Starting manual control at ({:.6}, {:.6})",
            origin.lat_deg, origin.lng_deg
        );

        self.state = VehicleState::at(origin);
        self.mode = ModeCtx::Manual;

        Ok(self.state)
    }

    /// Return to `Idle` with the vehicle stationary at `origin`.
    pub fn reset(&mut self, origin: GeoPoint) -> VehicleState {
        if self.mode() != SimMode::Idle {
            info!("Reset from {:?}", self.mode());
        }

        self.mode = ModeCtx::Idle;
        self.state = VehicleState::at(origin);
        self.report = StatusReport::default();

        self.state
    }

    /// Run one tick of the active controller.
    ///
    /// In `Idle`, or when `dt_s` is not a finite positive number, the state is not changed.
    pub fn tick(&mut self, dt_s: f64, input: &InputFlags) -> TickOutput {
        self.report = StatusReport {
            mode: self.mode(),
            ..Default::default()
        };

        if !dt_s.is_finite() || dt_s <= 0.0 {
            return TickOutput {
                state: self.state,
                completed: false,
            };
        }

        let mut completed = false;

        match &mut self.mode {
            ModeCtx::Idle => (),
            ModeCtx::PathFollowing(pf) => {
                let (state, arrived) = pf.proc(&self.state, dt_s);
                let pf_report = pf.report();

                self.state = state;
                self.report.segment_index = Some(pf_report.segment_index);
                self.report.speed_factor = Some(pf_report.speed_factor);
                self.report.target_heading_deg = pf_report.target_heading_deg;

                completed = arrived;
            }
            ModeCtx::Manual => {
                self.state = self.manual_ctrl.proc(&self.state, input, dt_s);
                self.report.speed_limited = Some(self.manual_ctrl.report().speed_limited);
            }
        }

        if completed {
            info!("Path following complete");
            self.mode = ModeCtx::Idle;
        }

        TickOutput {
            state: self.state,
            completed,
        }
    }

    pub fn report(&self) -> StatusReport {
        self.report
    }
}

impl State for SimMgr {
    type InitData = (&'static str, &'static str);
    type InitError = params::LoadError;

    type InputData = TickInput;
    type OutputData = TickOutput;
    type StatusReport = StatusReport;
    type ProcError = SimMgrError;

    /// Initialise the SimMgr module.
    ///
    /// Expected init data is the paths to the path following and manual control parameter
    /// files, relative to the software root.
    fn init(&mut self, init_data: Self::InitData, _session: &Session) -> Result<(), Self::InitError> {
        let pf_params: path_follow::Params = params::load(init_data.0)?;
        let mc_params: manual_ctrl::Params = params::load(init_data.1)?;

        *self = Self::new(pf_params, mc_params);

        Ok(())
    }

    /// Perform cyclic processing of the simulation manager.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let output = self.tick(input_data.dt_s, &input_data.input);

        Ok((output, self.report))
    }
}
