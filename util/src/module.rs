//! Cyclic module interface
//!
//! Modules ticked by the frame loop (the simulation manager in `drive_exec`) implement `State`,
//! giving every one of them the same two entry points: a fallible start-up against the current
//! session, and a per-frame process step returning the module's output alongside a status report.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::session::Session;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A module processed once per frame.
pub trait State {
    /// Whatever the module is configured from, usually parameter file paths.
    type InitData;
    type InitError;

    /// The data consumed by one frame, including the frame's length.
    type InputData;
    type OutputData;

    /// Diagnostic values computed during the frame, for logging and archiving.
    type StatusReport;
    type ProcError;

    /// Configure the module before the first frame.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Process a single frame.
    ///
    /// Must not block: any I/O belongs outside the module.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
