//! # Drive Executable Parameters
//!
//! This module provides parameters for the drive executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DriveExecParams {
    /// Target period of one frame.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Maximum distance between consecutive points of a route made by the direct router.
    ///
    /// Units: meters
    pub router_point_sep_m: f64,

    /// Period between vehicle reports in the log.
    ///
    /// Units: seconds
    pub render_log_period_s: f64,

    /// If true every frame's vehicle state is archived to `arch/track.csv`.
    pub track_archive: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Default for DriveExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 1.0 / 60.0,
            router_point_sep_m: 25.0,
            render_log_period_s: 1.0,
            track_archive: true,
        }
    }
}

impl DriveExecParams {
    /// Number of frames between vehicle reports in the log, at least 1.
    pub fn render_log_every_n_frames(&self) -> u64 {
        if self.cycle_period_s > 0.0 && self.render_log_period_s > 0.0 {
            (self.render_log_period_s / self.cycle_period_s).round().max(1.0) as u64
        } else {
            1
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render_log_rate() {
        let mut p = DriveExecParams::default();
        assert_eq!(p.render_log_every_n_frames(), 60);

        p.cycle_period_s = 0.1;
        p.render_log_period_s = 0.05;
        assert_eq!(p.render_log_every_n_frames(), 1);

        p.cycle_period_s = 0.0;
        assert_eq!(p.render_log_every_n_frames(), 1);
    }
}
