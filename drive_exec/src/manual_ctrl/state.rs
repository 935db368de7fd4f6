//! Manual control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::Params;
use crate::geo::EARTH_RADIUS_M;
use nav_if::{
    geo::{GeoPoint, VehicleState},
    input::InputFlags,
};
use util::maths::wrap_deg_360;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Lower bound on `cos(lat)` when scaling longitude changes, keeps the poles finite.
const MIN_COS_LAT: f64 = 1e-6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drives the vehicle from directional inputs.
#[derive(Default)]
pub struct ManualCtrl {
    params: Params,

    report: StatusReport,
}

/// Status report for the last manual control tick.
#[derive(Default, Copy, Clone, Debug, Serialize)]
pub struct StatusReport {
    /// True if the speed demand exceeded the maximum speed and was limited.
    pub speed_limited: bool,

    /// True if the vehicle's position changed.
    pub moved: bool,

    /// Velocity over the ground as (east, north).
    ///
    /// Units: meters/second
    pub velocity_ms_en: [f64; 2],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ManualCtrl {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            report: StatusReport::default(),
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The report from the last call to `proc`.
    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// Advance the vehicle by `dt_s` seconds under the given inputs.
    ///
    /// Ticks with a non-positive or non-finite `dt_s` leave the state untouched.
    pub fn proc(&mut self, prev: &VehicleState, input: &InputFlags, dt_s: f64) -> VehicleState {
        self.report = StatusReport::default();

        if !dt_s.is_finite() || dt_s <= 0.0 {
            return *prev;
        }

        let mut state = *prev;

        // ---- STEERING ----

        let mut heading_deg = prev.heading_deg;
        if input.right {
            heading_deg += self.params.steer_rate_degs * dt_s;
        }
        if input.left {
            heading_deg -= self.params.steer_rate_degs * dt_s;
        }
        state.heading_deg = wrap_deg_360(heading_deg);

        // ---- THROTTLE ----

        let mut speed_ms = prev.speed_ms;
        if input.forward {
            speed_ms += self.params.accel_mss * dt_s;
        }
        if input.backward {
            speed_ms -= self.params.brake_accel_mss * dt_s;
        }

        let max_speed_ms = self.params.max_speed_ms.abs();
        if speed_ms.abs() > max_speed_ms {
            speed_ms = max_speed_ms.copysign(speed_ms);
            self.report.speed_limited = true;
        }
        state.speed_ms = speed_ms;

        // ---- POSITION ----

        if speed_ms.abs() > self.params.min_movement_threshold_ms {
            let heading_rad = state.heading_deg.to_radians();
            let vel_ms_en = Vector2::new(speed_ms * heading_rad.sin(), speed_ms * heading_rad.cos());
            let disp_m_en = vel_ms_en * dt_s;

            state.position = displace(&prev.position, &disp_m_en);

            self.report.moved = true;
            self.report.velocity_ms_en = [vel_ms_en.x, vel_ms_en.y];
        }

        trace!(
            "ManualCtrl: {:?} -> heading {:.2} deg, speed {:.2} m/s",
            input,
            state.heading_deg,
            state.speed_ms
        );

        state
    }
}

/// Move a point by a small (east, north) displacement.
///
/// Longitude changes are scaled by the latitude of the starting point. The resulting latitude is
/// clamped to the poles and the longitude wrapped into [-180, 180).
fn displace(start: &GeoPoint, disp_m_en: &Vector2<f64>) -> GeoPoint {
    let cos_lat = start.lat_deg.to_radians().cos().max(MIN_COS_LAT);

    let d_lat_deg = (disp_m_en.y / EARTH_RADIUS_M).to_degrees();
    let d_lng_deg = (disp_m_en.x / (EARTH_RADIUS_M * cos_lat)).to_degrees();

    let lat_deg = (start.lat_deg + d_lat_deg).max(-90.0).min(90.0);
    let mut lng_deg = start.lng_deg + d_lng_deg;
    if lng_deg < -180.0 || lng_deg >= 180.0 {
        lng_deg = wrap_deg_360(lng_deg + 180.0) - 180.0;
    }

    GeoPoint::new(lat_deg, lng_deg)
}
