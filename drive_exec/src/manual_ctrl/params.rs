//! Manual control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for manual control
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Params {

    // ---- STEERING ----

    /// Rate at which the heading changes while a steering key is held.
    ///
    /// Units: degrees/second
    pub steer_rate_degs: f64,

    // ---- THROTTLE ----

    /// Acceleration while the forward key is held.
    ///
    /// Units: meters/second^2
    pub accel_mss: f64,

    /// Deceleration while the backward key is held. Also the reversing acceleration.
    ///
    /// Units: meters/second^2
    pub brake_accel_mss: f64,

    /// Maximum speed in either direction.
    ///
    /// Units: meters/second
    pub max_speed_ms: f64,

    /// Speeds at or below this magnitude do not move the vehicle.
    ///
    /// Units: meters/second
    pub min_movement_threshold_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            steer_rate_degs: 90.0,
            accel_mss: 5.0,
            brake_accel_mss: 10.0,
            max_speed_ms: 30.0,
            min_movement_threshold_ms: 0.01,
        }
    }
}
