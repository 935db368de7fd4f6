//! Path following parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for path following
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Params {
    /// Speed of the vehicle on a straight segment.
    ///
    /// Units: meters/second
    pub base_speed_ms: f64,

    /// Distance ahead of the vehicle at which the target heading is sampled.
    ///
    /// Units: meters
    pub lookahead_m: f64,

    /// Fraction of the heading error removed on each smoothing step.
    pub smoothing_factor: f64,

    /// How the smoothing factor is applied between ticks.
    pub smoothing: SmoothingMode,

    /// The tick rate at which a `TimeScaled` smoothing step matches one `PerTick` step.
    ///
    /// Units: hertz
    pub smoothing_ref_rate_hz: f64,

    /// Lower bound on the turn slowdown factor applied to the base speed.
    pub min_slowdown: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Heading smoothing modes.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    /// The smoothing factor is applied once per tick whatever the tick length, so the turn rate
    /// depends on the frame rate.
    PerTick,

    /// The smoothing factor is rescaled by the tick length so the heading converges at the same
    /// rate whatever the frame rate.
    TimeScaled,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            base_speed_ms: 40.0,
            lookahead_m: 20.0,
            smoothing_factor: 0.05,
            smoothing: SmoothingMode::PerTick,
            smoothing_ref_rate_hz: 60.0,
            min_slowdown: 0.4,
        }
    }
}

impl Params {
    /// The fraction of the heading error to remove in a tick of length `dt_s`.
    pub fn smoothing_gain(&self, dt_s: f64) -> f64 {
        match self.smoothing {
            SmoothingMode::PerTick => self.smoothing_factor,
            SmoothingMode::TimeScaled => {
                1.0 - (1.0 - self.smoothing_factor).powf(dt_s * self.smoothing_ref_rate_hz)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_params_toml() {
        let p: Params = util::params::from_str(
            "base_speed_ms = 20.0\n\
             smoothing = \"time_scaled\"\n",
        )
        .unwrap();

        assert_eq!(p.base_speed_ms, 20.0);
        assert_eq!(p.smoothing, SmoothingMode::TimeScaled);

        // Unset values keep their defaults
        assert_eq!(p.min_slowdown, 0.4);
        assert_eq!(p.lookahead_m, 20.0);
    }

    #[test]
    fn test_smoothing_gain() {
        let mut p = Params::default();
        assert_eq!(p.smoothing_gain(0.5), 0.05);
        assert_eq!(p.smoothing_gain(0.001), 0.05);

        p.smoothing = SmoothingMode::TimeScaled;

        // One reference period is exactly one per-tick step
        assert!((p.smoothing_gain(1.0 / 60.0) - 0.05).abs() < 1e-12);

        // Two half-length ticks remove the same error as one full tick
        let half = p.smoothing_gain(1.0 / 120.0);
        let two_halves = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((two_halves - 0.05).abs() < 1e-12);
    }
}
