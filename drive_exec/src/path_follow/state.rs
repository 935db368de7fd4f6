//! Path following module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{Params, PathFollowError};
use crate::geo::{bearing_deg, heading_delta_deg, lerp, PathProfile};
use nav_if::geo::{Path, VehicleState};
use util::maths::{lin_map, wrap_deg_360};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Plays a vehicle along a fixed path.
pub struct PathFollow {
    params: Params,

    /// The path being followed, at least 2 points long.
    path: Path,

    /// Cumulative lengths of `path`, computed once when following starts.
    profile: PathProfile,

    report: StatusReport,
}

/// The status report containing the quantities computed on the last tick.
#[derive(Default, Copy, Clone, Debug, Serialize)]
pub struct StatusReport {
    /// Index of the segment containing the vehicle
    pub segment_index: usize,

    /// Distance along the path at the start of the tick
    pub current_dist_m: f64,

    /// Bearing of the look-ahead segment, or `None` if no segment from there on has a length
    pub target_heading_deg: Option<f64>,

    /// Turn slowdown applied to the base speed
    pub speed_factor: f64,

    /// Speed used to advance progress
    pub speed_ms: f64,

    /// True once the end of the path has been reached
    pub completed: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathFollow {
    /// Begin following the given path.
    ///
    /// Paths with fewer than two points cannot be followed.
    pub fn new(params: Params, path: Path) -> Result<Self, PathFollowError> {
        if path.get_num_points() < 2 {
            return Err(PathFollowError::PathTooShort(path.get_num_points()));
        }

        let profile = PathProfile::new(&path);

        Ok(Self {
            params,
            path,
            profile,
            report: StatusReport::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total length of the path being followed.
    ///
    /// Units: meters
    pub fn length_m(&self) -> f64 {
        self.profile.length_m()
    }

    /// The report from the last call to `proc`.
    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// Advance the vehicle along the path by `dt_s` seconds.
    ///
    /// Returns the new state and whether the end of the path has been reached. Ticks with a
    /// non-positive or non-finite `dt_s` leave the state untouched.
    pub fn proc(&mut self, prev: &VehicleState, dt_s: f64) -> (VehicleState, bool) {
        self.report = StatusReport::default();

        if !dt_s.is_finite() || dt_s <= 0.0 {
            return (*prev, prev.progress >= 1.0);
        }

        let mut state = *prev;
        let length_m = self.profile.length_m();

        // A path made of coincident points has nowhere to go, it is arrived at immediately
        if prev.progress >= 1.0 || length_m <= 0.0 {
            return (self.arrive(state), true);
        }

        // ---- POSITION ----

        let progress = prev.progress.max(0.0);
        let current_dist_m = progress * length_m;
        self.report.current_dist_m = current_dist_m;

        let loc = match self.profile.locate(current_dist_m) {
            Some(l) => l,
            None => return (self.arrive(state), true),
        };
        self.report.segment_index = loc.index;

        state.position = lerp(
            &self.path.points[loc.index],
            &self.path.points[loc.index + 1],
            loc.fraction,
        );

        // ---- HEADING ----

        let lookahead_dist_m = (current_dist_m + self.params.lookahead_m).min(length_m);
        let target_heading_deg = self
            .profile
            .locate(lookahead_dist_m)
            .and_then(|l| self.bearing_from(l.index))
            .map(|(_, b)| b);
        self.report.target_heading_deg = target_heading_deg;

        state.heading_deg = match target_heading_deg {
            Some(target_deg) => wrap_deg_360(
                prev.heading_deg
                    + heading_delta_deg(target_deg, prev.heading_deg)
                        * self.params.smoothing_gain(dt_s),
            ),
            None => wrap_deg_360(prev.heading_deg),
        };

        // ---- SPEED AND PROGRESS ----

        let speed_factor = self.turn_speed_factor(loc.index);
        let speed_ms = self.params.base_speed_ms * speed_factor;
        self.report.speed_factor = speed_factor;
        self.report.speed_ms = speed_ms;

        state.progress = (progress + speed_ms * dt_s / length_m).min(1.0);

        trace!(
            "PathFollow: seg {} dist {:.2} m, heading {:.2} deg -> {:?}, speed {:.2} m/s",
            loc.index,
            current_dist_m,
            state.heading_deg,
            target_heading_deg,
            speed_ms
        );

        if state.progress >= 1.0 {
            return (self.arrive(state), true);
        }

        (state, false)
    }

    /// Put the vehicle at the end of the path.
    fn arrive(&mut self, mut state: VehicleState) -> VehicleState {
        state.progress = 1.0;
        state.heading_deg = wrap_deg_360(state.heading_deg);
        if let Some(dest) = self.path.destination() {
            state.position = dest;
        }

        self.report.completed = true;

        state
    }

    /// Index and bearing of the first segment at or after `index` which has a length.
    fn bearing_from(&self, index: usize) -> Option<(usize, f64)> {
        (index..self.profile.get_num_segments())
            .find(|i| matches!(self.profile.segment_length_m(*i), Some(l) if l > 0.0))
            .map(|i| (i, bearing_deg(&self.path.points[i], &self.path.points[i + 1])))
    }

    /// The slowdown for the turn between the segment at `index` and the next one with a length.
    ///
    /// A 90 degree or sharper turn gives the minimum factor, straight ahead (or no next segment)
    /// gives 1. Repeated points in between do not hide the turn.
    fn turn_speed_factor(&self, index: usize) -> f64 {
        let (current_index, current_deg) = match self.bearing_from(index) {
            Some(b) => b,
            None => return 1.0,
        };

        match self.bearing_from(current_index + 1) {
            Some((_, next_deg)) => {
                let angle_diff_deg = heading_delta_deg(next_deg, current_deg).abs();
                lin_map((0.0, 90.0), (1.0, 0.0), angle_diff_deg).max(self.params.min_slowdown)
            }
            None => 1.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geo::{distance_m, path_length_m};
    use nav_if::geo::GeoPoint;

    fn p(lat_deg: f64, lng_deg: f64) -> GeoPoint {
        GeoPoint::new(lat_deg, lng_deg)
    }

    fn straight_path() -> Path {
        Path::from(vec![p(0.0, 0.0), p(0.0, 0.001), p(0.0, 0.002)])
    }

    fn turn_path() -> Path {
        // East then north
        Path::from(vec![p(0.0, 0.0), p(0.0, 0.001), p(0.001, 0.001)])
    }

    #[test]
    fn test_refuse_short_path() {
        assert!(matches!(
            PathFollow::new(Params::default(), Path::new_empty()),
            Err(PathFollowError::PathTooShort(0))
        ));
        assert!(matches!(
            PathFollow::new(Params::default(), Path::from(vec![p(1.0, 1.0)])),
            Err(PathFollowError::PathTooShort(1))
        ));
    }

    #[test]
    fn test_reaches_end() {
        let path = straight_path();
        let length_m = path_length_m(&path);
        let mut pf = PathFollow::new(Params::default(), path).unwrap();

        let dt_s = 1.0 / 60.0;
        let mut state = VehicleState::at(p(0.0, 0.0));
        let mut ticks = 0;
        let mut completed = false;

        while !completed && ticks < 10_000 {
            let prev_progress = state.progress;
            let (s, c) = pf.proc(&state, dt_s);

            assert!(s.progress >= prev_progress);
            assert!(s.progress >= 0.0 && s.progress <= 1.0);
            assert!(s.heading_deg >= 0.0 && s.heading_deg < 360.0);

            state = s;
            completed = c;
            ticks += 1;
        }

        assert!(completed);
        assert_eq!(state.progress, 1.0);
        assert_eq!(state.position, p(0.0, 0.002));
        assert!(pf.report().completed);

        // Straight path so always at base speed
        let expected_ticks = (length_m / 40.0 / dt_s).ceil() as i32;
        assert!((ticks - expected_ticks).abs() <= 1, "took {} ticks", ticks);

        // Further ticks do not move the vehicle back
        let (s, c) = pf.proc(&state, dt_s);
        assert!(c);
        assert_eq!(s.progress, 1.0);
    }

    #[test]
    fn test_position_interpolation() {
        let path = straight_path();
        let length_m = path_length_m(&path);
        let mut pf = PathFollow::new(Params::default(), path).unwrap();

        let mut state = VehicleState::at(p(0.0, 0.0));
        state.progress = 0.25;
        state.heading_deg = 90.0;

        let (s, _) = pf.proc(&state, 0.1);

        // A quarter of the way along is half way along the first segment
        assert!((s.position.lng_deg - 0.0005).abs() < 1e-9);
        assert_eq!(s.position.lat_deg, 0.0);
        assert_eq!(pf.report().segment_index, 0);
        assert!((pf.report().current_dist_m - 0.25 * length_m).abs() < 1e-9);

        assert!((s.progress - (0.25 + 40.0 * 0.1 / length_m)).abs() < 1e-12);
    }

    #[test]
    fn test_heading_smoothing() {
        let mut pf = PathFollow::new(Params::default(), straight_path()).unwrap();

        // Path heads east, the vehicle starts pointing north
        let (s, _) = pf.proc(&VehicleState::at(p(0.0, 0.0)), 1.0 / 60.0);
        let target_deg = pf.report().target_heading_deg.unwrap();
        assert!((target_deg - 90.0).abs() < 1e-6);
        assert!((s.heading_deg - 0.05 * target_deg).abs() < 1e-9);

        // Smoothing crosses north the short way round
        let mut state = VehicleState::at(p(0.0, 0.0));
        state.heading_deg = 350.0;
        let mut pf = PathFollow::new(
            Params::default(),
            Path::from(vec![p(0.0, 0.0), p(0.001, 0.0001)]),
        )
        .unwrap();
        let (s, _) = pf.proc(&state, 1.0 / 60.0);
        let target_deg = pf.report().target_heading_deg.unwrap();
        assert!(target_deg > 0.0 && target_deg < 10.0);
        let expected = 350.0 + (target_deg + 10.0) * 0.05;
        assert!((s.heading_deg - expected).abs() < 1e-9);
    }

    #[test]
    fn test_lookahead_anticipates_turn() {
        let path = turn_path();
        let first_seg_m = distance_m(&path.points[0], &path.points[1]);
        let length_m = path_length_m(&path);
        let mut pf = PathFollow::new(Params::default(), path).unwrap();

        // 10 m before the corner the 20 m look-ahead already sees the northbound segment
        let mut state = VehicleState::at(p(0.0, 0.0));
        state.progress = (first_seg_m - 10.0) / length_m;
        state.heading_deg = 90.0;

        pf.proc(&state, 1.0 / 60.0);
        let target_deg = pf.report().target_heading_deg.unwrap();
        assert!(target_deg.abs() < 1e-3 || (360.0 - target_deg) < 1e-3);
        assert_eq!(pf.report().segment_index, 0);
    }

    #[test]
    fn test_turn_slowdown() {
        let path = turn_path();
        let length_m = path_length_m(&path);
        let mut pf = PathFollow::new(Params::default(), path).unwrap();

        let (s, _) = pf.proc(&VehicleState::at(p(0.0, 0.0)), 1.0);

        // A right angle turn ahead gives the minimum slowdown
        assert_eq!(pf.report().speed_factor, 0.4);
        assert!((pf.report().speed_ms - 16.0).abs() < 1e-12);
        assert!((s.progress - 16.0 / length_m).abs() < 1e-12);

        // On the last segment there is no turn ahead
        let mut state = s;
        state.progress = 0.75;
        pf.proc(&state, 1.0);
        assert_eq!(pf.report().segment_index, 1);
        assert_eq!(pf.report().speed_factor, 1.0);
    }

    #[test]
    fn test_turn_slowdown_repeated_corner() {
        // Same right angle turn with the corner point given twice
        let path = Path::from(vec![
            p(0.0, 0.0),
            p(0.0, 0.001),
            p(0.0, 0.001),
            p(0.001, 0.001),
        ]);
        let mut pf = PathFollow::new(Params::default(), path).unwrap();

        pf.proc(&VehicleState::at(p(0.0, 0.0)), 1.0);
        assert_eq!(pf.report().speed_factor, 0.4);

        // A look-ahead landing on a repeated point takes the bearing of the segment beyond it
        let mut params = Params::default();
        params.lookahead_m = 0.0;
        let path = Path::from(vec![p(0.0, 0.0), p(0.0, 0.0), p(0.001, 0.0)]);
        let mut pf = PathFollow::new(params, path).unwrap();
        let mut state = VehicleState::at(p(0.0, 0.0));
        state.heading_deg = 90.0;

        let (s, _) = pf.proc(&state, 1.0 / 60.0);
        let target_deg = pf.report().target_heading_deg.unwrap();
        assert!(target_deg.abs() < 1e-6);
        assert!(s.heading_deg < 90.0);
    }

    #[test]
    fn test_gentle_turn_slowdown() {
        // Roughly a 45 degree turn to the left
        let path = Path::from(vec![p(0.0, 0.0), p(0.0, 0.001), p(0.001, 0.002)]);
        let mut pf = PathFollow::new(Params::default(), path).unwrap();

        pf.proc(&VehicleState::at(p(0.0, 0.0)), 0.1);
        let factor = pf.report().speed_factor;
        assert!((factor - 0.5).abs() < 0.01, "factor was {}", factor);
    }

    #[test]
    fn test_degenerate_paths() {
        // All points coincident, arrived immediately
        let mut pf = PathFollow::new(
            Params::default(),
            Path::from(vec![p(1.0, 1.0), p(1.0, 1.0)]),
        )
        .unwrap();
        let (s, c) = pf.proc(&VehicleState::at(p(1.0, 1.0)), 0.1);
        assert!(c);
        assert_eq!(s.progress, 1.0);

        // A zero length segment at the start is skipped over without a heading change
        let path = Path::from(vec![p(0.0, 0.0), p(0.0, 0.0), p(0.0, 0.001)]);
        let mut pf = PathFollow::new(Params::default(), path).unwrap();
        let mut state = VehicleState::at(p(0.0, 0.0));
        state.heading_deg = 90.0;
        let (s, c) = pf.proc(&state, 0.1);
        assert!(!c);
        assert!(s.progress > 0.0);
        assert!((s.heading_deg - 90.0).abs() < 1e-6);
        assert_eq!(pf.report().speed_factor, 1.0);
    }

    #[test]
    fn test_invalid_dt() {
        let mut pf = PathFollow::new(Params::default(), straight_path()).unwrap();
        let state = VehicleState::at(p(0.0, 0.0));

        for dt_s in &[0.0, -1.0, std::f64::NAN, std::f64::INFINITY] {
            let (s, c) = pf.proc(&state, *dt_s);
            assert_eq!(s, state);
            assert!(!c);
        }
    }
}
