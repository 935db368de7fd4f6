//! # Log renderer
//!
//! Headless `Renderer` which reports the vehicle in the log at a reduced rate and optionally
//! archives every rendered frame as a track.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use serde::Serialize;

// Internal
use nav_if::{
    geo::{GeoPoint, Path, VehicleState},
    svc::Renderer,
};
use util::{archive::Archiver, session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Renders the vehicle into the log and the track archive.
pub struct LogRenderer {
    /// A log line is written every this many frames, 0 disables logging.
    log_every_n_frames: u64,

    num_frames: u64,

    archiver: Option<Archiver>,
}

/// One row of the track archive.
#[derive(Debug, Serialize)]
struct TrackRecord {
    time_s: f64,
    lat_deg: f64,
    lng_deg: f64,
    heading_deg: f64,
    speed_ms: f64,
    progress: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LogRenderer {
    pub fn new(log_every_n_frames: u64) -> Self {
        Self {
            log_every_n_frames,
            num_frames: 0,
            archiver: None,
        }
    }

    /// Also write each rendered frame into the given archive.
    pub fn with_archive(mut self, archiver: Archiver) -> Self {
        self.archiver = Some(archiver);
        self
    }

    pub fn num_frames(&self) -> u64 {
        self.num_frames
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, state: &VehicleState, path: Option<&Path>, destination: Option<GeoPoint>) {
        if self.log_every_n_frames > 0 && self.num_frames % self.log_every_n_frames == 0 {
            info!(
                "Vehicle at ({:.6}, {:.6}) heading {:.1} deg, speed {:.1} m/s, progress {:.3} \
                 (path: {} points, destination: {:?})",
                state.position.lat_deg,
                state.position.lng_deg,
                state.heading_deg,
                state.speed_ms,
                state.progress,
                path.map(|p| p.get_num_points()).unwrap_or(0),
                destination
            );
        }

        self.num_frames += 1;

        let archived = match self.archiver.as_mut() {
            Some(arch) => arch.serialise(TrackRecord::new(state)),
            None => return,
        };

        if let Err(e) = archived {
            warn!("Could not archive the vehicle track, archiving disabled: {}", e);
            self.archiver = None;
        }
    }
}

impl TrackRecord {
    fn new(state: &VehicleState) -> Self {
        Self {
            time_s: session::get_elapsed_seconds(),
            lat_deg: state.position.lat_deg,
            lng_deg: state.position.lng_deg,
            heading_deg: state.heading_deg,
            speed_ms: state.speed_ms,
            progress: state.progress,
        }
    }
}
