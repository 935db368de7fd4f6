//! Main driving simulation executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Frame loop:
//!         - Telecommand processing and handling
//!         - Input snapshot
//!         - Simulation manager processing
//!         - Rendering
//!
//! # Modules
//!
//! All cyclic modules (e.g. `sim_mgr`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::path::PathBuf;
use structopt::StructOpt;

// Internal
use drive_lib::{
    data_store::DataStore,
    frame::{FrameLoop, LoopControl, LoopExit},
    params::DriveExecParams,
    render::LogRenderer,
    route::{DirectRouter, PlaceTable},
    sim_mgr::{SimMode, TickInput},
    tc_processor,
};
use nav_if::{svc::Renderer, tc::Tc};
use util::{
    archive::Archiver,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options for the executable.
#[derive(Debug, StructOpt)]
#[structopt(name = "drive_exec", about = "Driving simulation executable")]
struct Opt {
    /// Script of timed telecommands to execute
    #[structopt(short, long, parse(from_os_str))]
    script: Option<PathBuf>,

    /// Identifier of the place the route starts at
    #[structopt(short, long)]
    origin: Option<String>,

    /// Identifier of the place the route ends at
    #[structopt(short, long)]
    destination: Option<String>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("drive_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Driving Simulation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let exec_params: DriveExecParams =
        util::params::load("drive_exec.toml").wrap_err("Could not load exec params")?;

    let places: PlaceTable =
        util::params::load("places.toml").wrap_err("Could not load the place table")?;

    info!("Exec parameters loaded, {} places known", places.len());

    // ---- INITIALISE TC SOURCE ----

    let mut script = match opt.script {
        Some(ref path) => {
            info!("Loading script from {:?}", path);

            let si = ScriptInterpreter::new(path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} TCs\n",
                si.get_duration(),
                si.get_num_tcs()
            );

            Some(si)
        }
        None => None,
    };

    // Without a script the only thing to do is play the tutorial along the given route
    let route_tc = match (opt.origin, opt.destination) {
        (Some(origin_id), Some(destination_id)) => Some(Tc::Route {
            origin_id,
            destination_id,
        }),
        (None, None) => None,
        _ => return Err(eyre!("Both an origin and a destination are needed for a route")),
    };

    if script.is_none() && route_tc.is_none() {
        return Err(eyre!(
            "Expected either a script or an origin and destination to route between"
        ));
    }

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    ds.sim_mgr
        .init(("path_follow.toml", "manual_ctrl.toml"), &session)
        .wrap_err("Failed to initialise SimMgr")?;
    info!("SimMgr init complete");

    let router = DirectRouter::new(exec_params.router_point_sep_m);

    let mut renderer = LogRenderer::new(exec_params.render_log_every_n_frames());
    if exec_params.track_archive {
        renderer = renderer.with_archive(
            Archiver::from_path(&session, "track.csv")
                .wrap_err("Failed to create the track archive")?,
        );
    }

    let mut frame_loop = FrameLoop::new(exec_params.cycle_period_s, ds.cancel.clone())
        .wrap_err("Failed to create the frame loop")?;

    info!("Module initialisation complete\n");

    // ---- INITIAL ROUTE ----

    if let Some(tc) = route_tc {
        tc_processor::exec(&mut ds, &tc, &places, &router);

        if script.is_none() {
            tc_processor::exec(&mut ds, &Tc::StartTutorial, &places, &router);

            if ds.sim_mgr.mode() == SimMode::Idle {
                return Err(eyre!("The tutorial could not be started"));
            }
        }
    }

    // ---- MAIN LOOP ----

    info!("Beginning main loop\n");

    let exit = frame_loop.run(|dt_s| {
        // Clear items that need wiping at the start of the cycle
        ds.cycle_start();

        // ---- TELECOMMAND PROCESSING ----

        if let Some(ref mut si) = script {
            match si.get_pending_tcs() {
                PendingTcs::None => (),
                PendingTcs::Some(tc_vec) => {
                    for tc in tc_vec.iter() {
                        tc_processor::exec(&mut ds, tc, &places, &router);
                    }
                }
                // Exit if end of script reached
                PendingTcs::EndOfScript => {
                    info!("End of TC script reached, stopping");
                    return LoopControl::Break;
                }
            }
        }

        // A stop TC ends the loop before the vehicle moves again
        if ds.cancel.is_cancelled() {
            return LoopControl::Continue;
        }

        // ---- SIMULATION ----

        let input = TickInput {
            dt_s,
            input: ds.input.snapshot(),
        };

        match ds.sim_mgr.proc(&input) {
            Ok((output, report)) => {
                ds.sim_mgr_output = output;
                ds.sim_mgr_status_rpt = report;
            }
            Err(e) => warn!("Error during SimMgr processing: {}", e),
        }

        // ---- RENDERING ----

        renderer.render(&ds.sim_mgr_output.state, ds.path.as_ref(), ds.destination);

        ds.cycle_end();

        if ds.sim_mgr_output.completed {
            info!("Destination reached after {:.02} s", ds.sim_time_s);

            if script.is_none() {
                return LoopControl::Break;
            }
        }

        LoopControl::Continue
    });

    // ---- SHUTDOWN ----

    match exit {
        LoopExit::Finished => info!("Main loop finished after {} frames", frame_loop.num_frames()),
        LoopExit::Cancelled => info!("Main loop cancelled by stop command"),
    }

    info!(
        "{} cycles simulated, {} path(s) completed",
        ds.num_cycles, ds.num_completions
    );

    session.save("drive_exec/final_state.json", ds.sim_mgr.state());
    session.exit();

    info!("End of execution");

    Ok(())
}
