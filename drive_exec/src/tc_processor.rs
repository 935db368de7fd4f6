//! # Telecommand processor module
//!
//! The telecommand processor handles various TCs coming from any source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};

// Internal
use crate::data_store::DataStore;
use nav_if::{
    geo::Path,
    svc::{PlaceResolver, Router},
    tc::Tc,
};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to send commands to different modules. Places are resolved and routes
/// fetched through the given collaborators.
pub fn exec(ds: &mut DataStore, tc: &Tc, resolver: &dyn PlaceResolver, router: &dyn Router) {
    // Handle different Tcs
    match tc {
        Tc::Route {
            origin_id,
            destination_id,
        } => {
            debug!("Received Route command: {} -> {}", origin_id, destination_id);
            route(ds, origin_id, destination_id, resolver, router);
        }
        Tc::StartTutorial => {
            debug!("Received StartTutorial command");

            // Without a path the start is refused as too short
            let empty = Path::new_empty();
            let path = ds.path.as_ref().unwrap_or(&empty);

            if let Err(e) = ds.sim_mgr.start_path_following(path, ds.origin) {
                warn!("Could not start the tutorial: {}", e);
            }
        }
        Tc::StartManual => {
            debug!("Received StartManual command");

            if let Err(e) = ds.sim_mgr.start_manual(ds.origin) {
                warn!("Could not start manual driving: {}", e);
            }
        }
        Tc::Reset => {
            debug!("Received Reset command");
            let home = ds.home();
            ds.sim_mgr.reset(home);
            ds.input.clear();
        }
        Tc::Press { .. } | Tc::Release { .. } => {
            if let Some(event) = tc.input_event() {
                ds.input.apply(event);
            }
        }
        Tc::Stop => {
            info!("Received Stop command");
            ds.cancel.cancel();
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Resolve both places and fetch the path between them.
///
/// Any failure leaves the data store without a route so a following start is refused.
fn route(
    ds: &mut DataStore,
    origin_id: &str,
    destination_id: &str,
    resolver: &dyn PlaceResolver,
    router: &dyn Router,
) {
    ds.path = None;
    ds.origin = None;
    ds.destination = None;

    let (origin, destination) = match (resolver.resolve(origin_id), resolver.resolve(destination_id))
    {
        (Ok(o), Ok(d)) => (o, d),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Could not resolve the route's places: {}", e);
            return;
        }
    };

    match router.route(origin, destination) {
        Ok(path) => {
            info!(
                "New route from \"{}\" to \"{}\" with {} points",
                origin_id,
                destination_id,
                path.get_num_points()
            );
            ds.origin = Some(origin);
            ds.destination = Some(destination);
            ds.path = Some(path);
        }
        Err(e) => warn!("Could not route: {}", e),
    }
}
