//! # Drive library.
//!
//! This library contains the driving simulation's kinematics: the geometry primitives, the path
//! follower, the manual controller and the simulation manager which arbitrates between them. It
//! also provides the pieces the `drive_exec` executable is assembled from, so that other hosts
//! can tick the simulation in their own frame loop.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Geometry primitives - distances, bearings and locating points along a path
pub mod geo;

/// Path following module - plays the vehicle along a fixed path
pub mod path_follow;

/// Manual control module - drives the vehicle from directional inputs
pub mod manual_ctrl;

/// Simulation manager - owns the vehicle state and selects the active controller
pub mod sim_mgr;

/// Frame scheduling - frame clock and cancellable frame loop
pub mod frame;

/// Offline place table and great circle router
pub mod route;

/// Headless renderer writing the vehicle into the log and track archive
pub mod render;

/// Executable parameters
pub mod params;

/// Global data store for the executable
pub mod data_store;

/// Telecommand processor
pub mod tc_processor;
