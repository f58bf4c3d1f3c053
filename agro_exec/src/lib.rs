//! # Agro-Car simulation library.
//!
//! This library allows the simulation modules to be shared between the
//! executable and its benchmarks.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Field model - the field geometry, the crop line and the point target
pub mod field;

/// Vehicle control module - proportional steering and kinematic integration
pub mod veh_ctrl;

/// Simulation driving loop - runs the controller and records the trajectory
pub mod sim_loop;

/// Trajectory history - append-only per-step snapshots of a run
pub mod traj_hist;

/// Render module - draws a completed run as an animated GIF
pub mod render;
