//! Simulation driving loop parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the driving loop
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Duration of a single simulated step
    ///
    /// Units: seconds
    pub dt_s: f64,

    /// Upper bound on the number of simulated steps
    pub max_steps: usize,

    /// Initial position of the car in the field frame
    ///
    /// Units: metres
    pub start_pos_m: Vector2<f64>,

    /// Initial heading of the car from the longitudinal axis
    ///
    /// Units: radians
    pub start_heading_rad: f64
}
