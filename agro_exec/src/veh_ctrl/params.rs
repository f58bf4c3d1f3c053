//! Vehicle control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for vehicle control
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Forward speed of the car
    ///
    /// Units: metres/second
    pub speed_ms: f64,

    /// Proportional steering gain. The heading rate is this gain times the
    /// lateral error to the crop line.
    ///
    /// Units: radians/second per metre of error
    pub steer_k_p: f64
}
