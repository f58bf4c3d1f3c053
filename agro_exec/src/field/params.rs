//! Field model parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters describing the field and its crop line.
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Lateral extent of the field
    ///
    /// Units: metres
    pub width_m: f64,

    /// Longitudinal extent of the field
    ///
    /// Units: metres
    pub height_m: f64,

    /// Width of a single crop lane
    ///
    /// Units: metres
    pub lane_width_m: f64,

    /// Shape of the ideal crop line
    pub crop_line: CropLineParams,

    /// Point target parameters
    pub target: TargetParams
}

/// Shape of the sinusoidal crop line.
///
/// The line is centred on half the field width, with a perturbation of
/// `amplitude_m * sin(spatial_freq_rad_m * y)`.
#[derive(Deserialize, Debug, Clone)]
pub struct CropLineParams {

    /// Amplitude of the sinusoidal perturbation about the field centre
    ///
    /// Units: metres
    pub amplitude_m: f64,

    /// Spatial frequency of the perturbation
    ///
    /// Units: radians per metre travelled along the field
    pub spatial_freq_rad_m: f64
}

/// Point target parameters.
#[derive(Deserialize, Debug, Clone)]
pub struct TargetParams {

    /// Distance below which the target counts as detected
    ///
    /// Units: metres
    pub detection_radius_m: f64
}
