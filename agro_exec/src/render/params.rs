//! Render parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for rendering a run to an animated GIF.
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Width of the output image
    ///
    /// Units: pixels
    pub width_px: u32,

    /// Height of the output image
    ///
    /// Units: pixels
    pub height_px: u32,

    /// Delay between animation frames
    ///
    /// Units: milliseconds
    pub frame_delay_ms: u32,

    /// Number of history records consumed per animation frame
    pub frame_step: usize,

    /// Length of the heading arrow drawn on the car
    ///
    /// Units: metres
    pub arrow_len_m: f64,

    /// Name of the output file, created inside the session directory
    pub file_name: String
}
