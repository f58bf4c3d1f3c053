//! # Field model
//!
//! This module describes the environment the car operates in: a rectangular
//! field, the ideal crop line the car should track, and the fixed point
//! target ("the avocado") the car must detect.
//!
//! The crop line is a fixed lateral offset of half the field width plus a
//! sinusoidal perturbation, and the target sits on the crop line at the
//! field's longitudinal midpoint.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
pub use params::*;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The fixed point target to be detected during a run.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct TargetPoint {
    /// The position of the target in the field frame
    pub position_m: Vector2<f64>,

    /// Distance below which the target counts as detected
    pub radius_m: f64
}

/// Validated, immutable description of the simulated field.
#[derive(Debug, Clone)]
pub struct Field {
    params: Params,

    target: TargetPoint
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur while building the field.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("Field dimensions must be positive and finite, got {0} x {1} m")]
    InvalidDimensions(f64, f64),

    #[error("Lane width must be positive and finite, got {0} m")]
    InvalidLaneWidth(f64),

    #[error("Crop line parameters must be finite")]
    InvalidCropLine,

    #[error("Target detection radius must be positive and finite, got {0} m")]
    InvalidDetectionRadius(f64)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Field {
    /// Build a validated field from the given parameters.
    ///
    /// The target point is derived here, once, by evaluating the crop line
    /// at the field's longitudinal midpoint.
    pub fn new(params: Params) -> Result<Self, FieldError> {
        if !is_positive(params.width_m) || !is_positive(params.height_m) {
            return Err(FieldError::InvalidDimensions(
                params.width_m, params.height_m
            ))
        }
        if !is_positive(params.lane_width_m) {
            return Err(FieldError::InvalidLaneWidth(params.lane_width_m))
        }
        if !params.crop_line.amplitude_m.is_finite()
            || !params.crop_line.spatial_freq_rad_m.is_finite()
        {
            return Err(FieldError::InvalidCropLine)
        }
        if !is_positive(params.target.detection_radius_m) {
            return Err(FieldError::InvalidDetectionRadius(
                params.target.detection_radius_m
            ))
        }

        // Derive the target position from the crop line
        let mid_y_m = params.height_m / 2.0;
        let target = TargetPoint {
            position_m: Vector2::new(crop_line_x_of(&params, mid_y_m), mid_y_m),
            radius_m: params.target.detection_radius_m
        };

        Ok(Self { params, target })
    }

    /// Lateral extent of the field in metres.
    pub fn width_m(&self) -> f64 {
        self.params.width_m
    }

    /// Longitudinal extent of the field in metres.
    pub fn height_m(&self) -> f64 {
        self.params.height_m
    }

    /// Width of a single crop lane in metres.
    pub fn lane_width_m(&self) -> f64 {
        self.params.lane_width_m
    }

    /// The point target for this field.
    pub fn target(&self) -> &TargetPoint {
        &self.target
    }

    /// Lateral position of the ideal crop line at the given longitudinal
    /// coordinate.
    ///
    /// Pure and defined for all real `y_m`.
    pub fn crop_line_x(&self, y_m: f64) -> f64 {
        crop_line_x_of(&self.params, y_m)
    }

    /// Hard clip a position to the field bounds.
    ///
    /// Returns the clipped position and a flag indicating whether clipping
    /// occured. Positions outside the field are not an error.
    pub fn clamp_to_bounds(&self, position_m: Vector2<f64>) -> (Vector2<f64>, bool) {
        let clamped_m = Vector2::new(
            clamp(&position_m[0], &0f64, &self.params.width_m),
            clamp(&position_m[1], &0f64, &self.params.height_m)
        );

        (clamped_m, clamped_m != position_m)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Evaluate the crop line for the given parameters.
fn crop_line_x_of(params: &Params, y_m: f64) -> f64 {
    params.width_m / 2.0
        + params.crop_line.amplitude_m
        * (y_m * params.crop_line.spatial_freq_rad_m).sin()
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0f64
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
