//! Vehicle control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use super::Params;
use crate::field::{Field, TargetPoint};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The pose (position and heading) of the car in the field frame.
///
/// The heading is measured from the longitudinal (+y) axis, positive
/// towards +x, so a zero heading points straight up the field.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Pose {
    /// The position in the field frame
    pub position_m: Vector2<f64>,

    /// The heading angle from the longitudinal axis in radians
    pub heading_rad: f64
}

/// The full state of the vehicle.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct VehState {
    /// Current pose of the car
    pub pose: Pose,

    /// True once the target has been detected. Never cleared within a run.
    pub target_detected: bool
}

/// Vehicle control module
#[derive(Default)]
pub struct VehCtrl {
    ctx: Option<Ctx>
}

/// Initialisation data for VehCtrl
pub struct InitData {
    /// Control parameters
    pub params: Params,

    /// The field the car operates in
    pub field: Field,

    /// The pose the car starts the run in
    pub init_pose: Pose
}

/// Input data for one processing cycle
#[derive(Debug, Copy, Clone)]
pub struct InputData {
    /// The time increment to integrate over
    ///
    /// Units: seconds
    pub dt_s: f64
}

/// The status report containing monitoring quantities for one cycle.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// The lateral error to the crop line used for the steering update
    pub lat_error_m: f64,

    /// True if the position was clipped to the field boundary this cycle
    pub boundary_clamped: bool,

    /// True only on the cycle in which the target was first detected
    pub target_found: bool
}

/// Internal context, populated at init.
struct Ctx {
    params: Params,
    field: Field,
    target: TargetPoint,
    state: VehState
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during processing of the module.
#[derive(Debug, thiserror::Error)]
pub enum VehCtrlError {
    #[error("Vehicle speed must be positive and finite, got {0} m/s")]
    InvalidSpeed(f64),

    #[error("Steering gain must be finite, got {0}")]
    InvalidSteerGain(f64),

    /// Attempted to process a cycle before the module was initialised.
    #[error("The module has not been initialised")]
    NotInitialised,

    #[error("Time increments must be non-negative and finite, got {0} s")]
    InvalidTimestep(f64)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for VehCtrl {
    type InitData = InitData;
    type InitError = VehCtrlError;

    type InputData = InputData;
    type OutputData = VehState;
    type StatusReport = StatusReport;
    type ProcError = VehCtrlError;

    /// Initialise the VehCtrl module, validating the control parameters.
    fn init(&mut self, init_data: Self::InitData) -> Result<(), VehCtrlError> {
        let InitData { params, field, init_pose } = init_data;

        // Validate the parameters
        if !params.speed_ms.is_finite() || params.speed_ms <= 0f64 {
            return Err(VehCtrlError::InvalidSpeed(params.speed_ms))
        }
        if !params.steer_k_p.is_finite() {
            return Err(VehCtrlError::InvalidSteerGain(params.steer_k_p))
        }

        // The car starts inside the field regardless of the commanded
        // initial pose, keeping the bounds invariant from the first cycle
        let (position_m, _) = field.clamp_to_bounds(init_pose.position_m);

        let target = *field.target();

        self.ctx = Some(Ctx {
            params,
            field,
            target,
            state: VehState {
                pose: Pose {
                    position_m,
                    heading_rad: init_pose.heading_rad
                },
                target_detected: false
            }
        });

        Ok(())
    }

    /// Perform one control and integration cycle.
    fn proc(&mut self, input_data: &InputData)
        -> Result<(VehState, StatusReport), VehCtrlError>
    {
        // Validate context
        let ctx = match self.ctx {
            Some(ref mut c) => c,
            None => return Err(VehCtrlError::NotInitialised)
        };

        // A zero increment is a valid no-motion update, negative or
        // non-finite increments are rejected
        if !input_data.dt_s.is_finite() || input_data.dt_s < 0f64 {
            return Err(VehCtrlError::InvalidTimestep(input_data.dt_s))
        }

        let (state, report) = step(
            &ctx.params, &ctx.field, &ctx.target, &ctx.state, input_data.dt_s
        );

        ctx.state = state;

        trace!(
            "VehCtrl output:\n    pos: [{:.3}, {:.3}] m\n    heading: {:.4} rad\n    lat error: {:.3} m",
            state.pose.position_m[0],
            state.pose.position_m[1],
            state.pose.heading_rad,
            report.lat_error_m
        );

        Ok((state, report))
    }
}

impl VehCtrl {
    /// Get the current vehicle state, if the module has been initialised.
    pub fn state(&self) -> Option<&VehState> {
        self.ctx.as_ref().map(|c| &c.state)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Advance the vehicle state by one time increment.
///
/// This is a pure transition function, the module's `proc` is a thin
/// stateful wrapper around it. One update consists of:
///  1. Computing the lateral tracking error to the crop line.
///  2. Adjusting the heading by the proportional steering law.
///  3. Integrating the position with the single-integrator forward
///     kinematics.
///  4. Hard clipping the position to the field bounds.
///  5. Checking proximity to the target on the updated position.
pub fn step(
    params: &Params,
    field: &Field,
    target: &TargetPoint,
    state: &VehState,
    dt_s: f64
) -> (VehState, StatusReport) {
    let mut report = StatusReport::default();
    let pose = state.pose;

    // Lateral tracking error to the crop line at the car's current
    // longitudinal coordinate
    let lat_error_m = field.crop_line_x(pose.position_m[1]) - pose.position_m[0];
    report.lat_error_m = lat_error_m;

    // Proportional steering, no integral or derivative term and no rate
    // limit
    let heading_rad = pose.heading_rad + params.steer_k_p * lat_error_m * dt_s;

    // Single-integrator forward kinematics, heading measured from the
    // longitudinal axis
    let direction = Vector2::new(heading_rad.sin(), heading_rad.cos());
    let unclamped_m = pose.position_m + params.speed_ms * dt_s * direction;

    // Positions outside the field are hard clipped, not errors. The heading
    // above is kept as integrated, even when the position is pinned.
    let (position_m, boundary_clamped) = field.clamp_to_bounds(unclamped_m);
    report.boundary_clamped = boundary_clamped;

    // Proximity check on the updated position. Detection latches, once set
    // it is never cleared within a run.
    let mut target_detected = state.target_detected;
    if !target_detected {
        let dist_m = (target.position_m - position_m).norm();

        if dist_m < target.radius_m {
            target_detected = true;
            report.target_found = true;
        }
    }

    (
        VehState {
            pose: Pose {
                position_m,
                heading_rad
            },
            target_detected
        },
        report
    )
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::field::{self, CropLineParams, TargetParams};
    use std::f64::consts::FRAC_PI_2;

    fn test_field() -> Field {
        Field::new(field::Params {
            width_m: 100.0,
            height_m: 200.0,
            lane_width_m: 10.0,
            crop_line: CropLineParams {
                amplitude_m: 5.0,
                spatial_freq_rad_m: 0.05
            },
            target: TargetParams {
                detection_radius_m: 3.0
            }
        })
        .unwrap()
    }

    fn test_params() -> Params {
        Params {
            speed_ms: 6.0,
            steer_k_p: 0.1
        }
    }

    fn init_ctrl(init_pose: Pose) -> VehCtrl {
        let mut ctrl = VehCtrl::default();
        ctrl.init(InitData {
            params: test_params(),
            field: test_field(),
            init_pose
        })
        .unwrap();
        ctrl
    }

    #[test]
    fn test_zero_dt_is_identity() {
        let mut ctrl = init_ctrl(Pose {
            position_m: Vector2::new(45.0, 0.0),
            heading_rad: 0.0
        });

        // Repeated zero-duration updates change nothing, but the error term
        // is still computed
        for _ in 0..5 {
            let (state, report) = ctrl.proc(&InputData { dt_s: 0.0 }).unwrap();

            assert_eq!(state.pose.position_m, Vector2::new(45.0, 0.0));
            assert_eq!(state.pose.heading_rad, 0.0);
            assert!(!state.target_detected);
            assert_eq!(report.lat_error_m, 5.0);
        }
    }

    #[test]
    fn test_zero_dt_detects_within_radius() {
        let field = test_field();
        let mut ctrl = init_ctrl(Pose {
            position_m: field.target().position_m,
            heading_rad: 0.0
        });

        // Detection still fires under a zero increment when the car is
        // already within the radius, and the found flag is one-shot
        let (state, report) = ctrl.proc(&InputData { dt_s: 0.0 }).unwrap();
        assert!(state.target_detected);
        assert!(report.target_found);

        let (state, report) = ctrl.proc(&InputData { dt_s: 0.0 }).unwrap();
        assert!(state.target_detected);
        assert!(!report.target_found);
    }

    #[test]
    fn test_single_step_matches_model() {
        let mut ctrl = init_ctrl(Pose {
            position_m: Vector2::new(45.0, 0.0),
            heading_rad: 0.0
        });

        let (state, report) = ctrl.proc(&InputData { dt_s: 0.1 }).unwrap();

        // Hand-computed single update: error 5 m, heading 0.05 rad
        let exp_heading_rad: f64 = 0.1 * 5.0 * 0.1;
        let exp_x_m = 45.0 + 6.0 * exp_heading_rad.sin() * 0.1;
        let exp_y_m = 6.0 * exp_heading_rad.cos() * 0.1;

        assert_eq!(report.lat_error_m, 5.0);
        assert!((state.pose.heading_rad - exp_heading_rad).abs() < 1e-12);
        assert!((state.pose.position_m[0] - exp_x_m).abs() < 1e-12);
        assert!((state.pose.position_m[1] - exp_y_m).abs() < 1e-12);
    }

    #[test]
    fn test_position_always_in_bounds() {
        // Point the car straight out of the field and keep driving
        let mut ctrl = init_ctrl(Pose {
            position_m: Vector2::new(1.0, 50.0),
            heading_rad: -FRAC_PI_2
        });

        for _ in 0..100 {
            let (state, _) = ctrl.proc(&InputData { dt_s: 0.1 }).unwrap();

            assert!(state.pose.position_m[0] >= 0.0);
            assert!(state.pose.position_m[0] <= 100.0);
            assert!(state.pose.position_m[1] >= 0.0);
            assert!(state.pose.position_m[1] <= 200.0);
        }
    }

    #[test]
    fn test_detection_is_monotonic() {
        let field = test_field();
        let mut ctrl = init_ctrl(Pose {
            position_m: field.target().position_m,
            heading_rad: 0.0
        });

        // Once detected the flag survives driving away from the target
        for _ in 0..50 {
            let (state, _) = ctrl.proc(&InputData { dt_s: 0.1 }).unwrap();
            assert!(state.target_detected);
        }

        assert!(ctrl.state().unwrap().target_detected);
    }

    #[test]
    fn test_boundary_pinned_heading_still_integrates() {
        // A car pinned against the near boundary keeps steering even though
        // its lateral position cannot move
        let mut ctrl = init_ctrl(Pose {
            position_m: Vector2::new(0.0, 50.0),
            heading_rad: -FRAC_PI_2
        });

        let mut prev_heading_rad = -FRAC_PI_2;
        for _ in 0..2 {
            let (state, report) = ctrl.proc(&InputData { dt_s: 0.1 }).unwrap();

            assert_eq!(state.pose.position_m[0], 0.0);
            assert!(report.boundary_clamped);
            assert!(state.pose.heading_rad > prev_heading_rad);

            prev_heading_rad = state.pose.heading_rad;
        }
    }

    #[test]
    fn test_invalid_timestep_rejected() {
        let mut ctrl = init_ctrl(Pose {
            position_m: Vector2::new(45.0, 0.0),
            heading_rad: 0.0
        });

        assert!(matches!(
            ctrl.proc(&InputData { dt_s: -0.1 }),
            Err(VehCtrlError::InvalidTimestep(_))
        ));
        assert!(matches!(
            ctrl.proc(&InputData { dt_s: f64::NAN }),
            Err(VehCtrlError::InvalidTimestep(_))
        ));
    }

    #[test]
    fn test_proc_before_init_rejected() {
        let mut ctrl = VehCtrl::default();

        assert!(matches!(
            ctrl.proc(&InputData { dt_s: 0.1 }),
            Err(VehCtrlError::NotInitialised)
        ));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut ctrl = VehCtrl::default();

        let result = ctrl.init(InitData {
            params: Params {
                speed_ms: 0.0,
                steer_k_p: 0.1
            },
            field: test_field(),
            init_pose: Pose {
                position_m: Vector2::new(45.0, 0.0),
                heading_rad: 0.0
            }
        });
        assert!(matches!(result, Err(VehCtrlError::InvalidSpeed(_))));

        let result = ctrl.init(InitData {
            params: Params {
                speed_ms: 6.0,
                steer_k_p: f64::INFINITY
            },
            field: test_field(),
            init_pose: Pose {
                position_m: Vector2::new(45.0, 0.0),
                heading_rad: 0.0
            }
        });
        assert!(matches!(result, Err(VehCtrlError::InvalidSteerGain(_))));
    }
}
