//! # Simulation driving loop
//!
//! The driving loop owns the vehicle controller for the duration of a run:
//! it creates the controller from the given parameters, advances it one
//! fixed time increment at a time and appends a history record after every
//! step. The loop terminates when the step budget is exhausted or the car
//! reaches the far field boundary, whichever happens first. Its sole
//! output is the trajectory history.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
pub use params::Params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};

// Internal
use crate::field::Field;
use crate::traj_hist::{TrajHist, TrajRecord};
use crate::veh_ctrl::{self, InitData, InputData, Pose, VehCtrl, VehCtrlError};
use util::module::State;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur while running the loop.
#[derive(Debug, thiserror::Error)]
pub enum SimLoopError {
    #[error("Step duration must be positive and finite, got {0} s")]
    InvalidTimestep(f64),

    #[error("The step budget must be at least one step")]
    ZeroStepBudget,

    #[error("Vehicle control error: {0}")]
    VehCtrlError(#[from] VehCtrlError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Run a full simulation and return the recorded trajectory.
///
/// The run is deterministic: the same parameters and field always produce
/// the same history.
pub fn run(
    params: &Params,
    veh_ctrl_params: veh_ctrl::Params,
    field: &Field
) -> Result<TrajHist, SimLoopError> {

    // Validate the loop parameters
    if !params.dt_s.is_finite() || params.dt_s <= 0f64 {
        return Err(SimLoopError::InvalidTimestep(params.dt_s))
    }
    if params.max_steps == 0 {
        return Err(SimLoopError::ZeroStepBudget)
    }

    // The loop owns the vehicle controller for the duration of the run
    let mut veh_ctrl = VehCtrl::default();
    veh_ctrl.init(InitData {
        params: veh_ctrl_params,
        field: field.clone(),
        init_pose: Pose {
            position_m: params.start_pos_m,
            heading_rad: params.start_heading_rad
        }
    })?;

    let input = InputData { dt_s: params.dt_s };
    let mut hist = TrajHist::new();

    for step in 0..params.max_steps {
        let (state, report) = veh_ctrl.proc(&input)?;

        // One-time detection notification
        if report.target_found {
            info!(
                "Target detected near ({:.1}, {:.1}) m",
                state.pose.position_m[0],
                state.pose.position_m[1]
            );
        }

        hist.append(TrajRecord {
            step,
            time_s: params.dt_s * (step + 1) as f64,
            x_m: state.pose.position_m[0],
            y_m: state.pose.position_m[1],
            heading_rad: state.pose.heading_rad,
            lat_error_m: report.lat_error_m,
            target_detected: state.target_detected
        });

        // Stop early once the car reaches the far boundary of the field
        if state.pose.position_m[1] >= field.height_m() {
            debug!("Field boundary reached after {} steps", step + 1);
            break;
        }
    }

    Ok(hist)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::field::{self, CropLineParams, TargetParams};
    use nalgebra::Vector2;

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

    fn test_veh_params() -> veh_ctrl::Params {
        veh_ctrl::Params {
            speed_ms: 6.0,
            steer_k_p: 0.1
        }
    }

    fn test_params() -> Params {
        Params {
            dt_s: 0.1,
            max_steps: 400,
            start_pos_m: Vector2::new(45.0, 0.0),
            start_heading_rad: 0.0
        }
    }

    #[test]
    fn test_reference_run() {
        let field = test_field();
        let hist = run(&test_params(), test_veh_params(), &field).unwrap();

        assert!(!hist.is_empty());
        assert!(hist.len() <= 400);

        // y never decreases while the heading points up the field
        for pair in hist.records().windows(2) {
            if pair[1].heading_rad.cos() > 0f64 {
                assert!(pair[1].y_m >= pair[0].y_m);
            }
        }

        // Terminated either on the boundary or on the step budget, and the
        // last record shows which
        let last = hist.last().unwrap();
        assert!(last.y_m >= field.height_m() || hist.len() == 400);
    }

    #[test]
    fn test_on_line_start_error_stays_bounded() {
        let field = test_field();

        // Start exactly on the crop line with no heading error
        let params = Params {
            start_pos_m: Vector2::new(field.crop_line_x(0.0), 0.0),
            ..test_params()
        };

        let hist = run(&params, test_veh_params(), &field).unwrap();

        // The controller may oscillate about the line but must not diverge
        for record in hist.records() {
            assert!(record.lat_error_m.abs() < 20.0);
        }
    }

    #[test]
    fn test_passing_through_target_detects() {
        let field = test_field();

        // Start on the target itself, the first post-update position is
        // still well within the detection radius
        let params = Params {
            max_steps: 10,
            start_pos_m: field.target().position_m,
            ..test_params()
        };

        let hist = run(&params, test_veh_params(), &field).unwrap();

        assert!(hist.records()[0].target_detected);
        assert_eq!(hist.detection_step(), Some(0));

        // Detection never clears for the rest of the run
        assert!(hist.records().iter().all(|r| r.target_detected));
    }

    #[test]
    fn test_history_len_matches_budget() {
        let field = test_field();

        // A short budget ends the run before the boundary is reached
        let params = Params {
            max_steps: 50,
            ..test_params()
        };

        let hist = run(&params, test_veh_params(), &field).unwrap();

        assert_eq!(hist.len(), 50);
        assert!(hist.last().unwrap().y_m < field.height_m());
    }

    #[test]
    fn test_boundary_exit_ends_run() {
        let field = test_field();
        let hist = run(&test_params(), test_veh_params(), &field).unwrap();

        // At 6 m/s and 0.1 s steps the 200 m field is crossed well inside
        // the 400 step budget
        assert!(hist.len() < 400);
        assert!(hist.last().unwrap().y_m >= field.height_m());

        // Only the final record may sit on the boundary
        for record in &hist.records()[..hist.len() - 1] {
            assert!(record.y_m < field.height_m());
        }
    }

    #[test]
    fn test_invalid_params_rejected() {
        let field = test_field();

        let params = Params {
            dt_s: 0.0,
            ..test_params()
        };
        assert!(matches!(
            run(&params, test_veh_params(), &field),
            Err(SimLoopError::InvalidTimestep(_))
        ));

        let params = Params {
            max_steps: 0,
            ..test_params()
        };
        assert!(matches!(
            run(&params, test_veh_params(), &field),
            Err(SimLoopError::ZeroStepBudget)
        ));
    }
}
