//! # Render module
//!
//! Draws a completed simulation run as an animated GIF. Each frame shows
//! the static background (chart mesh, the crop line and the target marker)
//! with the animated overlay on top: the trajectory so far, the car
//! marker, its heading arrow and a detection annotation once the target
//! has been found.
//!
//! The simulation core never depends on this module, it only consumes the
//! trajectory history the driving loop produced.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
pub use params::Params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::path::Path;
use plotters::coord::Shift;
use plotters::prelude::*;

// Internal
use crate::field::Field;
use crate::traj_hist::{TrajHist, TrajRecord};
use util::maths::lin_map;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Margin around the chart in pixels
const MARGIN_PX: u32 = 10;

/// Size of the axis label areas in pixels
const LABEL_AREA_PX: u32 = 40;

/// Number of samples used to draw the crop line curve
const CROP_LINE_POINTS: usize = 100;

/// Half size of the car marker in pixels
const CAR_MARKER_PX: i32 = 5;

/// Colour of the target marker (brown)
const TARGET_COLOUR: RGBColor = RGBColor(139, 69, 19);

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Image dimensions and frame stride must be non-zero")]
    InvalidParams,

    #[error("There are no records to render")]
    EmptyHistory,

    #[error("Drawing failed: {0}")]
    DrawError(String)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Render the given history as an animated GIF at `out_path`.
///
/// One frame is produced for every `frame_step` history records, always
/// including the first record.
pub fn render_gif(
    params: &Params,
    field: &Field,
    hist: &TrajHist,
    out_path: &Path
) -> Result<(), RenderError> {

    // Validate the render parameters
    if params.width_px == 0 || params.height_px == 0 || params.frame_step == 0 {
        return Err(RenderError::InvalidParams)
    }
    if hist.is_empty() {
        return Err(RenderError::EmptyHistory)
    }

    let root = BitMapBackend::gif(
        out_path,
        (params.width_px, params.height_px),
        params.frame_delay_ms
    )
    .map_err(draw_err)?
    .into_drawing_area();

    let records = hist.records();

    for frame_end in (0..records.len()).step_by(params.frame_step) {
        draw_frame(params, field, records, frame_end, &root)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Draw a single animation frame showing the trajectory up to and
/// including the record at `frame_end`.
fn draw_frame(
    params: &Params,
    field: &Field,
    records: &[TrajRecord],
    frame_end: usize,
    root: &DrawingArea<BitMapBackend, Shift>
) -> Result<(), RenderError> {

    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(root)
        .caption("Autonomous Agro-Car Simulation", ("sans-serif", 20))
        .margin(MARGIN_PX)
        .x_label_area_size(LABEL_AREA_PX)
        .y_label_area_size(LABEL_AREA_PX)
        .build_cartesian_2d(0f64..field.width_m(), 0f64..field.height_m())
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc("Field Width (m)")
        .y_desc("Field Length (m)")
        .draw()
        .map_err(draw_err)?;

    // The ideal crop line
    let crop_line = (0..=CROP_LINE_POINTS).map(|i| {
        let y_m = field.height_m() * i as f64 / CROP_LINE_POINTS as f64;
        (field.crop_line_x(y_m), y_m)
    });
    chart
        .draw_series(LineSeries::new(crop_line, &GREEN))
        .map_err(draw_err)?;

    // The target marker, sized to the detection radius. Plotters circle
    // sizes are given in pixels so the radius is mapped from metres using
    // the width of the plotting area.
    let target = field.target();
    let plot_width_px = params
        .width_px
        .saturating_sub(2 * MARGIN_PX + LABEL_AREA_PX);
    let radius_px = lin_map(
        (0f64, field.width_m()),
        (0f64, plot_width_px as f64),
        target.radius_m
    ) as i32;
    chart
        .draw_series(std::iter::once(Circle::new(
            (target.position_m[0], target.position_m[1]),
            radius_px,
            TARGET_COLOUR.filled()
        )))
        .map_err(draw_err)?;

    // Trajectory up to the current record
    let shown = &records[..=frame_end];
    chart
        .draw_series(LineSeries::new(
            shown.iter().map(|r| (r.x_m, r.y_m)),
            &BLUE
        ))
        .map_err(draw_err)?;

    // The car marker
    let current = &records[frame_end];
    chart
        .draw_series(PointSeries::of_element(
            std::iter::once((current.x_m, current.y_m)),
            CAR_MARKER_PX,
            RED.filled(),
            &|coord, size, style| {
                EmptyElement::at(coord)
                    + Rectangle::new([(-size, -size), (size, size)], style)
            }
        ))
        .map_err(draw_err)?;

    // The heading arrow
    let arrow_tip = (
        current.x_m + params.arrow_len_m * current.heading_rad.sin(),
        current.y_m + params.arrow_len_m * current.heading_rad.cos()
    );
    chart
        .draw_series(LineSeries::new(
            vec![(current.x_m, current.y_m), arrow_tip],
            &RED
        ))
        .map_err(draw_err)?;

    // Detection annotation
    if current.target_detected {
        root.draw(&Text::new(
            "Target detected!",
            (
                (MARGIN_PX + LABEL_AREA_PX + 5) as i32,
                (MARGIN_PX + 25) as i32
            ),
            ("sans-serif", 18).into_font().color(&GREEN)
        ))
        .map_err(draw_err)?;
    }

    root.present().map_err(draw_err)
}

/// Collapse a backend error into a render error.
///
/// Plotters errors are generic over the backend so they are carried here as
/// strings.
fn draw_err<E: std::fmt::Display>(error: E) -> RenderError {
    RenderError::DrawError(error.to_string())
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::field::{self, CropLineParams, TargetParams};
    use crate::sim_loop;
    use crate::veh_ctrl;
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

    fn test_render_params() -> Params {
        Params {
            width_px: 320,
            height_px: 400,
            frame_delay_ms: 50,
            frame_step: 5,
            arrow_len_m: 5.0,
            file_name: String::from("test.gif")
        }
    }

    fn short_run(field: &Field) -> TrajHist {
        sim_loop::run(
            &sim_loop::Params {
                dt_s: 0.1,
                max_steps: 20,
                start_pos_m: Vector2::new(45.0, 0.0),
                start_heading_rad: 0.0
            },
            veh_ctrl::Params {
                speed_ms: 6.0,
                steer_k_p: 0.1
            },
            field
        )
        .unwrap()
    }

    #[test]
    fn test_render_smoke() {
        let field = test_field();
        let hist = short_run(&field);

        let out_path = std::env::temp_dir().join("agro_render_smoke.gif");
        render_gif(&test_render_params(), &field, &hist, &out_path).unwrap();

        assert!(out_path.exists());
    }

    #[test]
    fn test_empty_history_rejected() {
        let field = test_field();
        let hist = TrajHist::new();

        let out_path = std::env::temp_dir().join("agro_render_empty.gif");
        assert!(matches!(
            render_gif(&test_render_params(), &field, &hist, &out_path),
            Err(RenderError::EmptyHistory)
        ));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let field = test_field();
        let hist = short_run(&field);

        let params = Params {
            frame_step: 0,
            ..test_render_params()
        };

        let out_path = std::env::temp_dir().join("agro_render_invalid.gif");
        assert!(matches!(
            render_gif(&params, &field, &hist, &out_path),
            Err(RenderError::InvalidParams)
        ));
    }
}
