//! Main simulation executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session and logger
//!     - Load all parameter files
//!     - Build the field model
//!     - Run the driving loop to produce the trajectory history
//!     - Save the history into the session (JSON and CSV archive)
//!     - Render the run as an animated GIF

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{debug, info};
use std::env;

// Internal
use agro_lib::{
    field::{self, Field},
    render, sim_loop, veh_ctrl
};
use util::{
    archive::Archiver,
    logger::{logger_init, LevelFilter},
    params,
    session::Session
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Default driving loop parameter file, can be overridden on the command
/// line to run an alternative scenario.
const DEFAULT_SIM_LOOP_PARAMS: &str = "sim_loop.toml";

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "agro_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Agro-Car Simulation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // A single optional argument selects an alternative driving loop
    // parameter file
    let sim_loop_params_file = match args.len() {
        1 => DEFAULT_SIM_LOOP_PARAMS,
        2 => args[1].as_str(),
        _ => return Err(eyre!(
            "Expected either zero or one argument, found {}", args.len() - 1)
        )
    };

    let field_params: field::Params = params::load(
        "field.toml"
    ).wrap_err("Could not load field params")?;

    let veh_ctrl_params: veh_ctrl::Params = params::load(
        "veh_ctrl.toml"
    ).wrap_err("Could not load vehicle control params")?;

    let sim_loop_params: sim_loop::Params = params::load(
        sim_loop_params_file
    ).wrap_err("Could not load driving loop params")?;

    let render_params: render::Params = params::load(
        "render.toml"
    ).wrap_err("Could not load render params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE FIELD ----

    let field = Field::new(field_params)
        .wrap_err("Failed to initialise the field")?;

    info!(
        "Field is {:.0} x {:.0} m, target at ({:.2}, {:.2}) m",
        field.width_m(),
        field.height_m(),
        field.target().position_m[0],
        field.target().position_m[1]
    );

    // ---- SIMULATION ----

    info!("Begining simulation\n");

    let hist = sim_loop::run(&sim_loop_params, veh_ctrl_params, &field)
        .wrap_err("Simulation failed")?;

    info!("Simulation complete after {} steps", hist.len());
    match hist.detection_step() {
        Some(s) => info!("    Target detected at step {}", s),
        None => info!("    Target was not detected")
    }
    if let Some(last) = hist.last() {
        info!(
            "    Final pose: ({:.2}, {:.2}) m, heading {:.3} rad\n",
            last.x_m, last.y_m, last.heading_rad
        );
    }

    // ---- SAVE ARTEFACTS ----

    // JSON copy via the session save thread
    session.save("traj_hist.json", hist.clone());

    // CSV archive of the per-step records
    let mut archiver = Archiver::from_path(&session, "traj_hist.csv")
        .wrap_err("Failed to create the trajectory archive")?;

    for record in hist.records() {
        archiver.serialise(record)
            .wrap_err("Failed to archive a trajectory record")?;
    }

    info!("Trajectory history saved");

    // ---- RENDER ----

    let gif_path = session.session_root.join(&render_params.file_name);

    info!("Rendering animation to {:?}", gif_path);

    render::render_gif(&render_params, &field, &hist, &gif_path)
        .wrap_err("Failed to render the animation")?;

    info!("Animation saved");

    // ---- SHUTDOWN ----

    session.exit();

    info!("End of execution");

    Ok(())
}
