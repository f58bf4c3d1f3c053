//! # Vehicle control module
//!
//! Vehicle control is responsible for keeping the agro-car on the crop
//! line. A single proportional controller acts on the lateral error, the
//! distance between the car and the crop line at the car's current
//! longitudinal coordinate. The heading is adjusted by the gain times the
//! error, then the pose is advanced with a single-integrator kinematic
//! model. There is no integral or derivative term and no heading-rate
//! limit, which is an intentional simplification of the model.
//!
//! After integration the position is hard clipped to the field boundary
//! while the heading keeps integrating, so a car pinned at a boundary can
//! still steer on the spot without moving. This is a known approximation
//! of the simple kinematic model and is preserved deliberately.
//!
//! Each cycle ends with a proximity check against the field's point
//! target. Detection latches on the state and is raised once in the status
//! report; the module itself performs no I/O.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::Params;
pub use state::*;
