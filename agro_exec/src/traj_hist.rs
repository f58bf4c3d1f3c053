//! # Trajectory history
//!
//! Append-only record of the car's state over a simulation run, used for
//! post-run export and rendering. Records are flat so the same type can be
//! saved as JSON and archived as CSV rows.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single per-step snapshot of the simulation.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct TrajRecord {
    /// Index of the step this record was taken after
    pub step: usize,

    /// Simulated time at the end of the step
    ///
    /// Units: seconds
    pub time_s: f64,

    /// Lateral position of the car
    ///
    /// Units: metres
    pub x_m: f64,

    /// Longitudinal position of the car
    ///
    /// Units: metres
    pub y_m: f64,

    /// Heading from the longitudinal axis
    ///
    /// Units: radians
    pub heading_rad: f64,

    /// Lateral tracking error used for the steering update on this step
    ///
    /// Units: metres
    pub lat_error_m: f64,

    /// True if the target has been detected by the end of this step
    pub target_detected: bool
}

/// The ordered sequence of snapshots from a run.
///
/// Records can only be appended, never modified or removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrajHist {
    records: Vec<TrajRecord>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajHist {
    /// Create a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new record to the history
    pub fn append(&mut self, record: TrajRecord) {
        self.records.push(record);
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The last recorded snapshot, if any
    pub fn last(&self) -> Option<&TrajRecord> {
        self.records.last()
    }

    /// All records in step order
    pub fn records(&self) -> &[TrajRecord] {
        &self.records
    }

    /// Step index at which the target was first detected, if it was
    pub fn detection_step(&self) -> Option<usize> {
        self.records
            .iter()
            .find(|r| r.target_detected)
            .map(|r| r.step)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
