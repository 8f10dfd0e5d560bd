//! Prescription validation engine.
//!
//! Runs every safety layer, in a fixed order, over one prescription and
//! returns the alerts they raise. Layers never suppress each other.

pub mod engine;
pub mod helpers;
pub mod layers;
pub mod messages;
pub mod types;

pub use engine::{validate, DefaultValidationEngine};
pub use types::{
    AlertCounts, PrescriptionValidator, ValidationContext, ValidationError, ValidationReport,
};
