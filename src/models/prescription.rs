use serde::{Deserialize, Serialize};

use super::enums::AdministrationRoute;

/// How often a dose is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseFrequency {
    EveryHours(u32),
    /// One administration; divides the day as a 24-hour interval.
    SingleDose,
}

impl DoseFrequency {
    pub fn interval_hours(&self) -> u32 {
        match self {
            Self::EveryHours(hours) => *hours,
            Self::SingleDose => 24,
        }
    }

    /// Number of administrations in 24 hours. Callers must ensure the interval is non-zero.
    pub fn doses_per_day(&self) -> f64 {
        24.0 / f64::from(self.interval_hours())
    }
}

/// A single drug order as entered by the clinician.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionItem {
    pub drug_id: String,
    /// mL for liquid drugs, mg for solid ones.
    pub dose_input: f64,
    pub frequency: DoseFrequency,
    pub route: AdministrationRoute,
}
