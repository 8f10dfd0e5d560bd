use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Patient data supplied with each validation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub weight_kg: f64,
    pub age_months: u32,
    #[serde(default)]
    pub conditions: BTreeSet<String>,
    #[serde(default)]
    pub allergies: BTreeSet<String>,
    /// Drug ids already in use, in the order they were recorded.
    #[serde(default)]
    pub current_medications: Vec<String>,
}
