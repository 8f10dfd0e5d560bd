use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::enums::{AdministrationRoute, DoseMode};

/// A catalog entry.
///
/// `concentration_mg_per_ml` doubles as the liquid/solid marker: when present the
/// prescribed dose is read in mL, when absent it is already in mg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drug {
    pub id: String,
    pub name: String,
    pub active_ingredient: String,
    pub therapeutic_class: String,
    #[serde(default)]
    pub allergy_families: BTreeSet<String>,
    #[serde(default)]
    pub concentration_mg_per_ml: Option<f64>,
    #[serde(default)]
    pub min_age_months: u32,
    pub max_adult_daily_mg: f64,
    #[serde(default)]
    pub contraindications: BTreeSet<String>,
    pub allowed_routes: BTreeSet<AdministrationRoute>,
    #[serde(default)]
    pub pediatric_rule: Option<PediatricDoseRule>,
}

impl Drug {
    pub fn is_liquid(&self) -> bool {
        self.concentration_mg_per_ml.is_some()
    }
}

/// Weight-based dosing limits for patients under 12 years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PediatricDoseRule {
    pub mode: DoseMode,
    pub min_mg_per_kg: f64,
    pub max_mg_per_kg: f64,
    /// Hard cap on a single administration, independent of weight (PerDose only).
    #[serde(default)]
    pub absolute_ceiling_mg: Option<f64>,
}
