use std::collections::BTreeSet;

use crate::catalog::DrugCatalog;
use crate::models::{Drug, PatientProfile};

/// Patients strictly younger than this are dosed with the pediatric rule.
pub const PEDIATRIC_AGE_LIMIT_MONTHS: u32 = 144;

/// Dose comparisons happen at this many decimal places.
pub const DOSE_DECIMALS: i32 = 4;

/// Condition code that lifts the intravenous epinephrine restriction.
pub const CARDIAC_ARREST: &str = "cardiacArrest";

const EPINEPHRINE_INGREDIENTS: [&str; 2] = ["epinephrine", "adrenaline"];

/// Round to [`DOSE_DECIMALS`] places so float noise cannot cross a limit.
pub fn round_dose(value: f64) -> f64 {
    let factor = 10f64.powi(DOSE_DECIMALS);
    (value * factor).round() / factor
}

pub fn is_pediatric(age_months: u32) -> bool {
    age_months < PEDIATRIC_AGE_LIMIT_MONTHS
}

pub fn is_epinephrine(drug: &Drug) -> bool {
    EPINEPHRINE_INGREDIENTS.contains(&drug.active_ingredient.as_str())
}

/// Liquid drugs are prescribed in mL, solid ones in mg.
pub fn dose_in_mg(drug: &Drug, dose_input: f64) -> f64 {
    match drug.concentration_mg_per_ml {
        Some(concentration) => dose_input * concentration,
        None => dose_input,
    }
}

/// Resolve the patient's current medications, skipping ids the catalog lacks.
pub fn resolve_current_medications<'a>(
    patient: &PatientProfile,
    catalog: &'a dyn DrugCatalog,
) -> Vec<&'a Drug> {
    patient
        .current_medications
        .iter()
        .filter_map(|id| {
            let drug = catalog.lookup(id);
            if drug.is_none() {
                tracing::debug!(drug_id = %id, "Current medication not in catalog, skipping");
            }
            drug
        })
        .collect()
}

/// Prescribed ingredient plus every current medication's ingredient.
pub fn active_ingredients(drug: &Drug, current: &[&Drug]) -> BTreeSet<String> {
    std::iter::once(drug)
        .chain(current.iter().copied())
        .map(|d| d.active_ingredient.clone())
        .collect()
}

/// Sorted intersection of two code sets.
pub fn shared_codes<'a>(a: &'a BTreeSet<String>, b: &'a BTreeSet<String>) -> Vec<&'a str> {
    a.intersection(b).map(String::as_str).collect()
}

pub fn format_dose_mg(value: f64) -> String {
    let rounded = round_dose(value);
    if rounded.fract() == 0.0 {
        format!("{rounded:.0} mg")
    } else {
        format!("{rounded} mg")
    }
}
