use crate::models::enums::{AdministrationRoute, DoseMode};

use super::helpers::format_dose_mg;

/// Message template builder for alert text shown to the prescriber.
pub struct MessageTemplates;

impl MessageTemplates {
    pub fn epinephrine_intravenous() -> String {
        "Fatal route error: intravenous epinephrine is restricted to cardiac arrest. \
         Use the intramuscular route."
            .to_string()
    }

    pub fn minimum_age(age_months: u32, min_age_months: u32) -> String {
        format!(
            "Not approved for patient age ({age_months} months). Minimum age: {min_age_months} months."
        )
    }

    pub fn allergy(families: &[&str]) -> String {
        format!("Allergy: patient is allergic to {}.", families.join(", "))
    }

    pub fn contraindication(conditions: &[&str]) -> String {
        format!("Contraindication: incompatible with {}.", conditions.join(", "))
    }

    pub fn therapeutic_duplication(class: &str, existing: &[&str]) -> String {
        format!(
            "Therapeutic duplication: patient already takes a '{class}' drug ({}).",
            existing.join(", ")
        )
    }

    pub fn absolute_ceiling(value_mg: f64, ceiling_mg: f64) -> String {
        format!(
            "Absolute ceiling exceeded: {} per dose is above the {} limit.",
            format_dose_mg(value_mg),
            format_dose_mg(ceiling_mg)
        )
    }

    pub fn overdose(mode: DoseMode, value_mg: f64, max_mg: f64) -> String {
        format!(
            "Toxic overdose ({}): {}. Maximum safe: {}.",
            dose_label(mode),
            format_dose_mg(value_mg),
            format_dose_mg(max_mg)
        )
    }

    pub fn subdose(mode: DoseMode, value_mg: f64, min_mg: f64) -> String {
        format!(
            "Subdose ({}): {}. Minimum: {}.",
            dose_label(mode),
            format_dose_mg(value_mg),
            format_dose_mg(min_mg)
        )
    }

    pub fn adult_daily_max(total_mg: f64, max_mg: f64) -> String {
        format!(
            "Daily dose exceeded: {} per day is above the {} maximum.",
            format_dose_mg(total_mg),
            format_dose_mg(max_mg)
        )
    }

    pub fn route(drug_name: &str, route: AdministrationRoute, allowed: &[&str]) -> String {
        format!(
            "Route error: {drug_name} cannot be given by the {} route. Use: {}.",
            route.label(),
            allowed.join(", ")
        )
    }
}

fn dose_label(mode: DoseMode) -> &'static str {
    match mode {
        DoseMode::PerDose => "single dose",
        DoseMode::PerDay => "daily total",
    }
}
