use std::time::Instant;

use crate::catalog::DrugCatalog;
use crate::config::{EngineOptions, UnknownDrugPolicy};
use crate::models::{Alert, DoseFrequency, Drug, PatientProfile, PrescriptionItem};

use super::helpers::{dose_in_mg, resolve_current_medications};
use super::layers::{
    check_allergies, check_contraindications, check_dosage, check_epinephrine_route,
    check_interactions, check_minimum_age, check_route, check_therapeutic_duplication,
};
use super::types::{
    AlertCounts, PrescriptionValidator, ValidationContext, ValidationError, ValidationReport,
};

/// Default implementation of the validation engine.
/// Stateless: the catalog is passed in on every call.
#[derive(Debug, Clone, Default)]
pub struct DefaultValidationEngine {
    options: EngineOptions,
}

impl DefaultValidationEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Validate and wrap the alerts with counts and timing.
    pub fn validate_report(
        &self,
        patient: &PatientProfile,
        prescription: &PrescriptionItem,
        catalog: &dyn DrugCatalog,
    ) -> ValidationReport {
        let start = Instant::now();

        let alerts = match catalog.lookup(&prescription.drug_id) {
            Some(drug) => run_layers(drug, patient, prescription, catalog),
            None => {
                tracing::debug!(
                    drug_id = %prescription.drug_id,
                    "Prescribed drug not in catalog, nothing to check"
                );
                Vec::new()
            }
        };

        let counts = AlertCounts::from_alerts(&alerts);
        let processing_time_us = start.elapsed().as_micros() as u64;

        tracing::info!(
            drug_id = %prescription.drug_id,
            blocks = counts.blocks,
            warnings = counts.warnings,
            processing_us = processing_time_us,
            "Prescription validation complete"
        );

        ValidationReport {
            drug_id: prescription.drug_id.clone(),
            alerts,
            counts,
            processing_time_us,
        }
    }
}

impl PrescriptionValidator for DefaultValidationEngine {
    fn validate(
        &self,
        patient: &PatientProfile,
        prescription: &PrescriptionItem,
        catalog: &dyn DrugCatalog,
    ) -> Vec<Alert> {
        self.validate_report(patient, prescription, catalog).alerts
    }

    fn validate_checked(
        &self,
        patient: &PatientProfile,
        prescription: &PrescriptionItem,
        catalog: &dyn DrugCatalog,
    ) -> Result<ValidationReport, ValidationError> {
        if self.options.enforce_preconditions {
            if let Err(e) = check_preconditions(patient, prescription) {
                tracing::warn!(drug_id = %prescription.drug_id, error = %e, "Prescription rejected");
                return Err(e);
            }
        }

        if self.options.unknown_drug_policy == UnknownDrugPolicy::Reject
            && catalog.lookup(&prescription.drug_id).is_none()
        {
            return Err(ValidationError::UnknownDrug(prescription.drug_id.clone()));
        }

        Ok(self.validate_report(patient, prescription, catalog))
    }
}

/// Validate with default options.
pub fn validate(
    patient: &PatientProfile,
    prescription: &PrescriptionItem,
    catalog: &dyn DrugCatalog,
) -> Vec<Alert> {
    DefaultValidationEngine::default().validate(patient, prescription, catalog)
}

/// Inputs the layers assume: positive weight and dose, frequency of at least one hour.
pub fn check_preconditions(
    patient: &PatientProfile,
    prescription: &PrescriptionItem,
) -> Result<(), ValidationError> {
    if !(patient.weight_kg.is_finite() && patient.weight_kg > 0.0) {
        return Err(ValidationError::InvalidWeight(patient.weight_kg));
    }
    if !(prescription.dose_input.is_finite() && prescription.dose_input > 0.0) {
        return Err(ValidationError::InvalidDose(prescription.dose_input));
    }
    if let DoseFrequency::EveryHours(0) = prescription.frequency {
        return Err(ValidationError::InvalidFrequency(0));
    }
    Ok(())
}

/// Run all layers in order. No layer short-circuits another.
fn run_layers(
    drug: &Drug,
    patient: &PatientProfile,
    prescription: &PrescriptionItem,
    catalog: &dyn DrugCatalog,
) -> Vec<Alert> {
    let ctx = ValidationContext {
        drug,
        patient,
        prescription,
        current_medications: resolve_current_medications(patient, catalog),
        dose_mg: dose_in_mg(drug, prescription.dose_input),
    };

    let mut alerts = Vec::new();
    alerts.extend(check_epinephrine_route(&ctx));
    alerts.extend(check_minimum_age(&ctx));
    alerts.extend(check_allergies(&ctx));
    alerts.extend(check_contraindications(&ctx));
    alerts.extend(check_therapeutic_duplication(&ctx));
    alerts.extend(check_interactions(&ctx, catalog));
    alerts.extend(check_dosage(&ctx));
    alerts.extend(check_route(&ctx));
    alerts
}
