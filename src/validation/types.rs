use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogError, DrugCatalog};
use crate::models::{Alert, AlertSeverity, Drug, PatientProfile, PrescriptionItem};

// ---------------------------------------------------------------------------
// ValidationContext
// ---------------------------------------------------------------------------

/// Everything a layer needs, resolved once per call.
pub struct ValidationContext<'a> {
    pub drug: &'a Drug,
    pub patient: &'a PatientProfile,
    pub prescription: &'a PrescriptionItem,
    /// Current medications that resolved in the catalog, in profile order.
    pub current_medications: Vec<&'a Drug>,
    /// Prescribed dose converted to milligrams.
    pub dose_mg: f64,
}

// ---------------------------------------------------------------------------
// ValidationReport & AlertCounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertCounts {
    pub blocks: usize,
    pub warnings: usize,
}

impl AlertCounts {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let blocks = alerts.iter().filter(|a| a.is_block()).count();
        Self {
            blocks,
            warnings: alerts.len() - blocks,
        }
    }

    pub fn total(&self) -> usize {
        self.blocks + self.warnings
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub drug_id: String,
    /// Alerts in layer execution order.
    pub alerts: Vec<Alert>,
    pub counts: AlertCounts,
    pub processing_time_us: u64,
}

impl ValidationReport {
    /// True when at least one alert must prevent submission.
    pub fn is_blocked(&self) -> bool {
        self.counts.blocks > 0
    }

    pub fn is_clear(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| a.severity == AlertSeverity::Block)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Alert> {
        self.alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Warning)
    }
}

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// Input rejected before any layer ran. Clinical findings are never errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Frequency must be at least one hour, got {0}")]
    InvalidFrequency(u32),

    #[error("Patient weight must be positive, got {0}")]
    InvalidWeight(f64),

    #[error("Dose must be positive, got {0}")]
    InvalidDose(f64),

    #[error("Unknown drug: {0}")]
    UnknownDrug(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

// ---------------------------------------------------------------------------
// PrescriptionValidator trait
// ---------------------------------------------------------------------------

pub trait PrescriptionValidator {
    /// Run every layer and return the alerts in layer order. Unknown drug ids
    /// produce no alerts; inputs are assumed to satisfy the caller preconditions.
    fn validate(
        &self,
        patient: &PatientProfile,
        prescription: &PrescriptionItem,
        catalog: &dyn DrugCatalog,
    ) -> Vec<Alert>;

    /// Check preconditions and the unknown-drug policy, then validate.
    fn validate_checked(
        &self,
        patient: &PatientProfile,
        prescription: &PrescriptionItem,
        catalog: &dyn DrugCatalog,
    ) -> Result<ValidationReport, ValidationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertKind;

    #[test]
    fn counts_split_by_severity() {
        let alerts = vec![
            Alert::block(AlertKind::Allergy, "a"),
            Alert::warning(AlertKind::Subdose, "b"),
            Alert::block(AlertKind::Route, "c"),
        ];
        let counts = AlertCounts::from_alerts(&alerts);
        assert_eq!(counts.blocks, 2);
        assert_eq!(counts.warnings, 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn report_blocked_only_with_block_alert() {
        let alerts = vec![Alert::warning(AlertKind::TherapeuticDuplication, "dup")];
        let report = ValidationReport {
            drug_id: "MED_IBUP".into(),
            counts: AlertCounts::from_alerts(&alerts),
            alerts,
            processing_time_us: 0,
        };
        assert!(!report.is_blocked());
        assert!(!report.is_clear());
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.blocks().count(), 0);
    }
}
