//! ValidRx: prescription safety validation.
//!
//! A clinician's drug order is checked against a knowledge base of drugs,
//! pediatric dosing rules and interaction rules. The result is an ordered list
//! of Block/Warning alerts; deciding whether to stop submission is left to the
//! caller.

pub mod catalog;
pub mod config;
pub mod db;
pub mod models;
pub mod validation;

pub use catalog::{DrugCatalog, InMemoryCatalog, SharedCatalog, SqliteCatalogStore};
pub use models::{Alert, AlertKind, AlertSeverity, PatientProfile, PrescriptionItem};
pub use validation::{validate, DefaultValidationEngine, PrescriptionValidator, ValidationReport};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();

    tracing::debug!("{} v{} tracing initialized", config::APP_NAME, config::APP_VERSION);
}
