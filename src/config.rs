use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "ValidRx";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory (~/ValidRx/), falling back to the
/// working directory when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the SQLite knowledge base.
pub fn knowledge_base_path() -> PathBuf {
    app_data_dir().join("knowledge_base.db")
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "validrx=info"
}

/// What the checked validation entry point does with a drug id the catalog
/// does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownDrugPolicy {
    /// Nothing to check: return an empty alert list.
    #[default]
    Ignore,
    /// Fail with `ValidationError::UnknownDrug`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub unknown_drug_policy: UnknownDrugPolicy,
    /// Reject non-positive weight/dose and zero frequency before running the layers.
    pub enforce_preconditions: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            unknown_drug_policy: UnknownDrugPolicy::Ignore,
            enforce_preconditions: true,
        }
    }
}
