//! Drug catalog — drug definitions, pediatric dosing rules and interaction rules.
//!
//! The engine only ever reads through [`DrugCatalog`]. Writes go through the
//! concrete catalogs, which normalize ingredient names so that read-time
//! matching is a plain set operation.

pub mod memory;
pub mod seed;
pub mod shared;
pub mod store;

use std::collections::BTreeSet;

use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::enums::InteractionLevel;
use crate::models::{normalize_code, Drug, IngredientPair, InteractionRule, PediatricDoseRule};

pub use memory::InMemoryCatalog;
pub use seed::{default_knowledge_base, load_knowledge_base, KnowledgeBase};
pub use shared::SharedCatalog;
pub use store::SqliteCatalogStore;

// ---------------------------------------------------------------------------
// CatalogError
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Invalid drug {0}: {1}")]
    InvalidDrug(String, String),

    #[error("Interaction rule needs two distinct ingredients: {0}, {1}")]
    InvalidInteractionPair(String, String),

    #[error("Knowledge base load failed ({0}): {1}")]
    SeedLoad(String, String),

    #[error("Knowledge base parse failed ({0}): {1}")]
    SeedParse(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal lock failed")]
    LockFailed,
}

// ---------------------------------------------------------------------------
// DrugCatalog trait
// ---------------------------------------------------------------------------

/// Read access to the knowledge base during a validation call.
pub trait DrugCatalog {
    /// Look up a drug by id. `None` for unknown ids, including on an empty catalog.
    fn lookup(&self, drug_id: &str) -> Option<&Drug>;

    /// All stored interaction rules, in a stable order.
    fn interaction_rules(&self) -> &[InteractionRule];

    /// Every rule whose ingredient pair is contained in `ingredients`.
    fn match_interactions(&self, ingredients: &BTreeSet<String>) -> Vec<&InteractionRule> {
        self.interaction_rules()
            .iter()
            .filter(|rule| rule.pair.is_subset_of(ingredients))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Write-time normalization
// ---------------------------------------------------------------------------

/// Attach `rule` to `drug`, normalize its codes and check its invariants.
pub fn prepare_drug(
    mut drug: Drug,
    rule: Option<PediatricDoseRule>,
) -> Result<Drug, CatalogError> {
    drug.id = drug.id.trim().to_string();
    drug.active_ingredient = normalize_code(&drug.active_ingredient);
    drug.pediatric_rule = rule;

    let invalid = |reason: &str| CatalogError::InvalidDrug(drug.id.clone(), reason.to_string());

    if drug.id.is_empty() {
        return Err(invalid("id is empty"));
    }
    if drug.name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    if drug.active_ingredient.is_empty() {
        return Err(invalid("active ingredient is empty"));
    }
    if drug.allowed_routes.is_empty() {
        return Err(invalid("at least one administration route is required"));
    }
    if !(drug.max_adult_daily_mg.is_finite() && drug.max_adult_daily_mg > 0.0) {
        return Err(invalid("max adult daily dose must be positive"));
    }
    if let Some(concentration) = drug.concentration_mg_per_ml {
        if !(concentration.is_finite() && concentration > 0.0) {
            return Err(invalid("concentration must be positive"));
        }
    }
    if let Some(rule) = &drug.pediatric_rule {
        if !(rule.min_mg_per_kg.is_finite() && rule.max_mg_per_kg.is_finite()) {
            return Err(invalid("pediatric limits must be finite"));
        }
        if rule.min_mg_per_kg < 0.0 || rule.min_mg_per_kg > rule.max_mg_per_kg {
            return Err(invalid("pediatric limits require 0 <= min <= max"));
        }
        if let Some(ceiling) = rule.absolute_ceiling_mg {
            if !(ceiling.is_finite() && ceiling > 0.0) {
                return Err(invalid("absolute ceiling must be positive"));
            }
        }
    }

    Ok(drug)
}

/// Build an interaction rule from two ingredient names.
pub fn build_interaction_rule(
    ingredient_a: &str,
    ingredient_b: &str,
    level: InteractionLevel,
    message: &str,
) -> Result<InteractionRule, CatalogError> {
    let pair = IngredientPair::new(ingredient_a, ingredient_b).ok_or_else(|| {
        CatalogError::InvalidInteractionPair(ingredient_a.to_string(), ingredient_b.to_string())
    })?;
    Ok(InteractionRule {
        pair,
        level,
        message: message.to_string(),
    })
}
