use std::sync::{Arc, RwLock};

use crate::models::enums::InteractionLevel;
use crate::models::{Drug, PediatricDoseRule};

use super::{CatalogError, InMemoryCatalog};

/// Copy-on-write handle over an [`InMemoryCatalog`].
///
/// Readers take an `Arc` snapshot and validate against it without holding the
/// lock. Writers clone the current catalog, apply the change and swap it in, so
/// a snapshot never observes a half-written drug.
#[derive(Debug, Default)]
pub struct SharedCatalog {
    current: RwLock<Arc<InMemoryCatalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: InMemoryCatalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn snapshot(&self) -> Result<Arc<InMemoryCatalog>, CatalogError> {
        let current = self.current.read().map_err(|_| CatalogError::LockFailed)?;
        Ok(Arc::clone(&current))
    }

    pub fn upsert_drug(
        &self,
        drug: Drug,
        rule: Option<PediatricDoseRule>,
    ) -> Result<(), CatalogError> {
        let drug_id = drug.id.clone();
        self.update(|catalog| catalog.upsert_drug(drug, rule))?;
        tracing::info!(drug_id = %drug_id, "Drug upserted into shared catalog");
        Ok(())
    }

    pub fn add_interaction_rule(
        &self,
        ingredient_a: &str,
        ingredient_b: &str,
        level: InteractionLevel,
        message: &str,
    ) -> Result<(), CatalogError> {
        self.update(|catalog| catalog.add_interaction_rule(ingredient_a, ingredient_b, level, message))
    }

    /// Replace the whole catalog, e.g. after reloading from the store.
    pub fn replace(&self, catalog: InMemoryCatalog) -> Result<(), CatalogError> {
        let mut current = self.current.write().map_err(|_| CatalogError::LockFailed)?;
        *current = Arc::new(catalog);
        Ok(())
    }

    fn update<F>(&self, apply: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut InMemoryCatalog) -> Result<(), CatalogError>,
    {
        let mut current = self.current.write().map_err(|_| CatalogError::LockFailed)?;
        let mut next = InMemoryCatalog::clone(&current);
        apply(&mut next)?;
        *current = Arc::new(next);
        Ok(())
    }
}
