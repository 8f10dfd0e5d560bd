use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config;
use crate::db::{self, DatabaseError};
use crate::models::enums::InteractionLevel;
use crate::models::{Drug, InteractionRule, PediatricDoseRule};

use super::seed::KnowledgeBase;
use super::{build_interaction_rule, prepare_drug, CatalogError, InMemoryCatalog};

/// SQLite-backed knowledge base store.
///
/// Every write runs in a single transaction; [`snapshot`](Self::snapshot) hands
/// the engine an immutable in-memory copy.
pub struct SqliteCatalogStore {
    conn: Mutex<Connection>,
}

impl SqliteCatalogStore {
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let conn = db::open_database(path)?;
        tracing::info!(path = %path.display(), "Knowledge base opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the store at the default location under the application data directory.
    pub fn open_default() -> Result<Self, CatalogError> {
        std::fs::create_dir_all(config::app_data_dir())?;
        Self::open(&config::knowledge_base_path())
    }

    pub fn open_in_memory() -> Result<Self, CatalogError> {
        Ok(Self {
            conn: Mutex::new(db::open_memory_database()?),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn.lock().map_err(|_| CatalogError::LockFailed)
    }

    pub fn get_drug(&self, drug_id: &str) -> Result<Option<Drug>, CatalogError> {
        let conn = self.lock()?;
        Ok(db::get_drug(&conn, drug_id)?)
    }

    /// Display name → drug id.
    pub fn list_drugs(&self) -> Result<BTreeMap<String, String>, CatalogError> {
        let conn = self.lock()?;
        Ok(db::list_drug_names(&conn)?.into_iter().collect())
    }

    pub fn get_interaction_rules(&self) -> Result<Vec<InteractionRule>, CatalogError> {
        let conn = self.lock()?;
        Ok(db::get_interaction_rules(&conn)?)
    }

    /// Insert or replace a drug. `rule = None` removes any stored pediatric rule.
    pub fn upsert_drug(
        &self,
        drug: Drug,
        rule: Option<PediatricDoseRule>,
    ) -> Result<(), CatalogError> {
        let drug = prepare_drug(drug, rule)?;
        let mut conn = self.lock()?;
        write_drug(&mut conn, &drug)?;
        tracing::info!(drug_id = %drug.id, "Drug upserted");
        Ok(())
    }

    pub fn add_interaction_rule(
        &self,
        ingredient_a: &str,
        ingredient_b: &str,
        level: InteractionLevel,
        message: &str,
    ) -> Result<(), CatalogError> {
        let rule = build_interaction_rule(ingredient_a, ingredient_b, level, message)?;
        let conn = self.lock()?;
        db::insert_interaction_rule(&conn, &rule)?;
        tracing::info!(
            first = rule.pair.first(),
            second = rule.pair.second(),
            level = rule.level.as_str(),
            "Interaction rule added"
        );
        Ok(())
    }

    /// Populate an empty store from `kb`. Returns false (and writes nothing) if
    /// the store already holds drugs.
    pub fn seed(&self, kb: KnowledgeBase) -> Result<bool, CatalogError> {
        let drugs = kb
            .drugs
            .into_iter()
            .map(|d| {
                let rule = d.pediatric_rule.clone();
                prepare_drug(d, rule)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut conn = self.lock()?;
        if db::count_drugs(&conn)? > 0 {
            tracing::debug!("Knowledge base already populated, skipping seed");
            return Ok(false);
        }

        let tx = conn.transaction().map_err(DatabaseError::from)?;
        for drug in &drugs {
            db::upsert_drug(&tx, drug)?;
            if let Some(rule) = &drug.pediatric_rule {
                db::upsert_pediatric_rule(&tx, &drug.id, rule)?;
            }
        }
        for rule in &kb.interactions {
            db::insert_interaction_rule(&tx, rule)?;
        }
        tx.commit().map_err(DatabaseError::from)?;

        tracing::info!(
            drugs = drugs.len(),
            interactions = kb.interactions.len(),
            "Knowledge base seeded"
        );
        Ok(true)
    }

    /// Seed with the bundled default knowledge base.
    pub fn seed_defaults(&self) -> Result<bool, CatalogError> {
        self.seed(super::default_knowledge_base()?)
    }

    /// Consistent in-memory copy of the whole knowledge base.
    pub fn snapshot(&self) -> Result<InMemoryCatalog, CatalogError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(DatabaseError::from)?;
        let drugs = db::get_all_drugs(&tx)?;
        let rules = db::get_interaction_rules(&tx)?;
        tx.commit().map_err(DatabaseError::from)?;
        Ok(InMemoryCatalog::from_parts(drugs, rules))
    }
}

fn write_drug(conn: &mut Connection, drug: &Drug) -> Result<(), DatabaseError> {
    let tx = conn.transaction()?;
    db::upsert_drug(&tx, drug)?;
    match &drug.pediatric_rule {
        Some(rule) => db::upsert_pediatric_rule(&tx, &drug.id, rule)?,
        None => db::delete_pediatric_rule(&tx, &drug.id)?,
    }
    tx.commit()?;
    Ok(())
}
