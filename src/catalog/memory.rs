use std::collections::{BTreeMap, HashMap};

use crate::models::enums::InteractionLevel;
use crate::models::{Drug, InteractionRule, PediatricDoseRule};

use super::seed::KnowledgeBase;
use super::{build_interaction_rule, prepare_drug, CatalogError, DrugCatalog};

/// Immutable-by-default catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    drugs: HashMap<String, Drug>,
    rules: Vec<InteractionRule>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a parsed knowledge base, validating every record.
    pub fn from_knowledge_base(kb: KnowledgeBase) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for drug in kb.drugs {
            let rule = drug.pediatric_rule.clone();
            catalog.upsert_drug(drug, rule)?;
        }
        for rule in kb.interactions {
            catalog.rules.push(rule);
        }
        Ok(catalog)
    }

    /// Insert or replace a drug together with its pediatric rule.
    pub fn upsert_drug(
        &mut self,
        drug: Drug,
        rule: Option<PediatricDoseRule>,
    ) -> Result<(), CatalogError> {
        let drug = prepare_drug(drug, rule)?;
        self.drugs.insert(drug.id.clone(), drug);
        Ok(())
    }

    pub fn add_interaction_rule(
        &mut self,
        ingredient_a: &str,
        ingredient_b: &str,
        level: InteractionLevel,
        message: &str,
    ) -> Result<(), CatalogError> {
        let rule = build_interaction_rule(ingredient_a, ingredient_b, level, message)?;
        self.rules.push(rule);
        Ok(())
    }

    /// Display name → drug id.
    pub fn list_drugs(&self) -> BTreeMap<String, String> {
        self.drugs
            .values()
            .map(|d| (d.name.clone(), d.id.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    /// Assemble from records that were already validated on write (e.g. loaded from the store).
    pub(crate) fn from_parts(drugs: Vec<Drug>, rules: Vec<InteractionRule>) -> Self {
        Self {
            drugs: drugs.into_iter().map(|d| (d.id.clone(), d)).collect(),
            rules,
        }
    }
}

impl DrugCatalog for InMemoryCatalog {
    fn lookup(&self, drug_id: &str) -> Option<&Drug> {
        self.drugs.get(drug_id)
    }

    fn interaction_rules(&self) -> &[InteractionRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::catalog::fixtures::*;

    fn ingredients(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_catalog_lookup_is_none() {
        let catalog = InMemoryCatalog::new();
        assert!(catalog.lookup("MED_AMOX").is_none());
        assert!(catalog.interaction_rules().is_empty());
    }

    #[test]
    fn upsert_then_lookup() {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .upsert_drug(liquid_drug("MED_IBUP", "Ibuprofen", "nsaid"), None)
            .unwrap();
        let drug = catalog.lookup("MED_IBUP").unwrap();
        assert_eq!(drug.active_ingredient, "ibuprofen");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn upsert_replaces_rule() {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .upsert_drug(
                liquid_drug("MED_IBUP", "ibuprofen", "nsaid"),
                Some(per_dose_rule(5.0, 10.0, None)),
            )
            .unwrap();
        catalog
            .upsert_drug(liquid_drug("MED_IBUP", "ibuprofen", "nsaid"), None)
            .unwrap();
        assert!(catalog.lookup("MED_IBUP").unwrap().pediatric_rule.is_none());
    }

    #[test]
    fn match_is_order_independent() {
        let mut forward = InMemoryCatalog::new();
        forward
            .add_interaction_rule("warfarin", "ibuprofen", InteractionLevel::High, "bleeding")
            .unwrap();
        let mut reverse = InMemoryCatalog::new();
        reverse
            .add_interaction_rule("Ibuprofen", "WARFARIN", InteractionLevel::High, "bleeding")
            .unwrap();

        let set = ingredients(&["ibuprofen", "warfarin"]);
        assert_eq!(forward.match_interactions(&set).len(), 1);
        assert_eq!(reverse.match_interactions(&set).len(), 1);
        assert_eq!(forward.interaction_rules(), reverse.interaction_rules());
    }

    #[test]
    fn match_returns_every_rule_in_subset() {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .add_interaction_rule("warfarin", "ibuprofen", InteractionLevel::High, "bleeding")
            .unwrap();
        catalog
            .add_interaction_rule("ibuprofen", "diclofenac", InteractionLevel::Medium, "renal")
            .unwrap();
        catalog
            .add_interaction_rule("warfarin", "amoxicillin", InteractionLevel::Medium, "inr")
            .unwrap();

        let matched = catalog.match_interactions(&ingredients(&["ibuprofen", "warfarin", "diclofenac"]));
        let messages: Vec<&str> = matched.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["bleeding", "renal"]);

        assert!(catalog.match_interactions(&ingredients(&["ibuprofen"])).is_empty());
    }

    #[test]
    fn list_drugs_maps_name_to_id() {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .upsert_drug(liquid_drug("MED_IBUP", "ibuprofen", "nsaid"), None)
            .unwrap();
        let names = catalog.list_drugs();
        assert_eq!(names.get("ibuprofen drops 50mg/mL").map(String::as_str), Some("MED_IBUP"));
    }
}
