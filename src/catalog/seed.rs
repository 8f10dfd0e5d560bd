use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{Drug, InteractionRule};

use super::CatalogError;

const BUNDLED_KNOWLEDGE_BASE: &str = include_str!("../../resources/knowledge_base.json");

/// Serialized knowledge base: drugs (each with its optional pediatric rule) and
/// interaction rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub drugs: Vec<Drug>,
    #[serde(default)]
    pub interactions: Vec<InteractionRule>,
}

/// The knowledge base bundled with the crate.
pub fn default_knowledge_base() -> Result<KnowledgeBase, CatalogError> {
    serde_json::from_str(BUNDLED_KNOWLEDGE_BASE)
        .map_err(|e| CatalogError::SeedParse("knowledge_base.json".into(), e.to_string()))
}

/// Load a knowledge base from a JSON file on disk.
pub fn load_knowledge_base(path: &Path) -> Result<KnowledgeBase, CatalogError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| CatalogError::SeedLoad(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&json)
        .map_err(|e| CatalogError::SeedParse(path.display().to_string(), e.to_string()))
}
