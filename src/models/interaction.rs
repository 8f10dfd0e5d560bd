use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::enums::InteractionLevel;
use super::normalize_code;

/// Unordered pair of active-ingredient names.
///
/// Stored in canonical (lexicographic) order so equality and hashing ignore
/// the order the ingredients were given in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "[String; 2]", into = "[String; 2]")]
pub struct IngredientPair {
    first: String,
    second: String,
}

impl IngredientPair {
    /// Build a pair from two ingredient names. Returns `None` when either name is
    /// blank or both normalize to the same ingredient.
    pub fn new(a: &str, b: &str) -> Option<Self> {
        let a = normalize_code(a);
        let b = normalize_code(b);
        if a.is_empty() || b.is_empty() || a == b {
            return None;
        }
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Some(Self { first, second })
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn contains(&self, ingredient: &str) -> bool {
        self.first == ingredient || self.second == ingredient
    }

    /// True when both ingredients are present in `ingredients`.
    pub fn is_subset_of(&self, ingredients: &BTreeSet<String>) -> bool {
        ingredients.contains(&self.first) && ingredients.contains(&self.second)
    }
}

impl TryFrom<[String; 2]> for IngredientPair {
    type Error = String;

    fn try_from(value: [String; 2]) -> Result<Self, Self::Error> {
        let [a, b] = value;
        Self::new(&a, &b)
            .ok_or_else(|| format!("interaction pair needs two distinct ingredients: {a}, {b}"))
    }
}

impl From<IngredientPair> for [String; 2] {
    fn from(pair: IngredientPair) -> Self {
        [pair.first, pair.second]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRule {
    pub pair: IngredientPair,
    pub level: InteractionLevel,
    pub message: String,
}
