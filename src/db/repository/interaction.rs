use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::enums::InteractionLevel;
use crate::models::{IngredientPair, InteractionRule};

/// Append an interaction rule. The pair is stored in canonical order.
pub fn insert_interaction_rule(
    conn: &Connection,
    rule: &InteractionRule,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO interaction_rules (ingredient_a, ingredient_b, level, message)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            rule.pair.first(),
            rule.pair.second(),
            rule.level.as_str(),
            rule.message,
        ],
    )?;
    Ok(())
}

/// All interaction rules in insertion order.
pub fn get_interaction_rules(conn: &Connection) -> Result<Vec<InteractionRule>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT ingredient_a, ingredient_b, level, message
         FROM interaction_rules ORDER BY id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut rules = Vec::new();
    for row in rows {
        let (a, b, level, message) = row?;
        let pair = IngredientPair::new(&a, &b).ok_or_else(|| {
            DatabaseError::ConstraintViolation(format!("invalid interaction pair: {a}, {b}"))
        })?;
        rules.push(InteractionRule {
            pair,
            level: InteractionLevel::from_str(&level)?,
            message,
        });
    }
    Ok(rules)
}
