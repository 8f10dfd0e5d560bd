use std::collections::BTreeSet;
use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::enums::{AdministrationRoute, DoseMode};
use crate::models::{Drug, PediatricDoseRule};

const DRUG_COLUMNS: &str = "d.id, d.name, d.active_ingredient, d.therapeutic_class,
     d.allergy_families, d.concentration_mg_per_ml, d.min_age_months, d.max_adult_daily_mg,
     d.contraindications, d.allowed_routes,
     p.mode, p.min_mg_per_kg, p.max_mg_per_kg, p.absolute_ceiling_mg";

/// Raw column values as read from `drugs LEFT JOIN pediatric_rules`.
struct DrugRow {
    id: String,
    name: String,
    active_ingredient: String,
    therapeutic_class: String,
    allergy_families: String,
    concentration_mg_per_ml: Option<f64>,
    min_age_months: i64,
    max_adult_daily_mg: f64,
    contraindications: String,
    allowed_routes: String,
    rule_mode: Option<String>,
    rule_min: Option<f64>,
    rule_max: Option<f64>,
    rule_ceiling: Option<f64>,
}

fn drug_row_from_rusqlite(row: &Row<'_>) -> rusqlite::Result<DrugRow> {
    Ok(DrugRow {
        id: row.get(0)?,
        name: row.get(1)?,
        active_ingredient: row.get(2)?,
        therapeutic_class: row.get(3)?,
        allergy_families: row.get(4)?,
        concentration_mg_per_ml: row.get(5)?,
        min_age_months: row.get(6)?,
        max_adult_daily_mg: row.get(7)?,
        contraindications: row.get(8)?,
        allowed_routes: row.get(9)?,
        rule_mode: row.get(10)?,
        rule_min: row.get(11)?,
        rule_max: row.get(12)?,
        rule_ceiling: row.get(13)?,
    })
}

fn drug_from_row(row: DrugRow) -> Result<Drug, DatabaseError> {
    let pediatric_rule = match (row.rule_mode, row.rule_min, row.rule_max) {
        (Some(mode), Some(min), Some(max)) => Some(PediatricDoseRule {
            mode: DoseMode::from_str(&mode)?,
            min_mg_per_kg: min,
            max_mg_per_kg: max,
            absolute_ceiling_mg: row.rule_ceiling,
        }),
        _ => None,
    };

    let routes: Vec<String> = serde_json::from_str(&row.allowed_routes)?;
    let allowed_routes = routes
        .iter()
        .map(|r| AdministrationRoute::from_str(r))
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(Drug {
        min_age_months: u32::try_from(row.min_age_months).map_err(|_| {
            DatabaseError::ConstraintViolation(format!(
                "min_age_months out of range for drug {}: {}",
                row.id, row.min_age_months
            ))
        })?,
        id: row.id,
        name: row.name,
        active_ingredient: row.active_ingredient,
        therapeutic_class: row.therapeutic_class,
        allergy_families: serde_json::from_str(&row.allergy_families)?,
        concentration_mg_per_ml: row.concentration_mg_per_ml,
        max_adult_daily_mg: row.max_adult_daily_mg,
        contraindications: serde_json::from_str(&row.contraindications)?,
        allowed_routes,
        pediatric_rule,
    })
}

/// Insert a drug or replace every column of an existing one with the same id.
/// The pediatric rule is written separately via [`upsert_pediatric_rule`].
pub fn upsert_drug(conn: &Connection, drug: &Drug) -> Result<(), DatabaseError> {
    let routes: Vec<&str> = drug.allowed_routes.iter().map(|r| r.as_str()).collect();
    conn.execute(
        "INSERT INTO drugs (id, name, active_ingredient, therapeutic_class, allergy_families,
         concentration_mg_per_ml, min_age_months, max_adult_daily_mg, contraindications, allowed_routes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            active_ingredient = excluded.active_ingredient,
            therapeutic_class = excluded.therapeutic_class,
            allergy_families = excluded.allergy_families,
            concentration_mg_per_ml = excluded.concentration_mg_per_ml,
            min_age_months = excluded.min_age_months,
            max_adult_daily_mg = excluded.max_adult_daily_mg,
            contraindications = excluded.contraindications,
            allowed_routes = excluded.allowed_routes,
            updated_at = datetime('now')",
        params![
            drug.id,
            drug.name,
            drug.active_ingredient,
            drug.therapeutic_class,
            serde_json::to_string(&drug.allergy_families)?,
            drug.concentration_mg_per_ml,
            i64::from(drug.min_age_months),
            drug.max_adult_daily_mg,
            serde_json::to_string(&drug.contraindications)?,
            serde_json::to_string(&routes)?,
        ],
    )?;
    Ok(())
}

pub fn upsert_pediatric_rule(
    conn: &Connection,
    drug_id: &str,
    rule: &PediatricDoseRule,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO pediatric_rules (drug_id, mode, min_mg_per_kg, max_mg_per_kg, absolute_ceiling_mg)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(drug_id) DO UPDATE SET
            mode = excluded.mode,
            min_mg_per_kg = excluded.min_mg_per_kg,
            max_mg_per_kg = excluded.max_mg_per_kg,
            absolute_ceiling_mg = excluded.absolute_ceiling_mg",
        params![
            drug_id,
            rule.mode.as_str(),
            rule.min_mg_per_kg,
            rule.max_mg_per_kg,
            rule.absolute_ceiling_mg,
        ],
    )?;
    Ok(())
}

pub fn delete_pediatric_rule(conn: &Connection, drug_id: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM pediatric_rules WHERE drug_id = ?1",
        params![drug_id],
    )?;
    Ok(())
}

pub fn get_drug(conn: &Connection, drug_id: &str) -> Result<Option<Drug>, DatabaseError> {
    let sql = format!(
        "SELECT {DRUG_COLUMNS} FROM drugs d
         LEFT JOIN pediatric_rules p ON p.drug_id = d.id
         WHERE d.id = ?1"
    );
    let row = conn
        .query_row(&sql, params![drug_id], drug_row_from_rusqlite)
        .optional()?;
    row.map(drug_from_row).transpose()
}

pub fn get_all_drugs(conn: &Connection) -> Result<Vec<Drug>, DatabaseError> {
    let sql = format!(
        "SELECT {DRUG_COLUMNS} FROM drugs d
         LEFT JOIN pediatric_rules p ON p.drug_id = d.id
         ORDER BY d.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], drug_row_from_rusqlite)?;

    let mut drugs = Vec::new();
    for row in rows {
        drugs.push(drug_from_row(row?)?);
    }
    Ok(drugs)
}

/// Display name and id of every drug, ordered by display name.
pub fn list_drug_names(conn: &Connection) -> Result<Vec<(String, String)>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT name, id FROM drugs ORDER BY name")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn count_drugs(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM drugs", [], |row| row.get(0))?;
    Ok(count)
}
