use crate::catalog::DrugCatalog;
use crate::models::enums::{AdministrationRoute, DoseMode, InteractionLevel};
use crate::models::{Alert, AlertKind, PediatricDoseRule};

use super::helpers::{
    active_ingredients, is_epinephrine, is_pediatric, round_dose, shared_codes, CARDIAC_ARREST,
};
use super::messages::MessageTemplates;
use super::types::ValidationContext;

// ---------------------------------------------------------------------------
// [0] Epinephrine route override
// ---------------------------------------------------------------------------

/// Intravenous epinephrine outside cardiac arrest. Independent of the drug's
/// allowed routes.
pub fn check_epinephrine_route(ctx: &ValidationContext<'_>) -> Option<Alert> {
    let restricted = is_epinephrine(ctx.drug)
        && ctx.prescription.route == AdministrationRoute::Intravenous
        && !ctx.patient.conditions.contains(CARDIAC_ARREST);

    restricted.then(|| {
        Alert::block(
            AlertKind::EpinephrineRoute,
            MessageTemplates::epinephrine_intravenous(),
        )
    })
}

// ---------------------------------------------------------------------------
// [1] Minimum age
// ---------------------------------------------------------------------------

pub fn check_minimum_age(ctx: &ValidationContext<'_>) -> Option<Alert> {
    let age = ctx.patient.age_months;
    let min_age = ctx.drug.min_age_months;
    (age < min_age).then(|| {
        Alert::block(
            AlertKind::MinimumAge,
            MessageTemplates::minimum_age(age, min_age),
        )
    })
}

// ---------------------------------------------------------------------------
// [2] Allergy
// ---------------------------------------------------------------------------

pub fn check_allergies(ctx: &ValidationContext<'_>) -> Option<Alert> {
    let matched = shared_codes(&ctx.drug.allergy_families, &ctx.patient.allergies);
    (!matched.is_empty())
        .then(|| Alert::block(AlertKind::Allergy, MessageTemplates::allergy(&matched)))
}

// ---------------------------------------------------------------------------
// [3] Contraindication
// ---------------------------------------------------------------------------

pub fn check_contraindications(ctx: &ValidationContext<'_>) -> Option<Alert> {
    let matched = shared_codes(&ctx.drug.contraindications, &ctx.patient.conditions);
    (!matched.is_empty()).then(|| {
        Alert::block(
            AlertKind::Contraindication,
            MessageTemplates::contraindication(&matched),
        )
    })
}

// ---------------------------------------------------------------------------
// [4] Therapeutic duplication
// ---------------------------------------------------------------------------

/// One warning when any current medication shares the prescribed drug's class.
pub fn check_therapeutic_duplication(ctx: &ValidationContext<'_>) -> Option<Alert> {
    let class = &ctx.drug.therapeutic_class;
    let existing: Vec<&str> = ctx
        .current_medications
        .iter()
        .filter(|m| &m.therapeutic_class == class)
        .map(|m| m.name.as_str())
        .collect();

    (!existing.is_empty()).then(|| {
        Alert::warning(
            AlertKind::TherapeuticDuplication,
            MessageTemplates::therapeutic_duplication(class, &existing),
        )
    })
}

// ---------------------------------------------------------------------------
// [5] Drug-drug interaction
// ---------------------------------------------------------------------------

/// One alert per matched rule; High rules block, Medium rules warn.
pub fn check_interactions(ctx: &ValidationContext<'_>, catalog: &dyn DrugCatalog) -> Vec<Alert> {
    let ingredients = active_ingredients(ctx.drug, &ctx.current_medications);

    catalog
        .match_interactions(&ingredients)
        .into_iter()
        .map(|rule| match rule.level {
            InteractionLevel::High => {
                Alert::block(AlertKind::Interaction, rule.message.clone())
            }
            InteractionLevel::Medium => {
                Alert::warning(AlertKind::Interaction, rule.message.clone())
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// [6] Dosage
// ---------------------------------------------------------------------------

/// Pediatric patients are checked against the drug's weight-based rule when it
/// has one; everyone else against the adult daily maximum.
pub fn check_dosage(ctx: &ValidationContext<'_>) -> Option<Alert> {
    match &ctx.drug.pediatric_rule {
        Some(rule) if is_pediatric(ctx.patient.age_months) => check_pediatric_dose(ctx, rule),
        _ => check_adult_daily_dose(ctx),
    }
}

/// At most one of ceiling / overdose / subdose fires. The ceiling is checked
/// first and, when exceeded, replaces the range check.
fn check_pediatric_dose(ctx: &ValidationContext<'_>, rule: &PediatricDoseRule) -> Option<Alert> {
    let weight = ctx.patient.weight_kg;
    let min_dose = round_dose(weight * rule.min_mg_per_kg);
    let max_dose = round_dose(weight * rule.max_mg_per_kg);
    let value = round_dose(match rule.mode {
        DoseMode::PerDose => ctx.dose_mg,
        DoseMode::PerDay => ctx.dose_mg * ctx.prescription.frequency.doses_per_day(),
    });

    if rule.mode == DoseMode::PerDose {
        if let Some(ceiling) = rule.absolute_ceiling_mg.filter(|c| *c > 0.0) {
            if value > round_dose(ceiling) {
                return Some(Alert::block(
                    AlertKind::AbsoluteCeiling,
                    MessageTemplates::absolute_ceiling(value, ceiling),
                ));
            }
        }
    }

    if value > max_dose {
        Some(Alert::block(
            AlertKind::Overdose,
            MessageTemplates::overdose(rule.mode, value, max_dose),
        ))
    } else if value < min_dose {
        Some(Alert::warning(
            AlertKind::Subdose,
            MessageTemplates::subdose(rule.mode, value, min_dose),
        ))
    } else {
        None
    }
}

fn check_adult_daily_dose(ctx: &ValidationContext<'_>) -> Option<Alert> {
    let daily_total = round_dose(ctx.dose_mg * ctx.prescription.frequency.doses_per_day());
    (daily_total > ctx.drug.max_adult_daily_mg).then(|| {
        Alert::block(
            AlertKind::AdultDailyMax,
            MessageTemplates::adult_daily_max(daily_total, ctx.drug.max_adult_daily_mg),
        )
    })
}

// ---------------------------------------------------------------------------
// [7] Administration route
// ---------------------------------------------------------------------------

pub fn check_route(ctx: &ValidationContext<'_>) -> Option<Alert> {
    let route = ctx.prescription.route;
    if ctx.drug.allowed_routes.contains(&route) {
        return None;
    }
    let allowed: Vec<&str> = ctx.drug.allowed_routes.iter().map(|r| r.label()).collect();
    Some(Alert::block(
        AlertKind::Route,
        MessageTemplates::route(&ctx.drug.name, route, &allowed),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::{liquid_drug, per_dose_rule};
    use crate::catalog::InMemoryCatalog;
    use crate::models::{
        AlertSeverity, DoseFrequency, Drug, PatientProfile, PediatricDoseRule, PrescriptionItem,
    };

    fn patient(age_months: u32, weight_kg: f64) -> PatientProfile {
        PatientProfile {
            weight_kg,
            age_months,
            conditions: Default::default(),
            allergies: Default::default(),
            current_medications: vec![],
        }
    }

    fn order(drug: &Drug, dose_input: f64, frequency: DoseFrequency) -> PrescriptionItem {
        PrescriptionItem {
            drug_id: drug.id.clone(),
            dose_input,
            frequency,
            route: AdministrationRoute::Oral,
        }
    }

    fn ctx<'a>(
        drug: &'a Drug,
        patient: &'a PatientProfile,
        rx: &'a PrescriptionItem,
        current: Vec<&'a Drug>,
    ) -> ValidationContext<'a> {
        ValidationContext {
            drug,
            patient,
            prescription: rx,
            current_medications: current,
            dose_mg: crate::validation::helpers::dose_in_mg(drug, rx.dose_input),
        }
    }

    fn solid_drug(rule: Option<PediatricDoseRule>) -> Drug {
        let mut drug = liquid_drug("MED_S", "solidol", "misc");
        drug.concentration_mg_per_ml = None;
        drug.max_adult_daily_mg = 150.0;
        drug.pediatric_rule = rule;
        drug
    }

    #[test]
    fn epinephrine_iv_blocks_even_when_route_allowed() {
        let mut drug = liquid_drug("MED_ADRE", "epinephrine", "vasopressor");
        drug.allowed_routes.insert(AdministrationRoute::Intravenous);
        let p = patient(400, 70.0);
        let mut rx = order(&drug, 0.5, DoseFrequency::SingleDose);
        rx.route = AdministrationRoute::Intravenous;

        let alert = check_epinephrine_route(&ctx(&drug, &p, &rx, vec![])).unwrap();
        assert_eq!(alert.kind, AlertKind::EpinephrineRoute);
        assert!(alert.is_block());
        assert!(check_route(&ctx(&drug, &p, &rx, vec![])).is_none());
    }

    #[test]
    fn epinephrine_iv_allowed_in_cardiac_arrest() {
        let drug = liquid_drug("MED_ADRE", "epinephrine", "vasopressor");
        let mut p = patient(400, 70.0);
        p.conditions.insert(CARDIAC_ARREST.to_string());
        let mut rx = order(&drug, 0.5, DoseFrequency::SingleDose);
        rx.route = AdministrationRoute::Intravenous;
        assert!(check_epinephrine_route(&ctx(&drug, &p, &rx, vec![])).is_none());
    }

    #[test]
    fn cardiac_arrest_code_is_camel_case() {
        let drug = liquid_drug("MED_ADRE", "epinephrine", "vasopressor");
        let mut rx = order(&drug, 0.5, DoseFrequency::SingleDose);
        rx.route = AdministrationRoute::Intravenous;

        let mut p = patient(400, 70.0);
        p.conditions.insert("cardiacArrest".into());
        assert!(check_epinephrine_route(&ctx(&drug, &p, &rx, vec![])).is_none());

        let mut snake = patient(400, 70.0);
        snake.conditions.insert("cardiac_arrest".into());
        assert!(check_epinephrine_route(&ctx(&drug, &snake, &rx, vec![])).is_some());
    }

    #[test]
    fn epinephrine_im_not_restricted() {
        let drug = liquid_drug("MED_ADRE", "epinephrine", "vasopressor");
        let p = patient(400, 70.0);
        let mut rx = order(&drug, 0.5, DoseFrequency::SingleDose);
        rx.route = AdministrationRoute::Intramuscular;
        assert!(check_epinephrine_route(&ctx(&drug, &p, &rx, vec![])).is_none());
    }

    #[test]
    fn minimum_age_boundary() {
        let mut drug = liquid_drug("MED_IBUP", "ibuprofen", "nsaid");
        drug.min_age_months = 6;
        let rx = order(&drug, 1.0, DoseFrequency::EveryHours(8));
        let young = patient(5, 7.0);
        let old_enough = patient(6, 7.0);
        assert!(check_minimum_age(&ctx(&drug, &young, &rx, vec![])).is_some());
        assert!(check_minimum_age(&ctx(&drug, &old_enough, &rx, vec![])).is_none());
    }

    #[test]
    fn allergy_lists_every_intersecting_family() {
        let mut drug = liquid_drug("MED_AMOX", "amoxicillin", "antibiotic");
        drug.allergy_families = ["penicillin".to_string(), "beta_lactam".to_string()].into();
        let mut p = patient(72, 20.0);
        p.allergies = ["penicillin".to_string(), "beta_lactam".to_string(), "latex".to_string()].into();
        let rx = order(&drug, 5.0, DoseFrequency::EveryHours(8));

        let alert = check_allergies(&ctx(&drug, &p, &rx, vec![])).unwrap();
        assert!(alert.message.contains("beta_lactam, penicillin"));
        assert!(!alert.message.contains("latex"));
    }

    #[test]
    fn contraindication_blocks_on_shared_condition() {
        let mut drug = liquid_drug("MED_IBUP", "ibuprofen", "nsaid");
        drug.contraindications = ["dengue".to_string(), "gastritis".to_string()].into();
        let mut p = patient(72, 20.0);
        p.conditions = ["dengue".to_string()].into();
        let rx = order(&drug, 1.0, DoseFrequency::EveryHours(8));

        let alert = check_contraindications(&ctx(&drug, &p, &rx, vec![])).unwrap();
        assert_eq!(alert.severity, AlertSeverity::Block);
        assert!(alert.message.contains("dengue"));
        assert!(!alert.message.contains("gastritis"));
    }

    #[test]
    fn duplication_is_single_warning() {
        let drug = liquid_drug("MED_IBUP", "ibuprofen", "nsaid");
        let diclo = liquid_drug("MED_DICLO", "diclofenac", "nsaid");
        let naproxen = liquid_drug("MED_NAPRO", "naproxen", "nsaid");
        let p = patient(400, 70.0);
        let rx = order(&drug, 1.0, DoseFrequency::EveryHours(8));

        let alert =
            check_therapeutic_duplication(&ctx(&drug, &p, &rx, vec![&diclo, &naproxen])).unwrap();
        assert_eq!(alert.severity, AlertSeverity::Warning);
        assert_eq!(alert.kind, AlertKind::TherapeuticDuplication);
    }

    #[test]
    fn interaction_severity_follows_rule_level() {
        let drug = liquid_drug("MED_IBUP", "ibuprofen", "nsaid");
        let warf = liquid_drug("MED_WARF", "warfarin", "anticoagulant");
        let diclo = liquid_drug("MED_DICLO", "diclofenac", "nsaid");
        let mut catalog = InMemoryCatalog::new();
        catalog
            .add_interaction_rule("warfarin", "ibuprofen", InteractionLevel::High, "bleeding")
            .unwrap();
        catalog
            .add_interaction_rule("ibuprofen", "diclofenac", InteractionLevel::Medium, "renal")
            .unwrap();
        let p = patient(400, 70.0);
        let rx = order(&drug, 1.0, DoseFrequency::EveryHours(8));

        let alerts = check_interactions(&ctx(&drug, &p, &rx, vec![&warf, &diclo]), &catalog);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].severity, AlertSeverity::Block);
        assert_eq!(alerts[0].message, "bleeding");
        assert_eq!(alerts[1].severity, AlertSeverity::Warning);
    }

    #[test]
    fn subdose_boundary_is_inclusive() {
        let drug = solid_drug(Some(per_dose_rule(5.0, 10.0, None)));
        let p = patient(72, 20.0);
        let rx = order(&drug, 100.0, DoseFrequency::EveryHours(6));
        assert!(check_dosage(&ctx(&drug, &p, &rx, vec![])).is_none());
    }

    #[test]
    fn float_noise_does_not_trigger_subdose() {
        // 3.0 * 0.1 == 0.30000000000000004 before rounding
        let drug = solid_drug(Some(per_dose_rule(0.1, 0.2, None)));
        let p = patient(24, 3.0);
        let rx = order(&drug, 0.3, DoseFrequency::EveryHours(6));
        assert!(check_dosage(&ctx(&drug, &p, &rx, vec![])).is_none());
    }

    #[test]
    fn maximum_boundary_is_inclusive() {
        let drug = solid_drug(Some(per_dose_rule(5.0, 10.0, None)));
        let p = patient(72, 20.0);
        let at_max = order(&drug, 200.0, DoseFrequency::EveryHours(6));
        let above = order(&drug, 200.5, DoseFrequency::EveryHours(6));
        assert!(check_dosage(&ctx(&drug, &p, &at_max, vec![])).is_none());
        let alert = check_dosage(&ctx(&drug, &p, &above, vec![])).unwrap();
        assert_eq!(alert.kind, AlertKind::Overdose);
    }

    #[test]
    fn ceiling_takes_precedence_over_range() {
        let drug = solid_drug(Some(per_dose_rule(0.01, 1.0, Some(0.5))));
        let p = patient(60, 20.0);
        let rx = order(&drug, 0.6, DoseFrequency::SingleDose);
        let alert = check_dosage(&ctx(&drug, &p, &rx, vec![])).unwrap();
        assert_eq!(alert.kind, AlertKind::AbsoluteCeiling);
        assert!(alert.is_block());
    }

    #[test]
    fn ceiling_ignored_for_per_day_rules() {
        let mut rule = per_dose_rule(1.0, 100.0, Some(10.0));
        rule.mode = DoseMode::PerDay;
        let drug = solid_drug(Some(rule));
        let p = patient(60, 20.0);
        let rx = order(&drug, 50.0, DoseFrequency::EveryHours(12));
        assert!(check_dosage(&ctx(&drug, &p, &rx, vec![])).is_none());
    }

    #[test]
    fn per_day_rule_multiplies_by_frequency() {
        let mut drug = liquid_drug("MED_AMOX", "amoxicillin", "antibiotic");
        drug.pediatric_rule = Some(PediatricDoseRule {
            mode: DoseMode::PerDay,
            min_mg_per_kg: 40.0,
            max_mg_per_kg: 50.0,
            absolute_ceiling_mg: None,
        });
        let p = patient(72, 20.0);
        let low = order(&drug, 5.0, DoseFrequency::EveryHours(8));
        let high = order(&drug, 7.0, DoseFrequency::EveryHours(8));
        assert_eq!(
            check_dosage(&ctx(&drug, &p, &low, vec![])).unwrap().kind,
            AlertKind::Subdose
        );
        assert_eq!(
            check_dosage(&ctx(&drug, &p, &high, vec![])).unwrap().kind,
            AlertKind::Overdose
        );
    }

    #[test]
    fn pediatric_without_rule_uses_adult_daily_max() {
        let drug = solid_drug(None);
        let p = patient(60, 20.0);
        let rx = order(&drug, 75.0, DoseFrequency::EveryHours(8));
        let alert = check_dosage(&ctx(&drug, &p, &rx, vec![])).unwrap();
        assert_eq!(alert.kind, AlertKind::AdultDailyMax);
    }

    #[test]
    fn adult_ignores_pediatric_rule() {
        let drug = solid_drug(Some(per_dose_rule(5.0, 10.0, Some(1.0))));
        let p = patient(144, 20.0);
        let rx = order(&drug, 50.0, DoseFrequency::EveryHours(8));
        assert!(check_dosage(&ctx(&drug, &p, &rx, vec![])).is_none());
    }

    #[test]
    fn route_not_allowed_lists_allowed() {
        let drug = liquid_drug("MED_IBUP", "ibuprofen", "nsaid");
        let p = patient(400, 70.0);
        let mut rx = order(&drug, 1.0, DoseFrequency::EveryHours(8));
        rx.route = AdministrationRoute::Subcutaneous;
        let alert = check_route(&ctx(&drug, &p, &rx, vec![])).unwrap();
        assert_eq!(alert.kind, AlertKind::Route);
        assert!(alert.message.contains("Use: Oral."));
    }
}
