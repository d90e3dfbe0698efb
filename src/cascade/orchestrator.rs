//! Orchestrator for the complete taxonomy-change cascade.
//!
//! Coordinates the four steps in their fixed sequence and assembles the
//! per-step [`CascadeReport`](super::CascadeReport). Step 1 failing aborts
//! the run with nothing committed; once steps 1–2 have committed, the
//! cleanup fan-outs are best-effort and their failures are recorded in the
//! report rather than raised.

use log::{info, warn};

use super::{ingredients, templates, CascadeReport, StepReport};
use crate::catalog::CATEGORY_FIELD;
use crate::codec;
use crate::diff;
use crate::error::{Error, Result};
use crate::reconcile;
use crate::store::{Store, CATEGORY_ORDER_KEY};

/// Apply a vocabulary edit to the field `field_key` of the definition
/// `record_type`, then propagate it across the dependent collections.
///
/// For the category field all four steps run; for any other vocabulary
/// field (e.g. allergens) only step 1 applies and the rest are skipped.
///
/// # Errors
///
/// `Error::Vocabulary` when the store rejects the new choices (step 1, no
/// side effects committed); `Error::Store`/`Error::Io` when persisting the
/// vocabulary or the category order fails at transport level.
pub fn apply_taxonomy_change(
    store: &dyn Store,
    record_type: &str,
    field_key: &str,
    new_categories: &[String],
) -> Result<CascadeReport> {
    let previous = store.read_field_definition(record_type, field_key)?;
    let delta = diff::diff(&previous, new_categories);

    // Step 1: persist the vocabulary. A rejection aborts the whole run.
    let outcome = store.write_field_definition(record_type, field_key, new_categories)?;
    if !outcome.is_ok() {
        return Err(Error::Vocabulary {
            errors: outcome.user_errors,
        });
    }

    if field_key != CATEGORY_FIELD {
        info!(
            "Vocabulary '{}' updated ({} added, {} removed); no dependent collections",
            field_key,
            delta.added.len(),
            delta.removed.len()
        );
        return Ok(CascadeReport {
            field_key: field_key.to_string(),
            diff: delta,
            synced_order: None,
            ingredient_cleanup: StepReport::Skipped,
            template_resync: StepReport::Skipped,
        });
    }

    // Step 2: resync the stored category display order.
    let ordering = store.read_ordering_state()?;
    let persisted_order = codec::decode_string_list(&ordering.category_order, "category_order");
    let synced = reconcile::reconcile(&persisted_order, new_categories);
    let write = store.write_ordering_state(&[(
        CATEGORY_ORDER_KEY.to_string(),
        codec::encode_string_list(&synced),
    )])?;
    if !write.is_ok() {
        return Err(Error::Store {
            operation: "write_ordering_state".to_string(),
            message: write
                .user_errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        });
    }

    // Steps 3 and 4 are best effort: their failures are logged and
    // reported, never raised. The next successful run repairs anything
    // left behind.
    let ingredient_cleanup = match ingredients::clear_stale_categories(store, new_categories) {
        Ok((examined, updated, failed)) => StepReport::Completed {
            examined,
            updated,
            failed,
        },
        Err(err) => {
            warn!("Ingredient cleanup step did not run: {}", err);
            StepReport::Failed(err.to_string())
        }
    };
    let template_resync = match templates::resync_limits(store, new_categories) {
        Ok((examined, updated, failed)) => StepReport::Completed {
            examined,
            updated,
            failed,
        },
        Err(err) => {
            warn!("Template limit resync step did not run: {}", err);
            StepReport::Failed(err.to_string())
        }
    };

    let report = CascadeReport {
        field_key: field_key.to_string(),
        diff: delta,
        synced_order: Some(synced),
        ingredient_cleanup,
        template_resync,
    };
    info!(
        "Taxonomy cascade complete ({} added, {} removed, fully consistent: {})",
        report.diff.added.len(),
        report.diff.removed.len(),
        report.fully_consistent()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, ALLERGENS_FIELD, INGREDIENT_TYPE, TEMPLATE_TYPE};
    use crate::store::{MemoryStore, INGREDIENT_ORDER_KEY};

    const DEFINITION: &str = INGREDIENT_TYPE;

    fn seq(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .write_field_definition(DEFINITION, CATEGORY_FIELD, &seq(&["Base", "Protein", "Legacy"]))
            .unwrap();
        store
            .write_ordering_state(&[
                (
                    CATEGORY_ORDER_KEY.to_string(),
                    r#"["Legacy","Base","Protein"]"#.to_string(),
                ),
                (
                    INGREDIENT_ORDER_KEY.to_string(),
                    r#"{"Base":["rice"]}"#.to_string(),
                ),
            ])
            .unwrap();
        store
            .create_record(
                INGREDIENT_TYPE,
                &[
                    ("name".to_string(), "Mango".to_string()),
                    ("category".to_string(), "Legacy".to_string()),
                ],
            )
            .unwrap();
        store
            .create_record(
                INGREDIENT_TYPE,
                &[
                    ("name".to_string(), "Rice".to_string()),
                    ("category".to_string(), "Base".to_string()),
                ],
            )
            .unwrap();
        store
            .create_record(
                TEMPLATE_TYPE,
                &[
                    ("name".to_string(), "Classic".to_string()),
                    (
                        "category_limits".to_string(),
                        r#"{"Base":2,"Protein":1,"Legacy":5}"#.to_string(),
                    ),
                ],
            )
            .unwrap();
        store
    }

    #[test]
    fn test_full_cascade_syncs_all_collections() {
        let store = seeded_store();
        let new_categories = seq(&["Base", "Protein", "Topping"]);

        let report =
            apply_taxonomy_change(&store, DEFINITION, CATEGORY_FIELD, &new_categories).unwrap();

        assert_eq!(report.diff.added, seq(&["Topping"]));
        assert_eq!(report.diff.removed, seq(&["Legacy"]));
        // step 1: vocabulary committed
        assert_eq!(
            store
                .read_field_definition(DEFINITION, CATEGORY_FIELD)
                .unwrap(),
            new_categories
        );
        // step 2: survivors keep order, newcomer appended
        assert_eq!(
            report.synced_order.as_deref(),
            Some(seq(&["Base", "Protein", "Topping"]).as_slice())
        );
        let order = catalog::load_order_record(&store).unwrap();
        assert_eq!(order.category_order, seq(&["Base", "Protein", "Topping"]));
        // step 3: dangling ingredient cleared
        let ingredients = catalog::load_ingredients(&store).unwrap();
        let mango = ingredients.iter().find(|i| i.name == "Mango").unwrap();
        assert_eq!(mango.category, "");
        assert_eq!(
            report.ingredient_cleanup,
            StepReport::Completed {
                examined: 2,
                updated: 1,
                failed: 0
            }
        );
        // step 4: limits rebuilt, orphan dropped
        let templates = catalog::load_templates(&store).unwrap();
        assert_eq!(
            templates[0].limits,
            vec![
                ("Base".to_string(), 2),
                ("Protein".to_string(), 1),
                ("Topping".to_string(), 0),
            ]
        );
        assert!(report.fully_consistent());
    }

    #[test]
    fn test_rejected_vocabulary_aborts_with_no_side_effects() {
        let store = seeded_store();
        let err = apply_taxonomy_change(
            &store,
            DEFINITION,
            CATEGORY_FIELD,
            &seq(&["Base", "Base"]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Vocabulary { .. }));

        // vocabulary untouched
        assert_eq!(
            store
                .read_field_definition(DEFINITION, CATEGORY_FIELD)
                .unwrap(),
            seq(&["Base", "Protein", "Legacy"])
        );
        // ordering untouched
        let order = catalog::load_order_record(&store).unwrap();
        assert_eq!(order.category_order, seq(&["Legacy", "Base", "Protein"]));
        // dependent records untouched
        let ingredients = catalog::load_ingredients(&store).unwrap();
        assert!(ingredients.iter().any(|i| i.category == "Legacy"));
    }

    #[test]
    fn test_non_category_field_runs_step_one_only() {
        let store = seeded_store();
        let report = apply_taxonomy_change(
            &store,
            DEFINITION,
            ALLERGENS_FIELD,
            &seq(&["soy", "nuts"]),
        )
        .unwrap();

        assert_eq!(report.synced_order, None);
        assert_eq!(report.ingredient_cleanup, StepReport::Skipped);
        assert_eq!(report.template_resync, StepReport::Skipped);
        assert_eq!(
            store
                .read_field_definition(DEFINITION, ALLERGENS_FIELD)
                .unwrap(),
            seq(&["soy", "nuts"])
        );
        // category order untouched by an allergen edit
        let order = catalog::load_order_record(&store).unwrap();
        assert_eq!(order.category_order, seq(&["Legacy", "Base", "Protein"]));
    }

    #[test]
    fn test_partial_cleanup_failure_still_reports_success() {
        let store = seeded_store();
        let mango_id = store
            .read_collection(INGREDIENT_TYPE)
            .unwrap()
            .iter()
            .find(|r| r.field("name") == "Mango")
            .unwrap()
            .id
            .clone();
        store.poison_updates_for(&mango_id);

        let report = apply_taxonomy_change(
            &store,
            DEFINITION,
            CATEGORY_FIELD,
            &seq(&["Base", "Protein"]),
        )
        .unwrap();

        // steps 1-2 committed, step 3 recorded its failure, run succeeded
        assert_eq!(
            report.ingredient_cleanup,
            StepReport::Completed {
                examined: 2,
                updated: 0,
                failed: 1
            }
        );
        assert!(!report.fully_consistent());

        // the record keeps its dangling reference; a later run would
        // examine it again
        let ingredients = catalog::load_ingredients(&store).unwrap();
        let mango = ingredients.iter().find(|i| i.name == "Mango").unwrap();
        assert_eq!(mango.category, "Legacy");
    }

    #[test]
    fn test_cascade_is_idempotent_on_rerun() {
        let store = seeded_store();
        let new_categories = seq(&["Base", "Protein", "Topping"]);
        let first =
            apply_taxonomy_change(&store, DEFINITION, CATEGORY_FIELD, &new_categories).unwrap();
        let second =
            apply_taxonomy_change(&store, DEFINITION, CATEGORY_FIELD, &new_categories).unwrap();

        assert!(second.diff.is_empty());
        assert_eq!(first.synced_order, second.synced_order);
        let templates = catalog::load_templates(&store).unwrap();
        assert_eq!(
            templates[0].limits,
            vec![
                ("Base".to_string(), 2),
                ("Protein".to_string(), 1),
                ("Topping".to_string(), 0),
            ]
        );
    }
}
