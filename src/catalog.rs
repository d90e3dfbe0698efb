//! # Catalog Mapping
//!
//! Field-by-field translation between the platform's raw records and the
//! typed domain model, plus the collection loaders built on top of it.
//! This is plumbing: every function here is a direct mapping with the
//! decode-with-default semantics delegated to [`crate::codec`].
//!
//! Record types and field keys are fixed by the shop's metaobject setup
//! and are the single source of truth for the rest of the crate.

use crate::codec;
use crate::error::Result;
use crate::model::{BowlTemplate, Ingredient, Nutrition, OrderRecord};
use crate::reconcile;
use crate::store::Store;

/// Record type holding ingredients.
pub const INGREDIENT_TYPE: &str = "ingredient";
/// Record type holding bowl templates.
pub const TEMPLATE_TYPE: &str = "bowl_template";
/// Field key carrying the category vocabulary on the ingredient definition.
pub const CATEGORY_FIELD: &str = "category";
/// Field key carrying the allergen vocabulary on the ingredient definition.
pub const ALLERGENS_FIELD: &str = "allergens";
/// Currency assumed when a stored price carries none.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Decode an ingredient record. Missing or malformed fields fall back to
/// their empty defaults; this never fails.
pub fn ingredient_from_record(record: &crate::store::Record) -> Ingredient {
    Ingredient {
        id: record.id.clone(),
        name: record.field("name").to_string(),
        category: record.field("category").to_string(),
        allergens: codec::decode_string_list(record.field("allergens"), "allergens"),
        nutrition: Nutrition {
            calories: codec::decode_number(record.field("calories"), "calories"),
            protein: codec::decode_number(record.field("protein"), "protein"),
            carbs: codec::decode_number(record.field("carbs"), "carbs"),
            fat: codec::decode_number(record.field("fat"), "fat"),
        },
        extra_price: codec::decode_money(
            record.field("extra_price"),
            "extra_price",
            DEFAULT_CURRENCY,
        ),
    }
}

/// Encode an ingredient's fields for a create or update write.
pub fn ingredient_fields(ingredient: &Ingredient) -> Vec<(String, String)> {
    vec![
        ("name".to_string(), ingredient.name.clone()),
        ("category".to_string(), ingredient.category.clone()),
        (
            "allergens".to_string(),
            codec::encode_string_list(&ingredient.allergens),
        ),
        (
            "calories".to_string(),
            ingredient.nutrition.calories.to_string(),
        ),
        (
            "protein".to_string(),
            ingredient.nutrition.protein.to_string(),
        ),
        ("carbs".to_string(), ingredient.nutrition.carbs.to_string()),
        ("fat".to_string(), ingredient.nutrition.fat.to_string()),
        (
            "extra_price".to_string(),
            codec::encode_money(&ingredient.extra_price),
        ),
    ]
}

/// Decode a bowl template record.
pub fn template_from_record(record: &crate::store::Record) -> BowlTemplate {
    BowlTemplate {
        id: record.id.clone(),
        name: record.field("name").to_string(),
        description: record.field("description").to_string(),
        base_price: codec::decode_money(
            record.field("base_price"),
            "base_price",
            DEFAULT_CURRENCY,
        ),
        limits: codec::decode_limit_map(record.field("category_limits"), "category_limits"),
    }
}

/// Encode a template's fields for a create or update write.
pub fn template_fields(template: &BowlTemplate) -> Vec<(String, String)> {
    vec![
        ("name".to_string(), template.name.clone()),
        ("description".to_string(), template.description.clone()),
        (
            "base_price".to_string(),
            codec::encode_money(&template.base_price),
        ),
        (
            "category_limits".to_string(),
            codec::encode_limit_map(&template.limits),
        ),
    ]
}

/// Load and decode every ingredient.
pub fn load_ingredients(store: &dyn Store) -> Result<Vec<Ingredient>> {
    Ok(store
        .read_collection(INGREDIENT_TYPE)?
        .iter()
        .map(ingredient_from_record)
        .collect())
}

/// Load and decode every bowl template.
pub fn load_templates(store: &dyn Store) -> Result<Vec<BowlTemplate>> {
    Ok(store
        .read_collection(TEMPLATE_TYPE)?
        .iter()
        .map(template_from_record)
        .collect())
}

/// Load and decode the shop ordering state.
pub fn load_order_record(store: &dyn Store) -> Result<OrderRecord> {
    let state = store.read_ordering_state()?;
    Ok(codec::decode_order_record(
        &state.category_order,
        &state.ingredient_order,
    ))
}

/// Arrange ingredients in canonical display order: categories in the
/// stored category order, and within each category the stored ingredient
/// sequence reconciled against the live catalog. This is the enumeration
/// order the overflow allocator bills against.
pub fn arrange_ingredients(ingredients: &[Ingredient], order: &OrderRecord) -> Vec<Ingredient> {
    let synced = reconcile::sync_ingredient_order(order, ingredients);
    let mut arranged = Vec::with_capacity(ingredients.len());
    for category in &synced.category_order {
        for id in synced.ingredients_for(category) {
            if let Some(ingredient) = ingredients.iter().find(|i| &i.id == id) {
                arranged.push(ingredient.clone());
            }
        }
    }
    arranged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Money;
    use crate::store::{MemoryStore, Record, Store};
    use std::collections::HashMap;

    fn record(id: &str, fields: &[(&str, &str)]) -> Record {
        Record {
            id: id.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_ingredient_round_trip() {
        let original = Ingredient {
            id: "ing-1".to_string(),
            name: "Tofu".to_string(),
            category: "Protein".to_string(),
            allergens: vec!["soy".to_string()],
            nutrition: Nutrition {
                calories: 120.0,
                protein: 12.0,
                carbs: 2.5,
                fat: 6.0,
            },
            extra_price: Money::new(1.5, "EUR"),
        };
        let fields = ingredient_fields(&original);
        let rec = Record {
            id: "ing-1".to_string(),
            fields: fields.into_iter().collect(),
        };
        assert_eq!(ingredient_from_record(&rec), original);
    }

    #[test]
    fn test_ingredient_from_sparse_record_defaults() {
        let rec = record("ing-2", &[("name", "Rice")]);
        let ingredient = ingredient_from_record(&rec);
        assert_eq!(ingredient.name, "Rice");
        assert_eq!(ingredient.category, "");
        assert!(ingredient.allergens.is_empty());
        assert_eq!(ingredient.nutrition.calories, 0.0);
        assert_eq!(ingredient.extra_price.amount, 0.0);
        assert_eq!(ingredient.extra_price.currency_code, DEFAULT_CURRENCY);
    }

    #[test]
    fn test_template_decode_with_orphaned_limit() {
        let rec = record(
            "tpl-1",
            &[
                ("name", "Classic"),
                ("base_price", r#"{"amount":5,"currency_code":"EUR"}"#),
                ("category_limits", r#"{"Base":"2","Legacy":5}"#),
            ],
        );
        let template = template_from_record(&rec);
        assert_eq!(template.base_price.amount, 5.0);
        assert_eq!(
            template.limits,
            vec![("Base".to_string(), 2), ("Legacy".to_string(), 5)]
        );
    }

    #[test]
    fn test_load_ingredients_from_store() {
        let store = MemoryStore::new();
        store
            .create_record(
                INGREDIENT_TYPE,
                &ingredient_fields(&Ingredient {
                    id: String::new(),
                    name: "Rice".to_string(),
                    category: "Base".to_string(),
                    allergens: vec![],
                    nutrition: Nutrition::default(),
                    extra_price: Money::zero("EUR"),
                }),
            )
            .unwrap();
        let loaded = load_ingredients(&store).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Rice");
        assert!(!loaded[0].id.is_empty());
    }

    #[test]
    fn test_arrange_ingredients_follows_order_record() {
        let ingredients = vec![
            Ingredient {
                id: "rice".to_string(),
                name: "Rice".to_string(),
                category: "Base".to_string(),
                allergens: vec![],
                nutrition: Nutrition::default(),
                extra_price: Money::zero("EUR"),
            },
            Ingredient {
                id: "tofu".to_string(),
                name: "Tofu".to_string(),
                category: "Protein".to_string(),
                allergens: vec![],
                nutrition: Nutrition::default(),
                extra_price: Money::zero("EUR"),
            },
            Ingredient {
                id: "quinoa".to_string(),
                name: "Quinoa".to_string(),
                category: "Base".to_string(),
                allergens: vec![],
                nutrition: Nutrition::default(),
                extra_price: Money::zero("EUR"),
            },
        ];
        let order = OrderRecord {
            category_order: vec!["Protein".to_string(), "Base".to_string()],
            ingredient_order: vec![(
                "Base".to_string(),
                vec!["quinoa".to_string(), "rice".to_string()],
            )],
        };
        let arranged = arrange_ingredients(&ingredients, &order);
        let ids: Vec<&str> = arranged.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["tofu", "quinoa", "rice"]);
    }
}
