//! # Init Command Implementation
//!
//! Seeds the store with a small demo menu: a category and allergen
//! vocabulary, a handful of ingredients, one template and the display
//! order. Refuses to touch a store that already has a vocabulary unless
//! `--force` is passed.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use console::style;

use bowl_builder::catalog::{
    self, ALLERGENS_FIELD, CATEGORY_FIELD, DEFAULT_CURRENCY, INGREDIENT_TYPE, TEMPLATE_TYPE,
};
use bowl_builder::codec;
use bowl_builder::model::{BowlTemplate, Ingredient, Money, Nutrition};
use bowl_builder::store::{Store, CATEGORY_ORDER_KEY, INGREDIENT_ORDER_KEY};

/// Seed the store with a demo menu
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Seed even if the store already has a vocabulary
    #[arg(long)]
    force: bool,
}

fn demo_ingredients() -> Vec<Ingredient> {
    let ingredient = |name: &str, category: &str, allergens: &[&str], n: [f64; 4], price: f64| {
        Ingredient {
            id: String::new(),
            name: name.to_string(),
            category: category.to_string(),
            allergens: allergens.iter().map(|s| s.to_string()).collect(),
            nutrition: Nutrition {
                calories: n[0],
                protein: n[1],
                carbs: n[2],
                fat: n[3],
            },
            extra_price: Money::new(price, DEFAULT_CURRENCY),
        }
    };
    vec![
        ingredient("Rice", "Base", &[], [130.0, 2.7, 28.0, 0.3], 1.0),
        ingredient("Quinoa", "Base", &[], [120.0, 4.4, 21.0, 1.9], 1.5),
        ingredient("Tofu", "Protein", &["soy"], [76.0, 8.0, 1.9, 4.8], 2.0),
        ingredient("Chicken", "Protein", &[], [165.0, 31.0, 0.0, 3.6], 2.5),
        ingredient("Avocado", "Topping", &[], [160.0, 2.0, 8.5, 14.7], 1.5),
        ingredient("Peanuts", "Topping", &["peanuts"], [567.0, 25.8, 16.1, 49.2], 0.75),
    ]
}

pub fn execute(args: InitArgs, store_path: Option<PathBuf>) -> Result<()> {
    let store = super::open_store(store_path)?;

    let existing = store.read_field_definition(INGREDIENT_TYPE, CATEGORY_FIELD)?;
    if !existing.is_empty() && !args.force {
        bail!("Store already has a category vocabulary; pass --force to seed anyway");
    }

    let categories: Vec<String> = ["Base", "Protein", "Topping"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let allergens: Vec<String> = ["soy", "peanuts", "gluten"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    store.write_field_definition(INGREDIENT_TYPE, CATEGORY_FIELD, &categories)?;
    store.write_field_definition(INGREDIENT_TYPE, ALLERGENS_FIELD, &allergens)?;

    let mut ingredient_ids: Vec<(String, Vec<String>)> =
        categories.iter().map(|c| (c.clone(), Vec::new())).collect();
    for ingredient in demo_ingredients() {
        let outcome =
            store.create_record(INGREDIENT_TYPE, &catalog::ingredient_fields(&ingredient))?;
        if let Some(id) = outcome.id {
            if let Some((_, ids)) = ingredient_ids
                .iter_mut()
                .find(|(c, _)| c == &ingredient.category)
            {
                ids.push(id);
            }
        }
    }

    let template = BowlTemplate {
        id: String::new(),
        name: "Classic Bowl".to_string(),
        description: "Two bases, one protein, one topping included".to_string(),
        base_price: Money::new(8.5, DEFAULT_CURRENCY),
        limits: vec![
            ("Base".to_string(), 2),
            ("Protein".to_string(), 1),
            ("Topping".to_string(), 1),
        ],
    };
    store.create_record(TEMPLATE_TYPE, &catalog::template_fields(&template))?;

    store.write_ordering_state(&[
        (
            CATEGORY_ORDER_KEY.to_string(),
            codec::encode_string_list(&categories),
        ),
        (
            INGREDIENT_ORDER_KEY.to_string(),
            codec::encode_ingredient_order(&ingredient_ids),
        ),
    ])?;

    println!(
        "{} Seeded demo menu into {}",
        style("✓").green(),
        store.path().display()
    );
    Ok(())
}
