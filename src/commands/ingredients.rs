//! # Ingredients Command Implementation
//!
//! Direct CRUD over ingredient records. This is field-mapping plumbing:
//! values are encoded by the catalog layer and written through the store.
//! Categories and allergens are validated against the current
//! vocabularies so records do not start life dangling.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use bowl_builder::catalog::{
    self, ALLERGENS_FIELD, CATEGORY_FIELD, DEFAULT_CURRENCY, INGREDIENT_TYPE,
};
use bowl_builder::model::{Ingredient, Money, Nutrition};
use bowl_builder::store::Store;

/// Manage ingredients
#[derive(Args, Debug)]
pub struct IngredientsArgs {
    #[command(subcommand)]
    command: IngredientsCommand,
}

#[derive(Args, Debug, Default)]
struct FieldValues {
    /// Category the ingredient belongs to
    #[arg(long, value_name = "CATEGORY")]
    category: Option<String>,

    /// Allergen, repeatable
    #[arg(long = "allergen", value_name = "ALLERGEN")]
    allergens: Vec<String>,

    /// Calories per unit
    #[arg(long, value_name = "KCAL")]
    calories: Option<f64>,

    /// Protein grams per unit
    #[arg(long, value_name = "GRAMS")]
    protein: Option<f64>,

    /// Carbohydrate grams per unit
    #[arg(long, value_name = "GRAMS")]
    carbs: Option<f64>,

    /// Fat grams per unit
    #[arg(long, value_name = "GRAMS")]
    fat: Option<f64>,

    /// Price per unit beyond the category's free quota
    #[arg(long, value_name = "AMOUNT")]
    extra_price: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum IngredientsCommand {
    /// List all ingredients
    List,
    /// Create an ingredient
    Add {
        /// Display name
        name: String,
        #[command(flatten)]
        fields: FieldValues,
    },
    /// Update an ingredient's fields
    Update {
        /// Record id
        id: String,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: FieldValues,
    },
    /// Delete an ingredient
    Delete {
        /// Record id
        id: String,
    },
}

pub fn execute(args: IngredientsArgs, store_path: Option<PathBuf>) -> Result<()> {
    let store = super::open_store(store_path)?;
    match args.command {
        IngredientsCommand::List => list(&store),
        IngredientsCommand::Add { name, fields } => add(&store, name, fields),
        IngredientsCommand::Update { id, name, fields } => update(&store, id, name, fields),
        IngredientsCommand::Delete { id } => {
            store.delete_record(INGREDIENT_TYPE, &id)?;
            println!("{} Deleted {}", style("✓").green(), id);
            Ok(())
        }
    }
}

fn list(store: &dyn Store) -> Result<()> {
    for ingredient in catalog::load_ingredients(store)? {
        let category = if ingredient.has_category() {
            ingredient.category.clone()
        } else {
            style("(unassigned)").yellow().to_string()
        };
        println!(
            "{}  {}  {}  {} kcal  +{}",
            ingredient.id,
            style(&ingredient.name).bold(),
            category,
            ingredient.nutrition.calories,
            super::money(
                ingredient.extra_price.amount,
                &ingredient.extra_price.currency_code
            ),
        );
    }
    Ok(())
}

/// Reject references to vocabulary members that do not exist.
fn check_vocabulary(store: &dyn Store, fields: &FieldValues) -> Result<()> {
    if let Some(category) = &fields.category {
        let known = store.read_field_definition(INGREDIENT_TYPE, CATEGORY_FIELD)?;
        if !category.is_empty() && !known.contains(category) {
            bail!("Unknown category '{}'; add it with `categories set` first", category);
        }
    }
    if !fields.allergens.is_empty() {
        let known = store.read_field_definition(INGREDIENT_TYPE, ALLERGENS_FIELD)?;
        for allergen in &fields.allergens {
            if !known.contains(allergen) {
                bail!(
                    "Unknown allergen '{}'; add it with `allergens set` first",
                    allergen
                );
            }
        }
    }
    Ok(())
}

fn add(store: &dyn Store, name: String, fields: FieldValues) -> Result<()> {
    check_vocabulary(store, &fields)?;
    let ingredient = Ingredient {
        id: String::new(),
        name,
        category: fields.category.unwrap_or_default(),
        allergens: fields.allergens,
        nutrition: Nutrition {
            calories: fields.calories.unwrap_or(0.0),
            protein: fields.protein.unwrap_or(0.0),
            carbs: fields.carbs.unwrap_or(0.0),
            fat: fields.fat.unwrap_or(0.0),
        },
        extra_price: Money::new(fields.extra_price.unwrap_or(0.0), DEFAULT_CURRENCY),
    };
    let outcome = store.create_record(INGREDIENT_TYPE, &catalog::ingredient_fields(&ingredient))?;
    println!(
        "{} Created {} ({})",
        style("✓").green(),
        ingredient.name,
        outcome.id.unwrap_or_default()
    );
    Ok(())
}

fn update(store: &dyn Store, id: String, name: Option<String>, fields: FieldValues) -> Result<()> {
    check_vocabulary(store, &fields)?;
    let existing = catalog::load_ingredients(store)?
        .into_iter()
        .find(|i| i.id == id);
    let Some(mut ingredient) = existing else {
        bail!("No ingredient with id '{}'", id);
    };

    if let Some(name) = name {
        ingredient.name = name;
    }
    if let Some(category) = fields.category {
        ingredient.category = category;
    }
    if !fields.allergens.is_empty() {
        ingredient.allergens = fields.allergens;
    }
    if let Some(calories) = fields.calories {
        ingredient.nutrition.calories = calories;
    }
    if let Some(protein) = fields.protein {
        ingredient.nutrition.protein = protein;
    }
    if let Some(carbs) = fields.carbs {
        ingredient.nutrition.carbs = carbs;
    }
    if let Some(fat) = fields.fat {
        ingredient.nutrition.fat = fat;
    }
    if let Some(amount) = fields.extra_price {
        ingredient.extra_price = Money::new(amount, DEFAULT_CURRENCY);
    }

    store.update_record(INGREDIENT_TYPE, &id, &catalog::ingredient_fields(&ingredient))?;
    println!("{} Updated {}", style("✓").green(), id);
    Ok(())
}
