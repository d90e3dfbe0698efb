//! # Order Command Implementation
//!
//! Shows and repairs the stored display order. `show` renders the stored
//! state as-is, including entries that have gone stale; `sync` reconciles
//! both the category order and the per-category ingredient sequences
//! against the live catalog and persists the result.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use bowl_builder::catalog::{self, CATEGORY_FIELD, INGREDIENT_TYPE};
use bowl_builder::codec;
use bowl_builder::reconcile;
use bowl_builder::store::{Store, CATEGORY_ORDER_KEY, INGREDIENT_ORDER_KEY};

/// Show or resync the stored display order
#[derive(Args, Debug)]
pub struct OrderArgs {
    #[command(subcommand)]
    command: OrderCommand,
}

#[derive(Subcommand, Debug)]
enum OrderCommand {
    /// Print the stored category and ingredient order
    Show,
    /// Reconcile the stored order against the live catalog and save it
    Sync,
}

pub fn execute(args: OrderArgs, store_path: Option<PathBuf>) -> Result<()> {
    let store = super::open_store(store_path)?;
    match args.command {
        OrderCommand::Show => show(&store),
        OrderCommand::Sync => sync(&store),
    }
}

fn show(store: &dyn Store) -> Result<()> {
    let order = catalog::load_order_record(store)?;
    let ingredients = catalog::load_ingredients(store)?;

    println!("{}", style("Category order").bold());
    for category in &order.category_order {
        println!("  {}", category);
    }
    println!("{}", style("Ingredient order").bold());
    for (category, ids) in &order.ingredient_order {
        println!("  {}:", category);
        for id in ids {
            match ingredients.iter().find(|i| &i.id == id) {
                Some(ingredient) => println!("    {} ({})", ingredient.name, id),
                None => println!("    {} {}", id, style("(stale)").yellow()),
            }
        }
    }
    Ok(())
}

fn sync(store: &dyn Store) -> Result<()> {
    let stored = catalog::load_order_record(store)?;
    let live = store.read_field_definition(INGREDIENT_TYPE, CATEGORY_FIELD)?;
    let ingredients = catalog::load_ingredients(store)?;

    let category_order = reconcile::reconcile(&stored.category_order, &live);
    let synced = reconcile::sync_ingredient_order(
        &bowl_builder::model::OrderRecord {
            category_order,
            ingredient_order: stored.ingredient_order,
        },
        &ingredients,
    );

    store.write_ordering_state(&[
        (
            CATEGORY_ORDER_KEY.to_string(),
            codec::encode_string_list(&synced.category_order),
        ),
        (
            INGREDIENT_ORDER_KEY.to_string(),
            codec::encode_ingredient_order(&synced.ingredient_order),
        ),
    ])?;

    println!(
        "{} Order synced: {} categories, {} ingredient sequences",
        style("✓").green(),
        synced.category_order.len(),
        synced.ingredient_order.len()
    );
    Ok(())
}
