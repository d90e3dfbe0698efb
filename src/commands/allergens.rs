//! # Allergens Command Implementation
//!
//! Manages the allergen vocabulary on the ingredient definition. Unlike
//! categories, no dependent collections hang off allergens: only the
//! vocabulary itself is written (cascade step 1), the rest is skipped.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use bowl_builder::cascade;
use bowl_builder::catalog::{ALLERGENS_FIELD, INGREDIENT_TYPE};
use bowl_builder::store::Store;

/// Manage the allergen vocabulary
#[derive(Args, Debug)]
pub struct AllergensArgs {
    #[command(subcommand)]
    command: AllergensCommand,
}

#[derive(Subcommand, Debug)]
enum AllergensCommand {
    /// List the current allergens
    List,
    /// Replace the allergen vocabulary
    Set {
        /// The new allergen list, in order
        #[arg(required = true, value_name = "ALLERGEN")]
        values: Vec<String>,
    },
}

pub fn execute(args: AllergensArgs, store_path: Option<PathBuf>) -> Result<()> {
    let store = super::open_store(store_path)?;
    match args.command {
        AllergensCommand::List => {
            for allergen in store.read_field_definition(INGREDIENT_TYPE, ALLERGENS_FIELD)? {
                println!("{}", allergen);
            }
            Ok(())
        }
        AllergensCommand::Set { values } => {
            let report = cascade::apply_taxonomy_change(
                &store,
                INGREDIENT_TYPE,
                ALLERGENS_FIELD,
                &values,
            )?;
            println!(
                "{} Allergens saved ({} added, {} removed)",
                style("✓").green(),
                report.diff.added.len(),
                report.diff.removed.len()
            );
            Ok(())
        }
    }
}
