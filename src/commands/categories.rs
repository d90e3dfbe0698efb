//! # Categories Command Implementation
//!
//! Manages the ingredient category vocabulary. `set` replaces the whole
//! vocabulary and runs the full sync cascade: category order resync,
//! ingredient cleanup and template limit resync. Removing categories is
//! confirmed interactively unless `--yes` is passed, since it clears the
//! category from every affected ingredient.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;
use dialoguer::Confirm;

use bowl_builder::cascade::{self, StepReport};
use bowl_builder::catalog::{CATEGORY_FIELD, INGREDIENT_TYPE};
use bowl_builder::diff;
use bowl_builder::store::Store;

/// Manage the ingredient category vocabulary
#[derive(Args, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    command: CategoriesCommand,
}

#[derive(Subcommand, Debug)]
enum CategoriesCommand {
    /// List the current categories in vocabulary order
    List,
    /// Replace the vocabulary and propagate the change
    Set {
        /// The new category list, in order
        #[arg(required = true, value_name = "CATEGORY")]
        values: Vec<String>,

        /// Skip the confirmation prompt for removed categories
        #[arg(long)]
        yes: bool,
    },
}

pub fn execute(args: CategoriesArgs, store_path: Option<PathBuf>) -> Result<()> {
    let store = super::open_store(store_path)?;
    match args.command {
        CategoriesCommand::List => {
            for category in store.read_field_definition(INGREDIENT_TYPE, CATEGORY_FIELD)? {
                println!("{}", category);
            }
            Ok(())
        }
        CategoriesCommand::Set { values, yes } => set_categories(&store, &values, yes),
    }
}

fn set_categories(store: &dyn Store, values: &[String], yes: bool) -> Result<()> {
    let previous = store.read_field_definition(INGREDIENT_TYPE, CATEGORY_FIELD)?;
    let delta = diff::diff(&previous, values);

    if !delta.removed.is_empty() && !yes {
        let prompt = format!(
            "Removing {} will clear the category from affected ingredients and drop their template limits. Continue?",
            delta.removed.join(", ")
        );
        if !Confirm::new().with_prompt(prompt).default(false).interact()? {
            println!("Aborted, nothing changed.");
            return Ok(());
        }
    }

    let report =
        cascade::apply_taxonomy_change(store, INGREDIENT_TYPE, CATEGORY_FIELD, values)?;

    println!(
        "{} Vocabulary saved ({} added, {} removed)",
        style("✓").green(),
        report.diff.added.len(),
        report.diff.removed.len()
    );
    if let Some(order) = &report.synced_order {
        println!("  Category order: {}", order.join(", "));
    }
    print_step("Ingredients", &report.ingredient_cleanup);
    print_step("Templates", &report.template_resync);
    if !report.fully_consistent() {
        println!(
            "{} Some records were left unsynced; re-running the command will repair them.",
            style("!").yellow()
        );
    }
    Ok(())
}

fn print_step(label: &str, step: &StepReport) {
    match step {
        StepReport::Skipped => {}
        StepReport::Completed {
            examined,
            updated,
            failed,
        } => {
            println!(
                "  {}: {} examined, {} updated, {} failed",
                label, examined, updated, failed
            );
        }
        StepReport::Failed(message) => {
            println!("  {}: {} {}", label, style("step failed:").yellow(), message);
        }
    }
}
