//! # Templates Command Implementation
//!
//! CRUD over bowl templates. `show` splits a template's stored limit map
//! into active and orphaned entries against the live vocabulary; any
//! write through this command persists the active entries only, which is
//! how orphaned limits eventually disappear.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use bowl_builder::catalog::{
    self, CATEGORY_FIELD, DEFAULT_CURRENCY, INGREDIENT_TYPE, TEMPLATE_TYPE,
};
use bowl_builder::model::{BowlTemplate, Money};
use bowl_builder::reconcile;
use bowl_builder::store::Store;

/// Manage bowl templates
#[derive(Args, Debug)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    command: TemplatesCommand,
}

#[derive(Subcommand, Debug)]
enum TemplatesCommand {
    /// List all templates
    List,
    /// Show one template with active and orphaned limits
    Show {
        /// Record id
        id: String,
    },
    /// Create a template; limits start at 0 for every current category
    Add {
        /// Display name
        name: String,
        /// Description shown to customers
        #[arg(long, default_value = "")]
        description: String,
        /// Base price of the bowl
        #[arg(long, value_name = "AMOUNT", default_value_t = 0.0)]
        base_price: f64,
        /// Free-quota override, repeatable (e.g. --limit Base=2)
        #[arg(long = "limit", value_name = "CATEGORY=N", value_parser = parse_limit)]
        limits: Vec<(String, u32)>,
    },
    /// Set one category's free quota on a template
    SetLimit {
        /// Record id
        id: String,
        /// Category to change
        category: String,
        /// Included units
        limit: u32,
    },
    /// Delete a template
    Delete {
        /// Record id
        id: String,
    },
}

fn parse_limit(raw: &str) -> Result<(String, u32), String> {
    let (category, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=N, got '{}'", raw))?;
    let limit = value
        .parse()
        .map_err(|_| format!("'{}' is not a non-negative integer", value))?;
    Ok((category.to_string(), limit))
}

pub fn execute(args: TemplatesArgs, store_path: Option<PathBuf>) -> Result<()> {
    let store = super::open_store(store_path)?;
    match args.command {
        TemplatesCommand::List => list(&store),
        TemplatesCommand::Show { id } => show(&store, &id),
        TemplatesCommand::Add {
            name,
            description,
            base_price,
            limits,
        } => add(&store, name, description, base_price, limits),
        TemplatesCommand::SetLimit {
            id,
            category,
            limit,
        } => set_limit(&store, &id, &category, limit),
        TemplatesCommand::Delete { id } => {
            store.delete_record(TEMPLATE_TYPE, &id)?;
            println!("{} Deleted {}", style("✓").green(), id);
            Ok(())
        }
    }
}

fn find_template(store: &dyn Store, id: &str) -> Result<BowlTemplate> {
    match catalog::load_templates(store)?.into_iter().find(|t| t.id == id) {
        Some(template) => Ok(template),
        None => bail!("No template with id '{}'", id),
    }
}

fn list(store: &dyn Store) -> Result<()> {
    for template in catalog::load_templates(store)? {
        println!(
            "{}  {}  {}",
            template.id,
            style(&template.name).bold(),
            super::money(template.base_price.amount, &template.base_price.currency_code),
        );
    }
    Ok(())
}

fn show(store: &dyn Store, id: &str) -> Result<()> {
    let template = find_template(store, id)?;
    let live = store.read_field_definition(INGREDIENT_TYPE, CATEGORY_FIELD)?;
    let split = reconcile::partition(&template.limits, &live, 0);

    println!("{} ({})", style(&template.name).bold(), template.id);
    if !template.description.is_empty() {
        println!("{}", template.description);
    }
    println!(
        "Base price: {}",
        super::money(template.base_price.amount, &template.base_price.currency_code)
    );
    println!("{}", style("Limits").bold());
    for (category, limit) in &split.active {
        println!("  {}: {}", category, limit);
    }
    for (category, limit) in &split.orphaned {
        println!(
            "  {}: {} {}",
            category,
            limit,
            style("(orphaned, dropped on next save)").yellow()
        );
    }
    Ok(())
}

fn add(
    store: &dyn Store,
    name: String,
    description: String,
    base_price: f64,
    overrides: Vec<(String, u32)>,
) -> Result<()> {
    let live = store.read_field_definition(INGREDIENT_TYPE, CATEGORY_FIELD)?;
    let limits = live
        .iter()
        .map(|category| {
            let limit = overrides
                .iter()
                .find(|(c, _)| c == category)
                .map(|(_, n)| *n)
                .unwrap_or(0);
            (category.clone(), limit)
        })
        .collect();
    let template = BowlTemplate {
        id: String::new(),
        name,
        description,
        base_price: Money::new(base_price, DEFAULT_CURRENCY),
        limits,
    };
    let outcome = store.create_record(TEMPLATE_TYPE, &catalog::template_fields(&template))?;
    println!(
        "{} Created {} ({})",
        style("✓").green(),
        template.name,
        outcome.id.unwrap_or_default()
    );
    Ok(())
}

fn set_limit(store: &dyn Store, id: &str, category: &str, limit: u32) -> Result<()> {
    let mut template = find_template(store, id)?;
    let live = store.read_field_definition(INGREDIENT_TYPE, CATEGORY_FIELD)?;
    if !live.contains(&category.to_string()) {
        bail!("Unknown category '{}'", category);
    }

    // saving keeps active entries only; orphans drop here
    template.limits = reconcile::partition(&template.limits, &live, 0).active;
    for entry in template.limits.iter_mut() {
        if entry.0 == category {
            entry.1 = limit;
        }
    }
    store.update_record(TEMPLATE_TYPE, id, &catalog::template_fields(&template))?;
    println!("{} {}: {} = {}", style("✓").green(), id, category, limit);
    Ok(())
}
