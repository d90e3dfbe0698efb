//! # Quote Command Implementation
//!
//! Runs the customer calculator from the command line: pick a template,
//! add units, print the order summary. The menu comes from the store by
//! default, or from a host-page payload file via `--payload`, which
//! exercises the same ingestion path the storefront uses (including its
//! stay-inert-on-malformed-input behaviour).

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use console::style;

use bowl_builder::calculator::{totals, Menu, SelectionState, Settings};
use bowl_builder::catalog;

/// Price a composed bowl
#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Template to build on
    #[arg(long, value_name = "ID")]
    template: String,

    /// Selected units, repeatable (e.g. --add rice=3)
    #[arg(long = "add", value_name = "INGREDIENT=QTY", value_parser = parse_selection)]
    selections: Vec<(String, u32)>,

    /// Read the menu from a host-page JSON payload instead of the store
    #[arg(long, value_name = "FILE")]
    payload: Option<PathBuf>,
}

fn parse_selection(raw: &str) -> Result<(String, u32), String> {
    let (id, qty) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected INGREDIENT=QTY, got '{}'", raw))?;
    let quantity = qty
        .parse()
        .map_err(|_| format!("'{}' is not a non-negative integer", qty))?;
    Ok((id.to_string(), quantity))
}

pub fn execute(args: QuoteArgs, store_path: Option<PathBuf>) -> Result<()> {
    let menu = match &args.payload {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            match Menu::from_json(&raw) {
                Some(menu) => menu,
                None => {
                    // degraded storefront behaviour: no menu, no error
                    println!("Menu unavailable; nothing to quote.");
                    return Ok(());
                }
            }
        }
        None => {
            let store = super::open_store(store_path)?;
            let templates = catalog::load_templates(&store)?;
            let ingredients = catalog::load_ingredients(&store)?;
            let order = catalog::load_order_record(&store)?;
            let arranged = catalog::arrange_ingredients(&ingredients, &order);
            Menu::new(templates, arranged, order.category_order, Settings::default())
        }
    };

    let mut state = SelectionState::new();
    state.select_template(&menu, &args.template);
    if state.template.is_none() {
        bail!("No template with id '{}'", args.template);
    }
    for (id, quantity) in &args.selections {
        if menu.ingredient(id).is_none() {
            bail!("No ingredient with id '{}'", id);
        }
        for _ in 0..*quantity {
            state.add_unit(&menu, id);
        }
    }

    let summary = totals::compute(&menu, &state).expect("template was just selected");
    render(&menu, &summary);
    Ok(())
}

fn render(menu: &Menu, summary: &totals::OrderSummary) {
    let currency = summary.currency_code.as_str();
    println!(
        "{}",
        style(menu.settings.text("orderSummaryText", "Order summary")).bold()
    );
    println!(
        "  {}  {}",
        summary.template_name,
        super::money(summary.base_price, currency)
    );
    for line in &summary.lines {
        if line.extra_quantity > 0 {
            println!(
                "  {} x{}  {} extra, +{}",
                line.name,
                line.quantity,
                line.extra_quantity,
                super::money(line.extra_charge, currency)
            );
        } else {
            println!("  {} x{}", line.name, line.quantity);
        }
    }
    println!(
        "  {}: {} kcal, {} g protein, {} g carbs, {} g fat",
        menu.settings.text("nutritionText", "Nutrition"),
        summary.totals.calories,
        summary.totals.protein,
        summary.totals.carbs,
        summary.totals.fat
    );
    if summary.totals.extra_price > 0.0 {
        println!(
            "  {}: {}",
            menu.settings.text("extrasText", "Extras"),
            super::money(summary.totals.extra_price, currency)
        );
    }
    println!(
        "  {}: {}",
        style(menu.settings.text("totalText", "Total")).bold(),
        style(super::money(summary.totals.total_price, currency)).bold()
    );
}
