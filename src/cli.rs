//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Bowl Builder - Manage the build-your-own-bowl menu and price orders
#[derive(Parser, Debug)]
#[command(name = "bowl-builder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the store state file.
    ///
    /// Defaults to the platform data directory
    /// (`~/.local/share/bowl-builder/store.json` on Linux).
    #[arg(long, global = true, value_name = "FILE", env = "BOWL_BUILDER_STORE")]
    store: Option<PathBuf>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the ingredient category vocabulary (runs the sync cascade)
    Categories(commands::categories::CategoriesArgs),
    /// Manage the allergen vocabulary
    Allergens(commands::allergens::AllergensArgs),
    /// Show or resync the stored display order
    Order(commands::order::OrderArgs),
    /// Manage ingredients
    Ingredients(commands::ingredients::IngredientsArgs),
    /// Manage bowl templates
    Templates(commands::templates::TemplatesArgs),
    /// Price a composed bowl
    Quote(commands::quote::QuoteArgs),
    /// Seed the store with a demo menu
    Init(commands::init::InitArgs),
    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .init();
        match self.color.as_str() {
            "always" => console::set_colors_enabled(true),
            "never" => console::set_colors_enabled(false),
            _ => {}
        }

        let store = self.store;
        match self.command {
            Commands::Categories(args) => commands::categories::execute(args, store),
            Commands::Allergens(args) => commands::allergens::execute(args, store),
            Commands::Order(args) => commands::order::execute(args, store),
            Commands::Ingredients(args) => commands::ingredients::execute(args, store),
            Commands::Templates(args) => commands::templates::execute(args, store),
            Commands::Quote(args) => commands::quote::execute(args, store),
            Commands::Init(args) => commands::init::execute(args, store),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
