//! # CLI Command Implementations
//!
//! One module per subcommand of the `bowl-builder` tool. Each module
//! defines a clap `Args` struct and an `execute` function that calls into
//! the library for the actual logic; the modules here only parse, open
//! the store, and render.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use bowl_builder::store::JsonFileStore;

pub mod allergens;
pub mod categories;
pub mod completions;
pub mod ingredients;
pub mod init;
pub mod order;
pub mod quote;
pub mod templates;

/// Open the file-backed store at the given path, or the default platform
/// location when none is given.
pub fn open_store(path: Option<PathBuf>) -> Result<JsonFileStore> {
    let path = match path {
        Some(path) => path,
        None => JsonFileStore::default_path()
            .ok_or_else(|| anyhow!("No data directory available; pass --store"))?,
    };
    JsonFileStore::open(&path).map_err(|e| anyhow!("Failed to open store {}: {}", path.display(), e))
}

/// Format a money amount for display.
pub fn money(amount: f64, currency_code: &str) -> String {
    let symbol = match currency_code {
        "EUR" => "€",
        "USD" => "$",
        "GBP" => "£",
        other => return format!("{:.2} {}", amount, other),
    };
    format!("{}{:.2}", symbol, amount)
}
