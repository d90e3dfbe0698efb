//! # Bowl Builder Library
//!
//! Core functionality for a build-your-own-bowl menu configurator: the
//! admin-side taxonomy maintenance and the customer-side order calculator.
//! It is designed to be used by the `bowl-builder` command-line tool but
//! can also back any host surface that can speak the store interface.
//!
//! ## Quick Example
//!
//! ```
//! use bowl_builder::calculator::{totals, Menu, SelectionState};
//!
//! let menu = Menu::from_json(r#"{
//!     "bowlTemplates": [
//!         {"id": "t1", "name": "Classic", "basePrice": 5.0, "limits": {"Base": 2}}
//!     ],
//!     "ingredients": [
//!         {"id": "rice", "name": "Rice", "category": "Base", "extraPrice": 0.75}
//!     ],
//!     "categoryOrder": ["Base"]
//! }"#).unwrap();
//!
//! let mut state = SelectionState::new();
//! state.select_template(&menu, "t1");
//! for _ in 0..3 {
//!     state.add_unit(&menu, "rice");
//! }
//!
//! // two units are free, the third is billed as an extra
//! let summary = totals::compute(&menu, &state).unwrap();
//! assert_eq!(summary.totals.total_price, 5.75);
//! ```
//!
//! ## Core Concepts
//!
//! - **Store (`store`)**: the external persistence platform as a trait:
//!   stringly-typed records, field-definition vocabularies, and the
//!   shop-level ordering state. Ships with in-memory and file-backed
//!   implementations.
//! - **Codec (`codec`)**: the only place the platform's JSON-in-string
//!   field encoding is handled; decoding never fails, it defaults.
//! - **Model & Catalog (`model`, `catalog`)**: typed domain records and
//!   the field mapping between them and raw store records.
//! - **Diff & Reconcile (`diff`, `reconcile`)**: the pure algorithms that
//!   keep persisted orderings and mappings consistent with the live
//!   taxonomy.
//! - **Cascade (`cascade`)**: the fixed-sequence, non-atomic propagation
//!   of a vocabulary change across the dependent collections.
//! - **Calculator (`calculator`)**: the storefront state machine, overflow
//!   allocation and pricing totals.
//!
//! ## Execution Flow
//!
//! An operator edit to the category vocabulary runs through
//! `cascade::apply_taxonomy_change`:
//!
//! 1.  **Persist** the new vocabulary (abort on validation failure).
//! 2.  **Resync** the stored category display order.
//! 3.  **Clean up** ingredients left pointing at removed categories.
//! 4.  **Rebuild** every template's per-category limits.
//!
//! Steps 3 and 4 fan out concurrently and are best-effort: partial
//! failures are logged, reported, and repaired by the next run. On the
//! storefront, customer selections flow through `calculator::SelectionState`
//! into `calculator::totals::compute` for rendering.

pub mod calculator;
pub mod cascade;
pub mod catalog;
pub mod codec;
pub mod diff;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod store;

#[cfg(test)]
mod reconcile_proptest;
