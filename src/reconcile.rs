//! # Order Reconciliation
//!
//! A persisted display order drifts from reality whenever the underlying
//! collection changes: categories get removed from the vocabulary while the
//! stored order still lists them, new categories appear that the order has
//! never seen. The same drift happens to per-category ingredient sequences
//! and to the category-keyed limit maps on bowl templates.
//!
//! [`reconcile`] is the general repair: keep the persisted sequence's
//! survivors in their existing relative order, then append the live
//! newcomers in the live set's own enumeration order. The result is always
//! a permutation of exactly the live set, and re-running on its own output
//! changes nothing.
//!
//! [`partition`] is the sibling operation for a stored *mapping*: split its
//! keys against the live set into active and orphaned groups, filling
//! values for newly live keys from a caller default.

use std::collections::HashSet;
use std::hash::Hash;

use crate::model::{Ingredient, OrderRecord};

/// Merge a persisted ordered sequence against the live identifier set.
///
/// Members of `persisted` still in `live` keep their relative order;
/// members of `live` missing from `persisted` are appended in `live`'s
/// enumeration order. Duplicates in either input collapse to the first
/// occurrence. Deterministic and idempotent.
pub fn reconcile<T>(persisted: &[T], live: &[T]) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let live_set: HashSet<&T> = live.iter().collect();
    let mut result: Vec<T> = Vec::with_capacity(live.len());
    let mut taken: HashSet<&T> = HashSet::with_capacity(live.len());

    for item in persisted {
        if live_set.contains(item) && taken.insert(item) {
            result.push(item.clone());
        }
    }
    for item in live {
        if taken.insert(item) {
            result.push(item.clone());
        }
    }
    result
}

/// Result of splitting a stored mapping against the live key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitioned<T, V> {
    /// Live keys with their values: stored members first, in stored
    /// discovery order, then newly live keys carrying the default value.
    pub active: Vec<(T, V)>,
    /// Stored keys no longer live, values preserved.
    pub orphaned: Vec<(T, V)>,
}

/// Partition a stored `(key, value)` mapping against the live key set.
///
/// Keys in both go to `active` keeping their stored discovery order; live
/// keys absent from the store are appended to `active` with `default`;
/// stored keys absent from `live` go to `orphaned` with their stored value.
pub fn partition<T, V>(stored: &[(T, V)], live: &[T], default: V) -> Partitioned<T, V>
where
    T: Eq + Hash + Clone,
    V: Clone,
{
    let live_set: HashSet<&T> = live.iter().collect();
    let mut active = Vec::with_capacity(live.len());
    let mut orphaned = Vec::new();
    let mut seen: HashSet<&T> = HashSet::with_capacity(stored.len());

    for (key, value) in stored {
        if !seen.insert(key) {
            continue;
        }
        if live_set.contains(key) {
            active.push((key.clone(), value.clone()));
        } else {
            orphaned.push((key.clone(), value.clone()));
        }
    }
    for key in live {
        if seen.insert(key) {
            active.push((key.clone(), default.clone()));
        }
    }

    Partitioned { active, orphaned }
}

/// Reconcile the stored per-category ingredient sequences against the
/// catalog: one [`reconcile`] per category of `category_order`, with the
/// live set being the catalog's ingredients of that category in catalog
/// enumeration order. Categories without a stored sequence get one.
pub fn sync_ingredient_order(stored: &OrderRecord, ingredients: &[Ingredient]) -> OrderRecord {
    let ingredient_order = stored
        .category_order
        .iter()
        .map(|category| {
            let live: Vec<String> = ingredients
                .iter()
                .filter(|i| &i.category == category)
                .map(|i| i.id.clone())
                .collect();
            let merged = reconcile(stored.ingredients_for(category), &live);
            (category.clone(), merged)
        })
        .collect();

    OrderRecord {
        category_order: stored.category_order.clone(),
        ingredient_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Money, Nutrition};

    fn seq(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reconcile_drops_stale_appends_new() {
        let result = reconcile(&seq(&["A", "B", "C"]), &seq(&["A", "C", "D"]));
        assert_eq!(result, seq(&["A", "C", "D"]));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let persisted = seq(&["C", "A", "X"]);
        let live = seq(&["A", "B", "C"]);
        let once = reconcile(&persisted, &live);
        let twice = reconcile(&once, &live);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reconcile_empty_persisted_takes_live_order() {
        let result = reconcile(&[], &seq(&["B", "A"]));
        assert_eq!(result, seq(&["B", "A"]));
    }

    #[test]
    fn test_reconcile_result_is_permutation_of_live() {
        let result = reconcile(&seq(&["Z", "B"]), &seq(&["A", "B", "C"]));
        let mut sorted = result.clone();
        sorted.sort();
        assert_eq!(sorted, seq(&["A", "B", "C"]));
    }

    #[test]
    fn test_partition_splits_and_defaults() {
        let stored = vec![("A".to_string(), 1u32), ("B".to_string(), 2)];
        let live = seq(&["A", "C"]);
        let split = partition(&stored, &live, 0);
        assert_eq!(
            split.active,
            vec![("A".to_string(), 1), ("C".to_string(), 0)]
        );
        assert_eq!(split.orphaned, vec![("B".to_string(), 2)]);
    }

    #[test]
    fn test_partition_keeps_stored_discovery_order() {
        let stored = vec![
            ("Topping".to_string(), 3u32),
            ("Base".to_string(), 2),
        ];
        let live = seq(&["Base", "Topping", "Protein"]);
        let split = partition(&stored, &live, 0);
        // stored members lead in discovery order, newcomer appended
        assert_eq!(
            split.active,
            vec![
                ("Topping".to_string(), 3),
                ("Base".to_string(), 2),
                ("Protein".to_string(), 0),
            ]
        );
        assert!(split.orphaned.is_empty());
    }

    fn ingredient(id: &str, category: &str) -> Ingredient {
        Ingredient {
            id: id.to_string(),
            name: id.to_string(),
            category: category.to_string(),
            allergens: vec![],
            nutrition: Nutrition::default(),
            extra_price: Money::zero("EUR"),
        }
    }

    #[test]
    fn test_sync_ingredient_order_per_category() {
        let stored = OrderRecord {
            category_order: seq(&["Base", "Protein"]),
            ingredient_order: vec![("Base".to_string(), seq(&["quinoa", "gone", "rice"]))],
        };
        let catalog = vec![
            ingredient("rice", "Base"),
            ingredient("quinoa", "Base"),
            ingredient("couscous", "Base"),
            ingredient("tofu", "Protein"),
        ];
        let synced = sync_ingredient_order(&stored, &catalog);
        assert_eq!(synced.category_order, seq(&["Base", "Protein"]));
        // stale id dropped, survivors keep order, newcomer appended
        assert_eq!(
            synced.ingredients_for("Base"),
            ["quinoa", "rice", "couscous"]
        );
        // category without a stored sequence gets the catalog order
        assert_eq!(synced.ingredients_for("Protein"), ["tofu"]);
    }
}
