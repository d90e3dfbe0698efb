//! Overflow allocation: free quota vs billable extras.
//!
//! Selected units of a category are linearised in the category's canonical
//! ingredient order, each ingredient contributing a run of `quantity`
//! consecutive units. Walking that sequence, the first `limit` units are
//! free and everything after is extra.
//!
//! The canonical order is the catalog's enumeration order, *not* the
//! customer's click sequence: which specific units get billed as extra can
//! change when the catalog order changes, even for identical selections.
//! That matches the shipped storefront behaviour and is kept intentionally.

use std::collections::HashMap;

/// Number of each ingredient's units falling outside the free quota.
///
/// `selected` carries `(ingredient_id, quantity)` pairs already in the
/// category's canonical order. Pure function of its inputs; quantities of
/// zero contribute nothing.
pub fn extra_quantities(limit: u32, selected: &[(String, u32)]) -> HashMap<String, u32> {
    let mut extras = HashMap::with_capacity(selected.len());
    let mut position = 0u32;

    for (id, quantity) in selected {
        let start = position;
        position += quantity;
        // units of this run occupy positions start+1..=position; those
        // past the limit are billable
        let extra = position.saturating_sub(limit.max(start));
        if *quantity > 0 {
            extras.insert(id.clone(), extra);
        }
    }
    extras
}

/// Total selected units across a category's selection.
pub fn total_units(selected: &[(String, u32)]) -> u32 {
    selected.iter().map(|(_, q)| q).sum()
}
