//! Property-based tests for the order reconciliation operations.
//!
//! These tests use proptest to generate random persisted orders and live
//! sets and verify that the reconciliation invariants hold for all inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::reconcile::{partition, reconcile};
    use proptest::collection::vec;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn dedup(items: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        items.into_iter().filter(|i| seen.insert(i.clone())).collect()
    }

    proptest! {
        /// Property: reconcile output is a permutation of exactly the live set
        #[test]
        fn reconcile_is_permutation_of_live(
            persisted in vec("[a-e]{1,2}", 0..8),
            live in vec("[a-e]{1,2}", 0..8),
        ) {
            let live = dedup(live);
            let result = reconcile(&persisted, &live);
            let mut sorted_result = result.clone();
            sorted_result.sort();
            let mut sorted_live = live.clone();
            sorted_live.sort();
            prop_assert_eq!(sorted_result, sorted_live);
        }

        /// Property: reconcile(reconcile(P, S), S) == reconcile(P, S)
        #[test]
        fn reconcile_is_idempotent(
            persisted in vec("[a-e]{1,2}", 0..8),
            live in vec("[a-e]{1,2}", 0..8),
        ) {
            let live = dedup(live);
            let once = reconcile(&persisted, &live);
            let twice = reconcile(&once, &live);
            prop_assert_eq!(once, twice);
        }

        /// Property: survivors keep their relative persisted order
        #[test]
        fn reconcile_preserves_relative_order(
            persisted in vec("[a-e]{1,2}", 0..8),
            live in vec("[a-e]{1,2}", 0..8),
        ) {
            let persisted = dedup(persisted);
            let live = dedup(live);
            let result = reconcile(&persisted, &live);
            let survivors: Vec<&String> = persisted
                .iter()
                .filter(|p| live.contains(p))
                .collect();
            let in_result: Vec<&String> = result
                .iter()
                .filter(|r| persisted.contains(r))
                .collect();
            prop_assert_eq!(survivors, in_result);
        }

        /// Property: partition's active and orphaned key sets are disjoint
        /// and together cover stored ∪ live
        #[test]
        fn partition_covers_and_separates(
            stored_keys in vec("[a-e]{1,2}", 0..8),
            values in vec(0u32..10, 8),
            live in vec("[a-e]{1,2}", 0..8),
        ) {
            let stored_keys = dedup(stored_keys);
            let live = dedup(live);
            let stored: Vec<(String, u32)> = stored_keys
                .iter()
                .cloned()
                .zip(values.iter().cloned())
                .collect();
            let split = partition(&stored, &live, 0);

            let active_keys: HashSet<&String> =
                split.active.iter().map(|(k, _)| k).collect();
            let orphan_keys: HashSet<&String> =
                split.orphaned.iter().map(|(k, _)| k).collect();
            prop_assert!(active_keys.is_disjoint(&orphan_keys));

            let live_set: HashSet<&String> = live.iter().collect();
            prop_assert_eq!(&active_keys, &live_set);
            for key in &stored_keys {
                prop_assert!(active_keys.contains(key) || orphan_keys.contains(key));
            }
        }
    }
}
