//! Taxonomy membership diff.
//!
//! Computes which categories an edit adds to and removes from the
//! controlled vocabulary. Pure set difference over the two ordered lists;
//! the outputs carry the enumeration order of their source list but no
//! ordering is guaranteed to callers.

use std::collections::HashSet;

/// Membership delta between two versions of the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaxonomyDiff {
    /// Categories present in the new vocabulary but not the old.
    pub added: Vec<String>,
    /// Categories present in the old vocabulary but not the new.
    pub removed: Vec<String>,
}

impl TaxonomyDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute the added/removed members between an old and a new category
/// list. No side effects, no failure modes.
pub fn diff(old: &[String], new: &[String]) -> TaxonomyDiff {
    let old_set: HashSet<&str> = old.iter().map(String::as_str).collect();
    let new_set: HashSet<&str> = new.iter().map(String::as_str).collect();

    TaxonomyDiff {
        added: new
            .iter()
            .filter(|c| !old_set.contains(c.as_str()))
            .cloned()
            .collect(),
        removed: old
            .iter()
            .filter(|c| !new_set.contains(c.as_str()))
            .cloned()
            .collect(),
    }
}
