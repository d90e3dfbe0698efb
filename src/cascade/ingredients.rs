//! Cascade step 3: ingredient cleanup.
//!
//! Every ingredient whose category is non-empty and no longer part of the
//! vocabulary gets its category cleared to the unassigned state. Updates
//! fan out concurrently; one record failing does not block or roll back
//! its siblings, it is logged and counted only.

use std::collections::HashSet;
use std::sync::Mutex;

use log::warn;
use rayon::prelude::*;

use crate::catalog::INGREDIENT_TYPE;
use crate::error::Result;
use crate::store::Store;

/// Clear the category of every ingredient pointing at a category outside
/// `live`. Returns `(examined, updated, failed)`; `Err` only when the
/// collection itself cannot be read.
pub fn clear_stale_categories(
    store: &dyn Store,
    live: &[String],
) -> Result<(usize, usize, usize)> {
    let live_set: HashSet<&str> = live.iter().map(String::as_str).collect();
    let records = store.read_collection(INGREDIENT_TYPE)?;
    let examined = records.len();

    let stale: Vec<_> = records
        .iter()
        .filter(|record| {
            let category = record.field("category");
            !category.is_empty() && !live_set.contains(category)
        })
        .collect();

    // Fan out concurrently; collect only a failure count. Individual
    // failures self-heal on the next cascade run.
    let failures = Mutex::new(0usize);
    let cleared_fields = [("category".to_string(), String::new())];
    stale.par_iter().for_each(|record| {
        match store.update_record(INGREDIENT_TYPE, &record.id, &cleared_fields) {
            Ok(outcome) if outcome.is_ok() => {}
            Ok(outcome) => {
                warn!(
                    "Ingredient cleanup rejected for {}: {:?}",
                    record.id, outcome.user_errors
                );
                *failures.lock().unwrap() += 1;
            }
            Err(err) => {
                warn!("Ingredient cleanup failed for {}: {}", record.id, err);
                *failures.lock().unwrap() += 1;
            }
        }
    });

    let failed = failures.into_inner().unwrap();
    Ok((examined, stale.len() - failed, failed))
}
