//! Cascade step 4: bowl template limit resync.
//!
//! Each template's limit map is rebuilt against the new vocabulary: live
//! categories keep their existing limit or start at 0, orphaned keys are
//! dropped. Every template is rewritten, concurrently, with the same
//! per-record failure swallowing as the ingredient cleanup.

use std::sync::Mutex;

use log::warn;
use rayon::prelude::*;

use crate::catalog::TEMPLATE_TYPE;
use crate::codec;
use crate::error::Result;
use crate::store::Store;

/// Rebuild a stored limit map against the live vocabulary: one entry per
/// live category, existing values preserved, newcomers at 0, everything
/// else dropped.
pub fn rebuild_limits(stored: &[(String, u32)], live: &[String]) -> Vec<(String, u32)> {
    live.iter()
        .map(|category| {
            let limit = stored
                .iter()
                .find(|(c, _)| c == category)
                .map(|(_, n)| *n)
                .unwrap_or(0);
            (category.clone(), limit)
        })
        .collect()
}

/// Resync every template's limits to `live`. Returns
/// `(examined, updated, failed)`; `Err` only when the collection itself
/// cannot be read.
pub fn resync_limits(store: &dyn Store, live: &[String]) -> Result<(usize, usize, usize)> {
    let records = store.read_collection(TEMPLATE_TYPE)?;
    let examined = records.len();

    let failures = Mutex::new(0usize);
    records.par_iter().for_each(|record| {
        let stored = codec::decode_limit_map(record.field("category_limits"), "category_limits");
        let rebuilt = rebuild_limits(&stored, live);
        let fields = [(
            "category_limits".to_string(),
            codec::encode_limit_map(&rebuilt),
        )];
        match store.update_record(TEMPLATE_TYPE, &record.id, &fields) {
            Ok(outcome) if outcome.is_ok() => {}
            Ok(outcome) => {
                warn!(
                    "Template limit resync rejected for {}: {:?}",
                    record.id, outcome.user_errors
                );
                *failures.lock().unwrap() += 1;
            }
            Err(err) => {
                warn!("Template limit resync failed for {}: {}", record.id, err);
                *failures.lock().unwrap() += 1;
            }
        }
    });

    let failed = failures.into_inner().unwrap();
    Ok((examined, examined - failed, failed))
}
