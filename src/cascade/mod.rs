//! Implementation of the taxonomy-change cascade.
//!
//! ## Overview
//!
//! Editing the category vocabulary invalidates three dependent
//! collections, and the cascade repairs them in a fixed sequence:
//!
//! 1. Persist the new vocabulary on the field definition (abort on
//!    validation failure, nothing committed)
//! 2. Resync the stored category display order (category field only)
//! 3. Clear the category of every ingredient left pointing at a removed
//!    category (concurrent fan-out, per-record failures swallowed)
//! 4. Rebuild every bowl template's limit map against the new vocabulary
//!    (concurrent fan-out, same failure semantics)
//!
//! The platform offers no cross-collection transaction, so the cascade is
//! explicitly non-atomic: steps 1–2 committing while parts of steps 3–4
//! fail leaves transient inconsistency that the next successful run heals.
//! Each step's outcome is recorded in a [`CascadeReport`] so callers can
//! see exactly how far a run got.

pub mod ingredients;
pub mod orchestrator;
pub mod templates;

pub use orchestrator::apply_taxonomy_change;

use crate::diff::TaxonomyDiff;

/// Outcome of a single cascade cleanup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepReport {
    /// The step does not apply to this run (non-category field edit).
    Skipped,
    /// The fan-out ran to completion. `failed` counts per-record update
    /// failures, which were logged and swallowed.
    Completed {
        examined: usize,
        updated: usize,
        failed: usize,
    },
    /// The step could not run at all (e.g. its collection was unreadable).
    /// Logged and swallowed; steps 1–2 had already committed.
    Failed(String),
}

impl StepReport {
    /// Per-record failures plus whole-step failure, as a single flag.
    pub fn fully_clean(&self) -> bool {
        match self {
            StepReport::Skipped => true,
            StepReport::Completed { failed, .. } => *failed == 0,
            StepReport::Failed(_) => false,
        }
    }
}

/// Per-step record of one cascade run.
///
/// A report in hand means steps 1–2 committed; inspect the step fields for
/// the best-effort tail.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeReport {
    /// The vocabulary field that was edited.
    pub field_key: String,
    /// Membership delta between the previous and new vocabulary.
    pub diff: TaxonomyDiff,
    /// The category order persisted by step 2, when it ran.
    pub synced_order: Option<Vec<String>>,
    /// Step 3 outcome.
    pub ingredient_cleanup: StepReport,
    /// Step 4 outcome.
    pub template_resync: StepReport,
}

impl CascadeReport {
    /// True when every dependent collection is known to be in sync.
    pub fn fully_consistent(&self) -> bool {
        self.ingredient_cleanup.fully_clean() && self.template_resync.fully_clean()
    }
}
