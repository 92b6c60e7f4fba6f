// Rollup/retention engine. Pure: no I/O, `now` is injected by the caller.
// Store access lives in usage_repo; the per-tick loop lives in housekeeping.

pub mod calendar;
pub mod combine;
pub mod driver;
mod policy;
pub mod retention;

pub use policy::{Policy, PolicyError};

use crate::models::UsageDocument;

/// Rolls every non-finest series up from the level below it, in policy order.
/// Returns the total number of buckets appended.
pub fn roll_up_document(doc: &mut UsageDocument, policy: &Policy, now: i64) -> usize {
    let mut appended = 0;
    for pair in policy.types().windows(2) {
        let (finer, coarser) = (pair[0], pair[1]);
        let mut coarse = doc.series.remove(&coarser).unwrap_or_default();
        appended += driver::roll_up(&mut coarse, doc.buckets(finer), coarser, now);
        if !coarse.is_empty() {
            doc.series.insert(coarser, coarse);
        }
    }
    appended
}

/// One housekeeping step for a single document: roll up, then prune.
/// Returns true if the document changed and needs saving.
pub fn housekeep_document(doc: &mut UsageDocument, policy: &Policy, now: i64) -> bool {
    let appended = roll_up_document(doc, policy, now);
    let pruned = retention::prune_document(doc, policy, now);
    appended > 0 || pruned
}
