// Retention: trim each series by count, then by age.

use crate::models::{Bucket, UsageDocument};

use super::Policy;

/// Returns the buckets that survive retention, in original order.
///
/// `keep` keeps only the most recent `keep` buckets. `max_age` then drops every bucket
/// whose `end` lies more than `max_age` seconds before `now`.
pub fn prune_series(
    buckets: &[Bucket],
    keep: Option<usize>,
    max_age: Option<u64>,
    now: i64,
) -> Vec<Bucket> {
    let skip = keep.map_or(0, |keep| buckets.len().saturating_sub(keep));
    let cutoff = max_age.map(|age| now.saturating_sub_unsigned(age));
    buckets[skip..]
        .iter()
        .filter(|b| cutoff.is_none_or(|cutoff| b.end >= cutoff))
        .cloned()
        .collect()
}

/// Applies the policy's retention to every configured series. Returns true if any
/// bucket was removed.
pub fn prune_document(doc: &mut UsageDocument, policy: &Policy, now: i64) -> bool {
    let mut changed = false;
    for resolution in policy.retained_resolutions() {
        let Some(series) = doc.series.get_mut(&resolution) else {
            continue;
        };
        let kept = prune_series(
            series,
            policy.keep_records(resolution),
            policy.max_age(resolution),
            now,
        );
        if kept.len() != series.len() {
            *series = kept;
            changed = true;
        }
    }
    changed
}
