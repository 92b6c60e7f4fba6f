// Fold a run of finer buckets into one coarser bucket using the per-field rule table.

use crate::models::{Bucket, CombineRule, Usage, UsageField};

/// Combines `buckets` into a bucket covering `[begin, end)`.
///
/// The caller picks the run; coverage of the interval is not checked here. Averaged
/// fields are weighted by each bucket's sample count. When the total sample count is
/// zero (including empty input) averaged fields fall back to the unweighted sum.
pub fn combine(buckets: &[Bucket], begin: i64, end: i64) -> Bucket {
    let sample_count: u64 = buckets.iter().map(|b| b.sample_count).sum();
    let mut usage = Usage::default();

    for field in UsageField::ALL {
        *usage.get_mut(field) = match field.rule() {
            CombineRule::Average if sample_count > 0 => {
                let weighted: f64 = buckets
                    .iter()
                    .map(|b| b.usage.get(field) * b.sample_count as f64)
                    .sum();
                weighted / sample_count as f64
            }
            CombineRule::Average | CombineRule::Sum => {
                buckets.iter().map(|b| b.usage.get(field)).sum()
            }
        };
    }

    Bucket {
        begin,
        end,
        sample_count,
        usage,
    }
}
