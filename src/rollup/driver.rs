// Rollup driver: extend a coarse series from the finer series below it.

use tracing::debug;

use super::calendar::{aligned_boundary, next_boundary, previous_boundary};
use super::combine::combine;
use crate::models::{Bucket, Resolution};

/// Appends every complete `resolution` bucket that `finer` can fill up to `now`.
/// Returns the number of buckets appended.
///
/// An empty `coarse` series starts one unit before the current aligned boundary.
/// The loop stops as soon as the finer data does not reach the end of the next
/// interval; the next invocation picks up from `coarse.last().end`. Existing buckets
/// are never touched, so re-running with unchanged input appends nothing.
///
/// Readiness is judged only by how far the finer series reaches. Finer buckets missing
/// inside an interval (collection outages, a series that starts mid-interval) are not
/// waited for: the coarse bucket folds whatever lies in `[begin, end)` and its
/// `sample_count` reflects only those samples.
pub fn roll_up(coarse: &mut Vec<Bucket>, finer: &[Bucket], resolution: Resolution, now: i64) -> usize {
    let mut begin = match coarse.last() {
        Some(last) => last.end,
        None => previous_boundary(aligned_boundary(now, resolution), resolution),
    };
    let mut end = next_boundary(begin, resolution);

    let Some(reach) = finer.last().map(|b| b.end) else {
        return 0;
    };
    // Forward-only cursor: finer buckets before it are already folded into `coarse`.
    let mut cursor = finer.partition_point(|b| b.begin < begin);
    let mut appended = 0;

    while end <= now && end > begin {
        if reach < end {
            debug!(%resolution, begin, end, reach, "finer data incomplete, rollup blocked");
            break;
        }
        let start = cursor;
        while cursor < finer.len() && finer[cursor].end <= end {
            cursor += 1;
        }
        // Partial or empty runs still yield a bucket so `coarse` stays contiguous.
        coarse.push(combine(&finer[start..cursor], begin, end));
        appended += 1;
        begin = end;
        end = next_boundary(end, resolution);
    }

    appended
}
