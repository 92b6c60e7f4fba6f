// Housekeeping runner: one pass over every usage document in the store.
// Documents are independent; a store failure aborts the pass, earlier saves are kept.

use anyhow::Context;
use tracing::{debug, info, instrument};

use crate::rollup::{self, Policy};
use crate::usage_repo::UsageStore;

/// Rolls up and prunes every document, saving only those that changed.
/// Returns the number of documents saved.
#[instrument(skip(store, policy), fields(types = policy.types().len()))]
pub async fn run_housekeeping<S: UsageStore + Sync>(
    store: &S,
    policy: &Policy,
    now: i64,
    page_size: usize,
) -> anyhow::Result<u64> {
    let page_size = page_size.max(1);
    let mut after: Option<String> = None;
    let mut scanned: u64 = 0;
    let mut modified: u64 = 0;

    loop {
        let page = store
            .find_page(after.as_deref(), page_size)
            .await
            .context("reading usage documents")?;
        let Some(last) = page.last() else {
            break;
        };
        after = Some(last.entity.clone());

        for mut doc in page {
            scanned += 1;
            if rollup::housekeep_document(&mut doc, policy, now) {
                store
                    .save(&doc)
                    .await
                    .with_context(|| format!("saving usage document {}", doc.entity))?;
                debug!(entity = %doc.entity, "usage document updated");
                modified += 1;
            }
        }
    }

    info!(scanned, modified, "housekeeping pass complete");
    Ok(modified)
}
