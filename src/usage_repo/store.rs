// Store contract the housekeeping runner depends on.

use std::future::Future;

use crate::models::UsageDocument;

/// Document store holding one usage document per entity.
pub trait UsageStore {
    /// Up to `limit` documents with entity strictly greater than `after`, ordered by
    /// entity. `None` starts from the beginning; an empty page means iteration is done.
    fn find_page(
        &self,
        after: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = anyhow::Result<Vec<UsageDocument>>> + Send;

    /// Replaces the stored state of `doc.entity`.
    fn save(&self, doc: &UsageDocument) -> impl Future<Output = anyhow::Result<()>> + Send;
}
