// Shared test helpers
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use housekeeper::models::*;
use housekeeper::rollup::Policy;
use housekeeper::usage_repo::UsageStore;

pub fn bucket(begin: i64, end: i64, sample_count: u64, memory: f64) -> Bucket {
    Bucket {
        begin,
        end,
        sample_count,
        usage: Usage {
            memory,
            ..Usage::default()
        },
    }
}

/// Contiguous five-minute buckets over [from, to), one sample each.
pub fn five_minute_series(from: i64, to: i64, memory: f64) -> Vec<Bucket> {
    (from..to)
        .step_by(300)
        .map(|begin| bucket(begin, begin + 300, 1, memory))
        .collect()
}

pub fn document(entity: &str, resolution: Resolution, buckets: Vec<Bucket>) -> UsageDocument {
    let mut doc = UsageDocument::new(entity);
    doc.series.insert(resolution, buckets);
    doc
}

pub fn policy(types: &[Resolution]) -> Policy {
    Policy::new(types.to_vec(), BTreeMap::new(), BTreeMap::new()).unwrap()
}

/// In-memory store; `fail_save_on` makes saving that entity fail.
#[derive(Default)]
pub struct MemoryStore {
    pub docs: Mutex<BTreeMap<String, UsageDocument>>,
    pub saves: Mutex<Vec<String>>,
    pub fail_save_on: Option<String>,
}

impl MemoryStore {
    pub fn with_docs(docs: Vec<UsageDocument>) -> Self {
        let store = Self::default();
        {
            let mut map = store.docs.lock().unwrap();
            for doc in docs {
                map.insert(doc.entity.clone(), doc);
            }
        }
        store
    }

    pub fn get(&self, entity: &str) -> Option<UsageDocument> {
        self.docs.lock().unwrap().get(entity).cloned()
    }
}

impl UsageStore for MemoryStore {
    async fn find_page(
        &self,
        after: Option<&str>,
        limit: usize,
    ) -> anyhow::Result<Vec<UsageDocument>> {
        let docs = self.docs.lock().unwrap();
        Ok(docs
            .values()
            .filter(|d| after.is_none_or(|after| d.entity.as_str() > after))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn save(&self, doc: &UsageDocument) -> anyhow::Result<()> {
        if self.fail_save_on.as_deref() == Some(doc.entity.as_str()) {
            anyhow::bail!("disk full");
        }
        self.saves.lock().unwrap().push(doc.entity.clone());
        self.docs
            .lock()
            .unwrap()
            .insert(doc.entity.clone(), doc.clone());
        Ok(())
    }
}
