// Per-entity usage document: one bucket series per resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

use super::{Bucket, Resolution};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
pub struct UsageDocument {
    /// Store identity (VM, user, ...). Opaque to the engine.
    pub entity: String,
    pub series: BTreeMap<Resolution, Vec<Bucket>>,
}

impl UsageDocument {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            series: BTreeMap::new(),
        }
    }

    /// Buckets for `resolution`, empty if the series was never written.
    pub fn buckets(&self, resolution: Resolution) -> &[Bucket] {
        self.series
            .get(&resolution)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
