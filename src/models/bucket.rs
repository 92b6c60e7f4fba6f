// One aggregated usage record over a half-open interval [begin, end).

use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

/// How a usage field is folded when finer buckets are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineRule {
    /// Sample-count weighted mean.
    Average,
    /// Plain sum.
    Sum,
}

/// The fixed set of usage metrics carried by every bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageField {
    Memory,
    Disk,
    Traffic,
    Cpu,
}

impl UsageField {
    pub const ALL: [UsageField; 4] = [
        UsageField::Memory,
        UsageField::Disk,
        UsageField::Traffic,
        UsageField::Cpu,
    ];

    /// Rule table: gauges are averaged, counters are summed.
    pub fn rule(self) -> CombineRule {
        match self {
            UsageField::Memory | UsageField::Disk => CombineRule::Average,
            UsageField::Traffic | UsageField::Cpu => CombineRule::Sum,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
pub struct Usage {
    pub memory: f64,
    pub disk: f64,
    pub traffic: f64,
    pub cpu: f64,
}

impl Usage {
    pub fn get(&self, field: UsageField) -> f64 {
        match field {
            UsageField::Memory => self.memory,
            UsageField::Disk => self.disk,
            UsageField::Traffic => self.traffic,
            UsageField::Cpu => self.cpu,
        }
    }

    pub fn get_mut(&mut self, field: UsageField) -> &mut f64 {
        match field {
            UsageField::Memory => &mut self.memory,
            UsageField::Disk => &mut self.disk,
            UsageField::Traffic => &mut self.traffic,
            UsageField::Cpu => &mut self.cpu,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Epoch seconds, inclusive.
    pub begin: i64,
    /// Epoch seconds, exclusive; aligned to the bucket's resolution.
    pub end: i64,
    /// Number of finest-grain samples folded into this bucket.
    pub sample_count: u64,
    pub usage: Usage,
}
