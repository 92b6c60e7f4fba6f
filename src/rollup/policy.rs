// Validated rollup/retention policy. Built once from configuration, before any
// document is touched.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Resolution, UnknownResolution};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error(transparent)]
    UnknownResolution(#[from] UnknownResolution),
    #[error("resolution type list is empty")]
    EmptyTypes,
    #[error("resolution type '{0}' is listed more than once")]
    DuplicateType(Resolution),
    #[error("resolution types must be finest first: '{coarser}' is listed before '{finer}'")]
    OutOfOrder {
        coarser: Resolution,
        finer: Resolution,
    },
}

#[derive(Debug, Clone)]
pub struct Policy {
    types: Vec<Resolution>,
    keep_records: BTreeMap<Resolution, usize>,
    max_age: BTreeMap<Resolution, u64>,
}

impl Policy {
    /// `types` must be non-empty and strictly finest first. A resolution missing from
    /// `keep_records` or `max_age` is not pruned by that rule.
    pub fn new(
        types: Vec<Resolution>,
        keep_records: BTreeMap<Resolution, usize>,
        max_age: BTreeMap<Resolution, u64>,
    ) -> Result<Self, PolicyError> {
        if types.is_empty() {
            return Err(PolicyError::EmptyTypes);
        }
        for pair in types.windows(2) {
            if pair[0] == pair[1] {
                return Err(PolicyError::DuplicateType(pair[0]));
            }
            if pair[0] > pair[1] {
                return Err(PolicyError::OutOfOrder {
                    coarser: pair[0],
                    finer: pair[1],
                });
            }
        }
        Ok(Self {
            types,
            keep_records,
            max_age,
        })
    }

    /// Same as [`Policy::new`] but from configuration names (e.g. `"5minutes"`).
    pub fn from_names(
        types: &[String],
        keep_records: &BTreeMap<String, usize>,
        max_age: &BTreeMap<String, u64>,
    ) -> Result<Self, PolicyError> {
        let types = types
            .iter()
            .map(|name| name.parse::<Resolution>())
            .collect::<Result<Vec<Resolution>, _>>()?;
        Self::new(types, parse_keys(keep_records)?, parse_keys(max_age)?)
    }

    /// Resolution types, finest first.
    pub fn types(&self) -> &[Resolution] {
        &self.types
    }

    pub fn keep_records(&self, resolution: Resolution) -> Option<usize> {
        self.keep_records.get(&resolution).copied()
    }

    /// Max age in seconds.
    pub fn max_age(&self, resolution: Resolution) -> Option<u64> {
        self.max_age.get(&resolution).copied()
    }

    /// Every resolution with at least one retention rule.
    pub fn retained_resolutions(&self) -> impl Iterator<Item = Resolution> + '_ {
        self.keep_records
            .keys()
            .chain(self.max_age.keys())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
    }
}

fn parse_keys<V: Copy>(
    map: &BTreeMap<String, V>,
) -> Result<BTreeMap<Resolution, V>, PolicyError> {
    map.iter()
        .map(|(name, value)| Ok((name.parse::<Resolution>()?, *value)))
        .collect()
}
