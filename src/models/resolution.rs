// Resolution levels of the rollup hierarchy, finest first.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use wincode::{SchemaRead, SchemaWrite};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resolution type '{0}'")]
pub struct UnknownResolution(pub String);

/// One granularity level. Derived ordering is finest-first, so `a < b` means `a` is finer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    SchemaRead,
    SchemaWrite,
)]
pub enum Resolution {
    #[serde(rename = "5minutes")]
    FiveMinutes,
    #[serde(rename = "hour")]
    Hour,
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "year")]
    Year,
}

impl Resolution {
    pub const ALL: [Resolution; 5] = [
        Resolution::FiveMinutes,
        Resolution::Hour,
        Resolution::Day,
        Resolution::Month,
        Resolution::Year,
    ];

    /// Name used in configuration and in the JSON dump.
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::FiveMinutes => "5minutes",
            Resolution::Hour => "hour",
            Resolution::Day => "day",
            Resolution::Month => "month",
            Resolution::Year => "year",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = UnknownResolution;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resolution::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownResolution(s.to_string()))
    }
}
