use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;

use crate::rollup::Policy;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub housekeeping: HousekeepingConfig,
    pub retention: RetentionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
}

fn default_max_pool_size() -> u32 {
    4
}

#[derive(Debug, Clone, Deserialize)]
pub struct HousekeepingConfig {
    /// Seconds between housekeeping passes (one per sampling tick).
    pub interval_secs: u64,
    /// Documents read from the store per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Optional cron expression for VACUUM (e.g. "0 0 3 * * *" = 03:00 daily). Uses local time.
    #[serde(default)]
    pub vacuum_schedule: Option<String>,
    /// Run VACUUM every N seconds when vacuum_schedule is not set.
    #[serde(default = "default_vacuum_interval_secs")]
    pub vacuum_interval_secs: u64,
}

fn default_page_size() -> usize {
    100
}

fn default_vacuum_interval_secs() -> u64 {
    24 * 3600
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    /// Resolution types, finest first (e.g. ["5minutes", "hour", "day"]).
    pub types: Vec<String>,
    /// Max buckets kept per resolution.
    #[serde(default)]
    pub keep_records: BTreeMap<String, usize>,
    /// Max bucket age in seconds per resolution.
    #[serde(default)]
    pub max_age: BTreeMap<String, u64>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validated rollup policy from the [retention] section.
    pub fn policy(&self) -> anyhow::Result<Policy> {
        Policy::from_names(
            &self.retention.types,
            &self.retention.keep_records,
            &self.retention.max_age,
        )
        .map_err(|e| anyhow::anyhow!("retention: {}", e))
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_pool_size > 0,
            "database.max_pool_size must be > 0, got {}",
            self.database.max_pool_size
        );
        anyhow::ensure!(
            self.housekeeping.interval_secs > 0,
            "housekeeping.interval_secs must be > 0, got {}",
            self.housekeeping.interval_secs
        );
        anyhow::ensure!(
            self.housekeeping.page_size > 0,
            "housekeeping.page_size must be > 0, got {}",
            self.housekeeping.page_size
        );
        anyhow::ensure!(
            self.housekeeping.vacuum_interval_secs > 0,
            "housekeeping.vacuum_interval_secs must be > 0, got {}",
            self.housekeeping.vacuum_interval_secs
        );
        if let Some(ref cron_str) = self.housekeeping.vacuum_schedule {
            cron::Schedule::from_str(cron_str).map_err(|e| {
                anyhow::anyhow!("housekeeping.vacuum_schedule '{}' is invalid: {}", cron_str, e)
            })?;
        }
        self.policy()?;
        Ok(())
    }
}
