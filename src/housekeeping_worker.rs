// Background worker: one housekeeping pass every interval_secs (rollup + retention).
// VACUUM shares the same select loop; its deadline comes from a cron expression or a
// fixed interval.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::time::Instant;

use crate::housekeeping::run_housekeeping;
use crate::rollup::Policy;
use crate::usage_repo::UsageRepo;
use tracing::{info, instrument, warn};

/// Config for the housekeeping worker.
#[derive(Debug, Clone)]
pub struct HousekeepingWorkerConfig {
    pub interval_secs: u64,
    pub page_size: usize,
    /// Optional cron expression for VACUUM (e.g. "0 0 3 * * *" = 03:00 daily). Uses local time.
    pub vacuum_schedule: Option<String>,
    /// Run VACUUM every N seconds when vacuum_schedule is not set.
    pub vacuum_interval_secs: u64,
}

impl From<&crate::config::HousekeepingConfig> for HousekeepingWorkerConfig {
    fn from(c: &crate::config::HousekeepingConfig) -> Self {
        Self {
            interval_secs: c.interval_secs,
            page_size: c.page_size,
            vacuum_schedule: c.vacuum_schedule.clone(),
            vacuum_interval_secs: c.vacuum_interval_secs,
        }
    }
}

/// Spawns the housekeeping worker. Returns a join handle.
pub fn spawn(
    repo: Arc<UsageRepo>,
    policy: Arc<Policy>,
    config: HousekeepingWorkerConfig,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        run(repo, policy, config, shutdown_rx).await;
    })
}

/// When the next VACUUM is due.
#[derive(Debug, Clone)]
pub enum VacuumSchedule {
    /// Cron expression, evaluated in local time.
    Cron(cron::Schedule),
    Every(Duration),
}

impl VacuumSchedule {
    pub fn from_config(config: &HousekeepingWorkerConfig) -> anyhow::Result<Self> {
        match config.vacuum_schedule {
            Some(ref cron_str) => cron::Schedule::from_str(cron_str)
                .map(VacuumSchedule::Cron)
                .map_err(|e| anyhow::anyhow!("vacuum_schedule '{}': {}", cron_str, e)),
            None => Ok(VacuumSchedule::Every(Duration::from_secs(
                config.vacuum_interval_secs,
            ))),
        }
    }

    /// Delay from `now` until the next VACUUM. None if the cron expression never fires again.
    pub fn next_delay(&self, now: DateTime<Local>) -> Option<Duration> {
        match self {
            VacuumSchedule::Cron(schedule) => schedule
                .after(&now)
                .next()
                .map(|next| (next - now).to_std().unwrap_or(Duration::from_secs(1))),
            VacuumSchedule::Every(interval) => Some(*interval),
        }
    }
}

fn next_vacuum_at(schedule: Option<&VacuumSchedule>) -> Option<Instant> {
    schedule
        .and_then(|s| s.next_delay(Local::now()))
        .map(|delay| Instant::now() + delay)
}

#[instrument(skip(repo, policy, shutdown_rx), fields(interval_secs = config.interval_secs))]
async fn run(
    repo: Arc<UsageRepo>,
    policy: Arc<Policy>,
    config: HousekeepingWorkerConfig,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) {
    let mut tick = tokio::time::interval(Duration::from_secs(config.interval_secs));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let vacuum = match VacuumSchedule::from_config(&config) {
        Ok(schedule) => Some(schedule),
        Err(e) => {
            warn!(error = %format!("{:#}", e), "VACUUM disabled");
            None
        }
    };
    let mut vacuum_at = next_vacuum_at(vacuum.as_ref());

    loop {
        let vacuum_due = async move {
            match vacuum_at {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            _ = tick.tick() => {
                if let Err(e) = run_one_tick(&repo, &policy, &config).await {
                    warn!(error = %format!("{:#}", e), "housekeeping tick failed");
                }
            }
            _ = vacuum_due => {
                match repo.vacuum().await {
                    Ok(()) => info!("vacuum complete"),
                    Err(e) => warn!(error = %format!("{:#}", e), "vacuum failed"),
                }
                vacuum_at = next_vacuum_at(vacuum.as_ref());
            }
            _ = &mut shutdown_rx => {
                info!("housekeeping worker stopping");
                break;
            }
        }
    }
}

/// Runs one housekeeping pass with `now` from the UTC clock. Used by the worker loop and `--once`.
pub async fn run_one_tick(
    repo: &UsageRepo,
    policy: &Policy,
    config: &HousekeepingWorkerConfig,
) -> anyhow::Result<u64> {
    let now = chrono::Utc::now().timestamp();
    run_housekeeping(repo, policy, now, config.page_size).await
}
