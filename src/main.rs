use anyhow::Result;
use housekeeper::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let run_once = std::env::args().skip(1).any(|a| a == "--once");

    // Policy errors surface here, before any document is read.
    let app_config = config::AppConfig::load()?;
    let policy = Arc::new(app_config.policy()?);
    let worker_config = housekeeping_worker::HousekeepingWorkerConfig::from(&app_config.housekeeping);

    let usage_repo = Arc::new(
        usage_repo::UsageRepo::connect(
            &app_config.database.path,
            app_config.database.max_pool_size,
        )
        .await?,
    );
    usage_repo.init().await?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        db = %app_config.database.path,
        types = ?policy.types(),
        "housekeeper starting"
    );

    if run_once {
        let modified =
            housekeeping_worker::run_one_tick(&usage_repo, &policy, &worker_config).await?;
        println!("{}", modified);
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = housekeeping_worker::spawn(usage_repo, policy, worker_config, shutdown_rx);

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    let _ = worker_handle.await;
    Ok(())
}
