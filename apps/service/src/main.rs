mod config;
mod database;
mod monitoring;
mod pool;
mod validation;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use uptime::{
    CheckCycle, HttpProber, InMemoryReportCache, LogNotifier, Notifier, ScanStore, WebhookNotifier,
};

use config::{Channel, Config};
use database::LibsqlScanStore;
use monitoring::{MonitoringScheduler, ScheduledTarget};

/// Website uptime monitor
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Run one check cycle for every target and exit
    #[arg(long)]
    once: bool,
}

fn build_notifier(config: &Config) -> Result<Arc<dyn Notifier>> {
    match config.notifications.channel {
        Channel::Log => Ok(Arc::new(LogNotifier)),
        Channel::Webhook => {
            let url = config
                .notifications
                .webhook_url
                .clone()
                .context("notifications.webhook_url is required for the webhook channel")?;
            Ok(Arc::new(WebhookNotifier::with_timeouts(
                url,
                Duration::from_secs(config.notifications.timeout_seconds),
                Duration::from_secs(config.notifications.connect_timeout_seconds),
            )?))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();
    let cli = Cli::parse();

    let config = Config::from_config(cli.config.as_ref())?;
    if cli.print_config {
        println!("{config}");
        return Ok(());
    }
    validation::validate_config(&config)?;

    let pool = pool::open_pool(&config.database.path, config.scheduler.max_concurrent_checks).await?;
    {
        let conn = pool.get().await?;
        database::initialize_database(&conn).await?;
    }

    let store: Arc<dyn ScanStore> = Arc::new(LibsqlScanStore::new_from_pool(pool));
    let reports = Arc::new(InMemoryReportCache::new(store.clone()));
    let cycle = CheckCycle::new(
        Arc::new(HttpProber::new(&config.probe)?),
        store,
        build_notifier(&config)?,
        reports.clone(),
    )
    .with_step_timeout(Duration::from_secs(config.scheduler.step_timeout_seconds));

    let scheduler = MonitoringScheduler::new(cycle, config.scheduler.max_concurrent_checks);
    let targets = ScheduledTarget::from_config(&config);
    tracing::info!("Monitoring {} target(s)", targets.iter().filter(|t| t.enabled).count());

    if cli.once {
        for (target_id, result) in scheduler.run_once(&targets).await {
            match result {
                Ok(outcome) => {
                    let uptime = reports.get(&target_id).map(|r| r.uptime_percentage).unwrap_or(100.0);
                    println!(
                        "{target_id}: {} [{}] {} ms, uptime {uptime:.2}%",
                        if outcome.scan.was_online { "up" } else { "down" },
                        outcome.scan.response_status,
                        outcome.scan.response_time_ms,
                    );
                }
                Err(e) => println!("{target_id}: check failed: {e}"),
            }
        }
        return Ok(());
    }

    let handles = scheduler.schedule_targets(targets);

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    for handle in handles {
        handle.abort();
    }

    Ok(())
}
