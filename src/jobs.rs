//! Background jobs - periodic crawler sync and integrity check.
//!
//! Both jobs run on fixed intervals until Ctrl-C. A failing tick is logged and
//! the loop carries on; nothing here is retried early.

use crate::{
    config::settings::SchedulerConfig,
    core::sync::{CrawlerClient, check_integrity, sync_data_from_crawler},
};
use sea_orm::DatabaseConnection;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, instrument};

/// Runs the sync and integrity jobs until the process receives Ctrl-C.
///
/// The first tick of each interval fires immediately, so both jobs run once at
/// start-up.
#[instrument(skip(db, crawler))]
pub async fn run_scheduler<C>(db: &DatabaseConnection, config: &SchedulerConfig, crawler: &C)
where
    C: CrawlerClient,
{
    let mut sync_timer = interval(config.sync_interval());
    let mut integrity_timer = interval(config.integrity_interval());
    sync_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    integrity_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "Scheduler started: sync every {}h, integrity check every {}m",
        config.sync_interval_hours, config.integrity_interval_minutes
    );

    loop {
        tokio::select! {
            _ = sync_timer.tick() => {
                if sync_data_from_crawler(db, crawler).await {
                    info!("Scheduled data sync succeeded");
                } else {
                    error!("Scheduled data sync failed");
                }
            }
            _ = integrity_timer.tick() => {
                if let Err(e) = check_integrity(db).await {
                    error!("Scheduled integrity check failed: {e}");
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!("Failed to listen for shutdown signal: {e}");
                }
                info!("Shutdown requested, stopping scheduler");
                break;
            }
        }
    }
}
