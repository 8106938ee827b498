//! Data sync boundary and integrity check.
//!
//! Ingestion from the external crawler service is reached through the
//! [`CrawlerClient`] seam. The service has no defined contract yet, so the only
//! client shipped here, [`UnconfiguredCrawler`], reports
//! [`Error::NotImplemented`]; [`sync_data_from_crawler`] turns that into `false`
//! rather than pretending the sync happened.

use crate::{
    core::{
        result::is_valid_draw_number,
        system_state::{get_system_state_time, set_system_state_time},
    },
    entities::{LotteryResult, lottery_result},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, QuerySelect, prelude::*};
use std::future::Future;
use tracing::{error, info, instrument, warn};

const LAST_CRAWLER_SYNC_KEY: &str = "last_crawler_sync";
const LAST_INTEGRITY_CHECK_KEY: &str = "last_integrity_check";

/// Rows read per query while scanning for integrity problems.
const INTEGRITY_BATCH_SIZE: u64 = 500;

/// Something that can ask the crawler service to ingest new draws.
pub trait CrawlerClient {
    /// Triggers one ingestion run and returns the number of draws it stored.
    fn trigger_sync(&self) -> impl Future<Output = Result<usize>> + Send;
}

/// Crawler client used when no crawler service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredCrawler;

impl CrawlerClient for UnconfiguredCrawler {
    async fn trigger_sync(&self) -> Result<usize> {
        Err(Error::NotImplemented {
            feature: "crawler sync",
        })
    }
}

/// Runs one crawler sync and reports whether it succeeded.
///
/// On success the completion time is recorded in `system_state`. Any failure,
/// including an unconfigured crawler, is logged and yields `false`.
#[instrument(skip(db, crawler))]
pub async fn sync_data_from_crawler<C>(db: &DatabaseConnection, crawler: &C) -> bool
where
    C: CrawlerClient,
{
    info!("Starting data sync from crawler");

    let stored = match crawler.trigger_sync().await {
        Ok(stored) => stored,
        Err(e @ Error::NotImplemented { .. }) => {
            warn!("Data sync skipped: {e}");
            return false;
        }
        Err(e) => {
            error!("Data sync failed: {e}");
            return false;
        }
    };

    if let Err(e) = set_system_state_time(db, LAST_CRAWLER_SYNC_KEY, Utc::now()).await {
        error!("Data sync stored {stored} draws but recording the sync time failed: {e}");
        return false;
    }

    info!("Data sync finished: {stored} draws stored");
    true
}

/// When the last successful crawler sync finished.
pub async fn get_last_sync_time(db: &DatabaseConnection) -> Result<Option<DateTime<Utc>>> {
    get_system_state_time(db, LAST_CRAWLER_SYNC_KEY).await
}

/// When the last integrity check finished.
pub async fn get_last_integrity_check_time(
    db: &DatabaseConnection,
) -> Result<Option<DateTime<Utc>>> {
    get_system_state_time(db, LAST_INTEGRITY_CHECK_KEY).await
}

/// Findings of one integrity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Number of results examined
    pub checked: usize,
    /// Ids of results whose draw number is not 4 to 8 digits
    pub malformed_draw_numbers: Vec<i64>,
    /// Ids of results with blank drawn numbers
    pub blank_numbers: Vec<i64>,
    /// When the check ran
    pub checked_at: DateTime<Utc>,
}

impl IntegrityReport {
    /// True when nothing was flagged.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.malformed_draw_numbers.is_empty() && self.blank_numbers.is_empty()
    }
}

/// Scans stored results for rows that bypassed validation.
///
/// Records the check time in `system_state`.
#[instrument(skip(db))]
pub async fn check_integrity(db: &DatabaseConnection) -> Result<IntegrityReport> {
    let mut pages = LotteryResult::find()
        .select_only()
        .column(lottery_result::Column::Id)
        .column(lottery_result::Column::DrawNumber)
        .column(lottery_result::Column::Numbers)
        .order_by_asc(lottery_result::Column::Id)
        .into_tuple::<(i64, String, String)>()
        .paginate(db, INTEGRITY_BATCH_SIZE);

    let mut checked = 0;
    let mut malformed_draw_numbers = Vec::new();
    let mut blank_numbers = Vec::new();
    while let Some(rows) = pages.fetch_and_next().await? {
        checked += rows.len();
        for (id, draw_number, numbers) in rows {
            if !is_valid_draw_number(&draw_number) {
                malformed_draw_numbers.push(id);
            }
            if numbers.trim().is_empty() {
                blank_numbers.push(id);
            }
        }
    }

    let checked_at = Utc::now();
    set_system_state_time(db, LAST_INTEGRITY_CHECK_KEY, checked_at).await?;

    let report = IntegrityReport {
        checked,
        malformed_draw_numbers,
        blank_numbers,
        checked_at,
    };
    if report.is_clean() {
        info!("Integrity check passed: {} results", report.checked);
    } else {
        warn!(
            "Integrity check flagged results: malformed draw numbers {:?}, blank numbers {:?}",
            report.malformed_draw_numbers, report.blank_numbers
        );
    }
    Ok(report)
}
