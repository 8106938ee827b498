//! Aggregate statistics over stored draw results.
//!
//! Counts are computed for one lottery type or for the whole store. The trailing
//! windows are anchored on "today": [`get_statistics`] reads the local clock, so
//! two calls may disagree across midnight; [`get_statistics_on`] takes the date
//! explicitly.

use crate::{
    core::query::ResultFilter,
    entities::{LotteryResult, LotteryType, lottery_result},
    errors::Result,
};
use chrono::{Days, Local, Months, NaiveDate};
use sea_orm::{QuerySelect, prelude::*};
use serde::Serialize;
use tracing::info;

/// Aggregates for one lottery type or for all of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LotteryStatistics {
    /// Lottery type the figures cover, `None` for all types
    pub lottery_type_id: Option<i64>,
    /// Number of stored draws
    pub total_draws: u64,
    /// Draws dated within the last 7 days, inclusive of both ends
    pub week_draws: u64,
    /// Draws dated within the last calendar month, inclusive of both ends
    pub month_draws: u64,
    /// Sum of recorded sales amounts; draws without one contribute nothing
    pub total_sales: f64,
    /// Sum of recorded prize pools; draws without one contribute nothing
    pub total_prize_pool: f64,
    /// Number of lottery types in the catalogue
    pub lottery_type_count: u64,
    /// The date the trailing windows were anchored on
    pub as_of: NaiveDate,
}

/// Computes statistics relative to the current local date.
///
/// Not deterministic across calls; use [`get_statistics_on`] when the anchor
/// date matters.
pub async fn get_statistics(
    db: &DatabaseConnection,
    lottery_type_id: Option<i64>,
) -> Result<LotteryStatistics> {
    get_statistics_on(db, lottery_type_id, Local::now().date_naive()).await
}

/// Computes statistics with the trailing windows ending on `today`.
///
/// An unknown lottery type yields zero counts rather than an error.
pub async fn get_statistics_on(
    db: &DatabaseConnection,
    lottery_type_id: Option<i64>,
    today: NaiveDate,
) -> Result<LotteryStatistics> {
    info!("Computing statistics: type={lottery_type_id:?}, as_of={today}");

    let scope = ResultFilter {
        lottery_type_id,
        ..ResultFilter::default()
    };
    let week_start = today.checked_sub_days(Days::new(7)).unwrap_or(NaiveDate::MIN);
    let month_start = today
        .checked_sub_months(Months::new(1))
        .unwrap_or(NaiveDate::MIN);

    let total_draws = count_draws(db, &scope).await?;
    let week_draws = count_draws(db, &scope.between(Some(week_start), Some(today))).await?;
    let month_draws = count_draws(db, &scope.between(Some(month_start), Some(today))).await?;
    let (total_sales, total_prize_pool) = sum_amounts(db, &scope).await?;
    let lottery_type_count = LotteryType::find().count(db).await?;

    Ok(LotteryStatistics {
        lottery_type_id,
        total_draws,
        week_draws,
        month_draws,
        total_sales,
        total_prize_pool,
        lottery_type_count,
        as_of: today,
    })
}

/// Counts the results matching `filter`.
pub async fn count_draws(db: &DatabaseConnection, filter: &ResultFilter) -> Result<u64> {
    LotteryResult::find()
        .filter(filter.condition())
        .count(db)
        .await
        .map_err(Into::into)
}

async fn sum_amounts(db: &DatabaseConnection, filter: &ResultFilter) -> Result<(f64, f64)> {
    let sums: Option<(Option<f64>, Option<f64>)> = LotteryResult::find()
        .filter(filter.condition())
        .select_only()
        .column_as(lottery_result::Column::SalesAmount.sum(), "total_sales")
        .column_as(lottery_result::Column::PrizePool.sum(), "total_prize_pool")
        .into_tuple()
        .one(db)
        .await?;

    let (sales, prize_pool) = sums.unwrap_or((None, None));
    Ok((sales.unwrap_or(0.0), prize_pool.unwrap_or(0.0)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::result::create_result;
    use crate::test_utils::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_statistics_empty_store() -> Result<()> {
        let db = setup_test_db().await?;
        let today = date(2024, 3, 15);

        let stats = get_statistics_on(&db, None, today).await?;
        assert_eq!(stats.total_draws, 0);
        assert_eq!(stats.week_draws, 0);
        assert_eq!(stats.month_draws, 0);
        assert_eq!(stats.total_sales, 0.0);
        assert_eq!(stats.total_prize_pool, 0.0);
        assert_eq!(stats.lottery_type_count, 0);
        assert_eq!(stats.as_of, today);

        Ok(())
    }

    #[tokio::test]
    async fn test_statistics_windows_are_inclusive() -> Result<()> {
        let (db, lottery_type) = setup_with_lottery_type().await?;
        let today = date(2024, 3, 15);

        // today, exactly 7 days ago, 8 days ago, exactly 1 month ago, older, future
        for (number, day) in [
            ("1001", date(2024, 3, 15)),
            ("1002", date(2024, 3, 8)),
            ("1003", date(2024, 3, 7)),
            ("1004", date(2024, 2, 15)),
            ("1005", date(2024, 2, 14)),
            ("1006", date(2024, 3, 16)),
        ] {
            create_test_result(&db, lottery_type.id, number, day).await?;
        }

        let stats = get_statistics_on(&db, Some(lottery_type.id), today).await?;
        assert_eq!(stats.total_draws, 6);
        assert_eq!(stats.week_draws, 2);
        assert_eq!(stats.month_draws, 4);
        assert_eq!(stats.lottery_type_id, Some(lottery_type.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_month_window_clamps_at_month_end() -> Result<()> {
        let (db, lottery_type) = setup_with_lottery_type().await?;
        // One month before 2024-03-31 is 2024-02-29
        create_test_result(&db, lottery_type.id, "1001", date(2024, 2, 29)).await?;
        create_test_result(&db, lottery_type.id, "1002", date(2024, 2, 28)).await?;

        let stats = get_statistics_on(&db, None, date(2024, 3, 31)).await?;
        assert_eq!(stats.month_draws, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_statistics_scoped_by_type_and_global() -> Result<()> {
        let db = setup_test_db().await?;
        let ssq = create_test_lottery_type(&db, "SSQ").await?;
        let dlt = create_test_lottery_type(&db, "DLT").await?;
        let today = date(2024, 5, 10);

        let mut sold = new_result(ssq.id, "2024050", date(2024, 5, 9));
        sold.sales_amount = Some(1_000.5);
        sold.prize_pool = Some(20_000.0);
        create_result(&db, sold).await?;

        let mut partial = new_result(ssq.id, "2024049", date(2024, 5, 2));
        partial.sales_amount = Some(999.5);
        create_result(&db, partial).await?;

        let mut other = new_result(dlt.id, "24050", date(2024, 4, 1));
        other.prize_pool = Some(5.0);
        create_result(&db, other).await?;

        let ssq_stats = get_statistics_on(&db, Some(ssq.id), today).await?;
        assert_eq!(ssq_stats.total_draws, 2);
        assert_eq!(ssq_stats.week_draws, 1);
        assert_eq!(ssq_stats.month_draws, 2);
        assert_eq!(ssq_stats.total_sales, 2_000.0);
        assert_eq!(ssq_stats.total_prize_pool, 20_000.0);
        assert_eq!(ssq_stats.lottery_type_count, 2);

        let all = get_statistics_on(&db, None, today).await?;
        assert_eq!(all.total_draws, 3);
        assert_eq!(all.month_draws, 2);
        assert_eq!(all.total_prize_pool, 20_005.0);
        assert!(all.lottery_type_id.is_none());

        let unknown = get_statistics_on(&db, Some(999), today).await?;
        assert_eq!(unknown.total_draws, 0);
        assert_eq!(unknown.total_sales, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_count_draws_respects_filter() -> Result<()> {
        let (db, lottery_type) = setup_with_lottery_type().await?;
        create_test_result(&db, lottery_type.id, "1001", date(2024, 1, 1)).await?;
        create_test_result(&db, lottery_type.id, "1002", date(2024, 1, 8)).await?;

        let filter =
            ResultFilter::for_type(lottery_type.id).between(Some(date(2024, 1, 5)), None);
        assert_eq!(count_draws(&db, &filter).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_statistics_uses_wall_clock() -> Result<()> {
        let db = setup_test_db().await?;
        let before = Local::now().date_naive();
        let stats = get_statistics(&db, None).await?;
        let after = Local::now().date_naive();
        assert!(stats.as_of >= before && stats.as_of <= after);
        Ok(())
    }
}
