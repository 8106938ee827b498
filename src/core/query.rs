//! Result query engine - filtered listing, latest draws and natural-key lookup.
//!
//! Every listing uses the same strict total order: draw date descending, then
//! draw number descending (string comparison), then id descending. The last key
//! only matters when two lottery types share a date and a draw number; with it,
//! repeated calls against an unchanged store always return identical pages.

use crate::{
    entities::{LotteryResult, lottery_result},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Condition, QueryOrder, QuerySelect, Select, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Optional filters for [`list_results`]. Absent fields impose no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultFilter {
    /// Only results of this lottery type
    pub lottery_type_id: Option<i64>,
    /// Only draws on or after this date
    pub start_date: Option<NaiveDate>,
    /// Only draws on or before this date
    pub end_date: Option<NaiveDate>,
}

impl ResultFilter {
    /// Filter scoped to one lottery type.
    #[must_use]
    pub const fn for_type(lottery_type_id: i64) -> Self {
        Self {
            lottery_type_id: Some(lottery_type_id),
            start_date: None,
            end_date: None,
        }
    }

    /// Returns a copy restricted to the inclusive date range.
    #[must_use]
    pub const fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Builds the SQL condition for this filter.
    pub(crate) fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(lottery_type_id) = self.lottery_type_id {
            condition = condition.add(lottery_result::Column::LotteryTypeId.eq(lottery_type_id));
        }
        if let Some(start) = self.start_date {
            condition = condition.add(lottery_result::Column::DrawDate.gte(start));
        }
        if let Some(end) = self.end_date {
            condition = condition.add(lottery_result::Column::DrawDate.lte(end));
        }
        condition
    }

    /// Returns true if `result` satisfies every present filter.
    #[must_use]
    pub fn matches(&self, result: &lottery_result::Model) -> bool {
        self.lottery_type_id
            .is_none_or(|id| result.lottery_type_id == id)
            && self.start_date.is_none_or(|start| result.draw_date >= start)
            && self.end_date.is_none_or(|end| result.draw_date <= end)
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage {
    /// Results on this page, newest first
    pub items: Vec<lottery_result::Model>,
    /// Number of results matching the filter across all pages
    pub total_items: u64,
    /// Zero-based page index that was requested
    pub page: u64,
    /// Requested page size
    pub page_size: u64,
    /// Number of pages needed for `total_items`
    pub total_pages: u64,
}

/// Largest value SQLite accepts for LIMIT and OFFSET.
const MAX_SQL_INTEGER: u64 = i64::MAX.unsigned_abs();

/// Applies the canonical newest-first order to a result query.
pub(crate) fn newest_first(select: Select<LotteryResult>) -> Select<LotteryResult> {
    select
        .order_by_desc(lottery_result::Column::DrawDate)
        .order_by_desc(lottery_result::Column::DrawNumber)
        .order_by_desc(lottery_result::Column::Id)
}

/// Lists results matching `filter`, newest first, one page at a time.
///
/// `page` is zero-based. A page past the end is empty but still reports the
/// total count, including pages whose offset does not fit in a SQL integer.
///
/// # Errors
/// Returns an error if `page_size` is zero or above `i64::MAX`, or the query
/// fails.
pub async fn list_results(
    db: &DatabaseConnection,
    filter: &ResultFilter,
    page: u64,
    page_size: u64,
) -> Result<ResultPage> {
    if page_size == 0 || page_size > MAX_SQL_INTEGER {
        return Err(Error::InvalidArgument {
            message: format!("Page size must be between 1 and {MAX_SQL_INTEGER}: {page_size}"),
        });
    }
    debug!(?filter, page, page_size, "Listing lottery results");

    let paginator =
        newest_first(LotteryResult::find().filter(filter.condition())).paginate(db, page_size);
    let counts = paginator.num_items_and_pages().await?;

    // SQLite binds LIMIT/OFFSET as signed 64-bit integers
    let offset_fits = page
        .checked_mul(page_size)
        .is_some_and(|offset| offset <= MAX_SQL_INTEGER);
    let items = if offset_fits && page < counts.number_of_pages {
        paginator.fetch_page(page).await?
    } else {
        Vec::new()
    };

    Ok(ResultPage {
        items,
        total_items: counts.number_of_items,
        page,
        page_size,
        total_pages: counts.number_of_pages,
    })
}

/// Returns up to `limit` most recent results, optionally for one lottery type.
///
/// A limit of zero returns an empty list; a limit above the number of stored
/// results returns all of them.
///
/// # Errors
/// Returns an error if `limit` is negative or the query fails.
pub async fn latest_results(
    db: &DatabaseConnection,
    lottery_type_id: Option<i64>,
    limit: i64,
) -> Result<Vec<lottery_result::Model>> {
    let limit = u64::try_from(limit).map_err(|_| Error::InvalidArgument {
        message: format!("Limit cannot be negative: {limit}"),
    })?;
    if limit == 0 {
        return Ok(Vec::new());
    }

    let filter = ResultFilter {
        lottery_type_id,
        ..ResultFilter::default()
    };
    newest_first(LotteryResult::find().filter(filter.condition()))
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a result by its id.
pub async fn get_result_by_id(
    db: &DatabaseConnection,
    result_id: i64,
) -> Result<Option<lottery_result::Model>> {
    LotteryResult::find_by_id(result_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a result by draw number alone.
///
/// Draw numbers are only unique per lottery type. When several types share the
/// number, the result with the lowest `lottery_type_id` is returned; use
/// [`get_result_by_type_and_draw_number`] for an unambiguous lookup.
pub async fn get_result_by_draw_number(
    db: &DatabaseConnection,
    draw_number: &str,
) -> Result<Option<lottery_result::Model>> {
    LotteryResult::find()
        .filter(lottery_result::Column::DrawNumber.eq(draw_number))
        .order_by_asc(lottery_result::Column::LotteryTypeId)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a result by its full natural key.
pub async fn get_result_by_type_and_draw_number(
    db: &DatabaseConnection,
    lottery_type_id: i64,
    draw_number: &str,
) -> Result<Option<lottery_result::Model>> {
    LotteryResult::find()
        .filter(lottery_result::Column::LotteryTypeId.eq(lottery_type_id))
        .filter(lottery_result::Column::DrawNumber.eq(draw_number))
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draws(page: &[lottery_result::Model]) -> Vec<(&str, NaiveDate)> {
        page.iter()
            .map(|r| (r.draw_number.as_str(), r.draw_date))
            .collect()
    }

    #[tokio::test]
    async fn test_start_date_filter_example() -> Result<()> {
        let (db, type_a) = setup_with_lottery_type().await?;
        create_test_result(&db, type_a.id, "1001", date(2024, 1, 1)).await?;
        create_test_result(&db, type_a.id, "1002", date(2024, 1, 8)).await?;

        let filter = ResultFilter::for_type(type_a.id).between(Some(date(2024, 1, 5)), None);
        let page = list_results(&db, &filter, 0, 20).await?;

        assert_eq!(draws(&page.items), vec![("1002", date(2024, 1, 8))]);
        assert_eq!(page.total_items, 1);
        assert_eq!(page.total_pages, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_every_filter_combination_matches_reference() -> Result<()> {
        let db = setup_test_db().await?;
        let ssq = create_test_lottery_type(&db, "SSQ").await?;
        let dlt = create_test_lottery_type(&db, "DLT").await?;

        let fixtures = [
            (ssq.id, "1001", date(2024, 1, 1)),
            (ssq.id, "1002", date(2024, 1, 4)),
            (ssq.id, "1003", date(2024, 1, 8)),
            (dlt.id, "1001", date(2024, 1, 1)),
            (dlt.id, "1005", date(2024, 1, 6)),
            (dlt.id, "1006", date(2024, 1, 10)),
        ];
        let mut all = Vec::new();
        for (type_id, number, day) in fixtures {
            all.push(create_test_result(&db, type_id, number, day).await?);
        }

        let type_choices = [None, Some(ssq.id), Some(dlt.id), Some(999)];
        let date_choices = [
            None,
            Some(date(2024, 1, 1)),
            Some(date(2024, 1, 6)),
            Some(date(2024, 1, 10)),
        ];

        for lottery_type_id in type_choices {
            for start_date in date_choices {
                for end_date in date_choices {
                    let filter = ResultFilter {
                        lottery_type_id,
                        start_date,
                        end_date,
                    };
                    let page = list_results(&db, &filter, 0, 100).await?;

                    let expected = all.iter().filter(|r| filter.matches(r)).count();
                    assert_eq!(page.items.len(), expected, "filter {filter:?}");
                    assert_eq!(page.total_items, expected as u64);
                    assert!(page.items.iter().all(|r| filter.matches(r)));
                }
            }
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_listing_order_is_total_and_stable() -> Result<()> {
        let db = setup_test_db().await?;
        let ssq = create_test_lottery_type(&db, "SSQ").await?;
        let dlt = create_test_lottery_type(&db, "DLT").await?;

        create_test_result(&db, ssq.id, "1001", date(2024, 1, 1)).await?;
        create_test_result(&db, ssq.id, "1010", date(2024, 1, 8)).await?;
        create_test_result(&db, ssq.id, "1009", date(2024, 1, 8)).await?;
        create_test_result(&db, dlt.id, "1009", date(2024, 1, 8)).await?;
        create_test_result(&db, dlt.id, "0999", date(2024, 1, 3)).await?;

        let filter = ResultFilter::default();
        let first = list_results(&db, &filter, 0, 10).await?;
        assert_eq!(
            draws(&first.items),
            vec![
                ("1010", date(2024, 1, 8)),
                ("1009", date(2024, 1, 8)),
                ("1009", date(2024, 1, 8)),
                ("0999", date(2024, 1, 3)),
                ("1001", date(2024, 1, 1)),
            ]
        );
        // Same date and number: the later insert (higher id) comes first
        assert!(first.items[1].id > first.items[2].id);

        let again = list_results(&db, &filter, 0, 10).await?;
        assert_eq!(first, again);

        Ok(())
    }

    #[tokio::test]
    async fn test_pagination_slices() -> Result<()> {
        let (db, lottery_type) = setup_with_lottery_type().await?;
        for day in 1..=5 {
            create_test_result(&db, lottery_type.id, &format!("100{day}"), date(2024, 2, day))
                .await?;
        }

        let filter = ResultFilter::default();
        let page0 = list_results(&db, &filter, 0, 2).await?;
        let page1 = list_results(&db, &filter, 1, 2).await?;
        let page2 = list_results(&db, &filter, 2, 2).await?;
        let page3 = list_results(&db, &filter, 3, 2).await?;

        let numbers = |p: &ResultPage| -> Vec<String> {
            p.items.iter().map(|r| r.draw_number.clone()).collect()
        };
        assert_eq!(numbers(&page0), vec!["1005", "1004"]);
        assert_eq!(numbers(&page1), vec!["1003", "1002"]);
        assert_eq!(numbers(&page2), vec!["1001"]);
        assert!(page3.items.is_empty());

        for page in [&page0, &page1, &page2, &page3] {
            assert_eq!(page.total_items, 5);
            assert_eq!(page.total_pages, 3);
            assert_eq!(page.page_size, 2);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_inverted_date_range_is_empty() -> Result<()> {
        let (db, lottery_type) = setup_with_lottery_type().await?;
        create_test_result(&db, lottery_type.id, "1001", date(2024, 1, 5)).await?;

        let filter = ResultFilter::default().between(Some(date(2024, 1, 9)), Some(date(2024, 1, 1)));
        let page = list_results(&db, &filter, 0, 10).await?;
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_zero_page_size_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let result = list_results(&db, &ResultFilter::default(), 0, 0).await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_page_size_upper_bound() -> Result<()> {
        let (db, lottery_type) = setup_with_lottery_type().await?;
        create_test_result(&db, lottery_type.id, "1001", date(2024, 1, 5)).await?;

        let result = list_results(&db, &ResultFilter::default(), 0, u64::MAX).await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        let largest = list_results(&db, &ResultFilter::default(), 0, MAX_SQL_INTEGER).await?;
        assert_eq!(largest.items.len(), 1);
        assert_eq!(largest.total_pages, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_far_pages_are_empty() -> Result<()> {
        let (db, lottery_type) = setup_with_lottery_type().await?;
        create_test_result(&db, lottery_type.id, "1001", date(2024, 1, 5)).await?;
        create_test_result(&db, lottery_type.id, "1002", date(2024, 1, 6)).await?;

        let filter = ResultFilter::default();
        for (page, page_size) in [(1u64 << 62, 8), (u64::MAX, 2), (u64::MAX / 2, 1)] {
            let listed = list_results(&db, &filter, page, page_size).await?;
            assert!(listed.items.is_empty(), "page {page} size {page_size}");
            assert_eq!(listed.total_items, 2);
            assert_eq!(listed.page, page);
            assert_eq!(listed.total_pages, 2u64.div_ceil(page_size));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_latest_results_limits() -> Result<()> {
        let db = setup_test_db().await?;
        let ssq = create_test_lottery_type(&db, "SSQ").await?;
        let dlt = create_test_lottery_type(&db, "DLT").await?;
        create_test_result(&db, ssq.id, "1001", date(2024, 3, 1)).await?;
        create_test_result(&db, ssq.id, "1002", date(2024, 3, 3)).await?;
        create_test_result(&db, dlt.id, "2001", date(2024, 3, 2)).await?;

        assert!(latest_results(&db, None, 0).await?.is_empty());

        let two = latest_results(&db, None, 2).await?;
        assert_eq!(
            draws(&two),
            vec![("1002", date(2024, 3, 3)), ("2001", date(2024, 3, 2))]
        );

        let everything = latest_results(&db, None, 50).await?;
        assert_eq!(everything.len(), 3);

        let ssq_only = latest_results(&db, Some(ssq.id), 50).await?;
        assert_eq!(
            draws(&ssq_only),
            vec![("1002", date(2024, 3, 3)), ("1001", date(2024, 3, 1))]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_latest_results_negative_limit() -> Result<()> {
        let db = setup_test_db().await?;
        let result = latest_results(&db, None, -1).await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_by_draw_number_tie_break() -> Result<()> {
        let db = setup_test_db().await?;
        let first_type = create_test_lottery_type(&db, "SSQ").await?;
        let second_type = create_test_lottery_type(&db, "DLT").await?;

        // Insert the higher type id first so insertion order cannot decide
        create_test_result(&db, second_type.id, "2024001", date(2024, 1, 2)).await?;
        create_test_result(&db, first_type.id, "2024001", date(2024, 1, 1)).await?;

        let found = get_result_by_draw_number(&db, "2024001").await?.unwrap();
        assert_eq!(found.lottery_type_id, first_type.id);

        let exact = get_result_by_type_and_draw_number(&db, second_type.id, "2024001")
            .await?
            .unwrap();
        assert_eq!(exact.lottery_type_id, second_type.id);

        assert!(get_result_by_draw_number(&db, "9999").await?.is_none());
        assert!(get_result_by_id(&db, found.id).await?.is_some());
        assert!(get_result_by_id(&db, 10_000).await?.is_none());

        Ok(())
    }
}
