//! Lottery result mutations - create, partial update, delete and batch import.
//!
//! These operations guard the invariants the query engine relies on: a draw
//! number is 4 to 8 digits, `(lottery_type_id, draw_number)` is unique, and
//! `created_at` is written exactly once. Timestamps are stamped here, not by a
//! storage hook.

use crate::{
    entities::{LotteryResult, LotteryType, lottery_result},
    errors::{Error, Result, is_unique_violation},
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

/// Input for creating one draw result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLotteryResult {
    /// Owning lottery type
    pub lottery_type_id: i64,
    /// Draw number, 4 to 8 digits
    pub draw_number: String,
    /// Calendar date of the draw
    pub draw_date: NaiveDate,
    /// Time of the draw, if known
    #[serde(default)]
    pub draw_time: Option<NaiveTime>,
    /// Drawn numbers as published
    pub numbers: String,
    /// Ticket sales
    #[serde(default)]
    pub sales_amount: Option<f64>,
    /// Prize pool
    #[serde(default)]
    pub prize_pool: Option<f64>,
}

/// Partial update of a stored result. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultUpdate {
    /// New draw date
    pub draw_date: Option<NaiveDate>,
    /// New draw time
    pub draw_time: Option<NaiveTime>,
    /// New numbers; a blank string counts as absent
    pub numbers: Option<String>,
    /// New sales amount
    pub sales_amount: Option<f64>,
    /// New prize pool
    pub prize_pool: Option<f64>,
}

/// Outcome of importing a single entry in a batch.
#[derive(Debug)]
pub enum ImportOutcome {
    /// The entry was stored
    Imported(lottery_result::Model),
    /// The entry was rejected; the rest of the batch was unaffected
    Rejected {
        /// Lottery type of the rejected entry
        lottery_type_id: i64,
        /// Draw number of the rejected entry
        draw_number: String,
        /// Why it was rejected
        error: Error,
    },
}

/// Per-entry results of a batch import, in input order.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// One outcome per input entry
    pub outcomes: Vec<ImportOutcome>,
}

impl ImportReport {
    /// Results that were stored.
    pub fn imported(&self) -> impl Iterator<Item = &lottery_result::Model> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ImportOutcome::Imported(model) => Some(model),
            ImportOutcome::Rejected { .. } => None,
        })
    }

    /// Entries that were rejected, with their errors.
    pub fn rejected(&self) -> impl Iterator<Item = (i64, &str, &Error)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ImportOutcome::Imported(_) => None,
            ImportOutcome::Rejected {
                lottery_type_id,
                draw_number,
                error,
            } => Some((*lottery_type_id, draw_number.as_str(), error)),
        })
    }

    /// Number of stored entries.
    #[must_use]
    pub fn imported_count(&self) -> usize {
        self.imported().count()
    }

    /// Number of rejected entries.
    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.outcomes.len() - self.imported_count()
    }
}

/// Returns true if `draw_number` is 4 to 8 ASCII digits.
#[must_use]
pub fn is_valid_draw_number(draw_number: &str) -> bool {
    (4..=8).contains(&draw_number.len()) && draw_number.bytes().all(|b| b.is_ascii_digit())
}

fn validate_draw_number(draw_number: &str) -> Result<()> {
    if is_valid_draw_number(draw_number) {
        Ok(())
    } else {
        Err(Error::InvalidDrawNumber {
            draw_number: draw_number.to_string(),
        })
    }
}

fn validate_amount(field: &'static str, amount: Option<f64>) -> Result<()> {
    match amount {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(Error::InvalidAmount { field, amount: value })
        }
        _ => Ok(()),
    }
}

fn validate_new_result(new: &NewLotteryResult) -> Result<()> {
    validate_draw_number(&new.draw_number)?;
    if new.numbers.trim().is_empty() {
        return Err(Error::InvalidArgument {
            message: "Drawn numbers cannot be empty".to_string(),
        });
    }
    validate_amount("sales amount", new.sales_amount)?;
    validate_amount("prize pool", new.prize_pool)
}

/// Returns true if a result with this natural key is stored.
pub async fn result_exists(
    db: &DatabaseConnection,
    lottery_type_id: i64,
    draw_number: &str,
) -> Result<bool> {
    let count = LotteryResult::find()
        .filter(lottery_result::Column::LotteryTypeId.eq(lottery_type_id))
        .filter(lottery_result::Column::DrawNumber.eq(draw_number))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Stores a new draw result.
///
/// The natural key is checked before the insert; the unique index catches a
/// concurrent creator that slips between the check and the insert, and both
/// paths report [`Error::DuplicateDrawNumber`].
///
/// # Errors
/// Returns an error if:
/// - The draw number is not 4 to 8 digits, the numbers are blank, or an amount
///   is negative or not finite
/// - The `(lottery_type_id, draw_number)` pair already exists
/// - The lottery type does not exist
/// - The database insert fails
#[instrument(skip(db, new), fields(draw_number = %new.draw_number, lottery_type_id = new.lottery_type_id))]
pub async fn create_result(
    db: &DatabaseConnection,
    new: NewLotteryResult,
) -> Result<lottery_result::Model> {
    validate_new_result(&new)?;

    if result_exists(db, new.lottery_type_id, &new.draw_number).await? {
        return Err(Error::DuplicateDrawNumber {
            lottery_type_id: new.lottery_type_id,
            draw_number: new.draw_number,
        });
    }

    if LotteryType::find_by_id(new.lottery_type_id)
        .one(db)
        .await?
        .is_none()
    {
        return Err(Error::UnknownLotteryType {
            lottery_type_id: new.lottery_type_id,
        });
    }

    let lottery_type_id = new.lottery_type_id;
    let draw_number = new.draw_number.clone();
    let result = lottery_result::ActiveModel {
        lottery_type_id: Set(new.lottery_type_id),
        draw_number: Set(new.draw_number),
        draw_date: Set(new.draw_date),
        draw_time: Set(new.draw_time),
        numbers: Set(new.numbers),
        sales_amount: Set(new.sales_amount),
        prize_pool: Set(new.prize_pool),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let saved = result
        .insert(db)
        .await
        .map_err(|e| insert_error(e, lottery_type_id, draw_number))?;

    info!("Stored lottery result {}", saved.id);
    Ok(saved)
}

/// Maps a failed insert, turning a unique-index violation into a conflict.
///
/// A concurrent creator can pass the pre-check and still lose at the index.
fn insert_error(err: DbErr, lottery_type_id: i64, draw_number: String) -> Error {
    if is_unique_violation(&err) {
        Error::DuplicateDrawNumber {
            lottery_type_id,
            draw_number,
        }
    } else {
        err.into()
    }
}

/// Applies a partial update to a stored result.
///
/// Only fields present in `update` are written. `created_at`, the draw number
/// and the lottery type never change.
///
/// # Errors
/// Returns an error if:
/// - No result has this id
/// - A supplied amount is negative or not finite
/// - The database update fails
#[instrument(skip(db, update))]
pub async fn update_result(
    db: &DatabaseConnection,
    result_id: i64,
    update: ResultUpdate,
) -> Result<lottery_result::Model> {
    validate_amount("sales amount", update.sales_amount)?;
    validate_amount("prize pool", update.prize_pool)?;

    let existing = LotteryResult::find_by_id(result_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ResultNotFound {
            key: result_id.to_string(),
        })?;

    let mut result: lottery_result::ActiveModel = existing.clone().into();
    if let Some(draw_date) = update.draw_date {
        result.draw_date = Set(draw_date);
    }
    if let Some(draw_time) = update.draw_time {
        result.draw_time = Set(Some(draw_time));
    }
    if let Some(numbers) = update.numbers.filter(|n| !n.trim().is_empty()) {
        result.numbers = Set(numbers);
    }
    if let Some(sales_amount) = update.sales_amount {
        result.sales_amount = Set(Some(sales_amount));
    }
    if let Some(prize_pool) = update.prize_pool {
        result.prize_pool = Set(Some(prize_pool));
    }

    // Nothing supplied: an UPDATE with no columns is an error in SeaORM
    if !result.is_changed() {
        return Ok(existing);
    }

    let updated = result.update(db).await?;
    info!("Updated lottery result {}", updated.id);
    Ok(updated)
}

/// Deletes a result by id. Returns whether a row was removed; a missing id is not an error.
pub async fn delete_result(db: &DatabaseConnection, result_id: i64) -> Result<bool> {
    let outcome = LotteryResult::delete_by_id(result_id).exec(db).await?;
    let removed = outcome.rows_affected > 0;
    if removed {
        info!("Deleted lottery result {result_id}");
    } else {
        warn!("Delete requested for missing lottery result {result_id}");
    }
    Ok(removed)
}

/// Imports a batch of results, each one independently.
///
/// A rejected entry does not abort the batch. The report carries one tagged
/// outcome per input entry, in input order.
#[instrument(skip(db, entries), fields(count = entries.len()))]
pub async fn batch_import_results(
    db: &DatabaseConnection,
    entries: Vec<NewLotteryResult>,
) -> ImportReport {
    let total = entries.len();
    let mut report = ImportReport {
        outcomes: Vec::with_capacity(total),
    };

    for entry in entries {
        let lottery_type_id = entry.lottery_type_id;
        let draw_number = entry.draw_number.clone();
        match create_result(db, entry).await {
            Ok(model) => report.outcomes.push(ImportOutcome::Imported(model)),
            Err(error) => {
                error!("Failed to import draw {draw_number} for type {lottery_type_id}: {error}");
                report.outcomes.push(ImportOutcome::Rejected {
                    lottery_type_id,
                    draw_number,
                    error,
                });
            }
        }
    }

    info!(
        "Batch import finished: imported={}, total={}",
        report.imported_count(),
        total
    );
    report
}
