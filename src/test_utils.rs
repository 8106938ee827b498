//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{lottery_type, result},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a lottery type with the given code and a name derived from it.
pub async fn create_test_lottery_type(
    db: &DatabaseConnection,
    code: &str,
) -> Result<entities::lottery_type::Model> {
    lottery_type::create_lottery_type(db, code, &format!("Test {code}"), None).await
}

/// Builds a creation request with sensible defaults.
///
/// # Defaults
/// * `numbers`: `"01 02 03 04 05 06"`
/// * `draw_time`, `sales_amount`, `prize_pool`: None
#[must_use]
pub fn new_result(
    lottery_type_id: i64,
    draw_number: &str,
    draw_date: NaiveDate,
) -> result::NewLotteryResult {
    result::NewLotteryResult {
        lottery_type_id,
        draw_number: draw_number.to_string(),
        draw_date,
        draw_time: None,
        numbers: "01 02 03 04 05 06".to_string(),
        sales_amount: None,
        prize_pool: None,
    }
}

/// Stores a result with default numbers and no amounts.
pub async fn create_test_result(
    db: &DatabaseConnection,
    lottery_type_id: i64,
    draw_number: &str,
    draw_date: NaiveDate,
) -> Result<entities::lottery_result::Model> {
    result::create_result(db, new_result(lottery_type_id, draw_number, draw_date)).await
}

/// Sets up a test database with one lottery type (`"TEST"`).
/// Returns (db, `lottery_type`) for common test scenarios.
pub async fn setup_with_lottery_type()
-> Result<(DatabaseConnection, entities::lottery_type::Model)> {
    let db = setup_test_db().await?;
    let lottery_type = create_test_lottery_type(&db, "TEST").await?;
    Ok((db, lottery_type))
}
