//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. The composite natural key of a draw result cannot be expressed as a
//! column attribute, so its unique index is created explicitly here; the store,
//! not application code, is what finally serializes concurrent creators.

use crate::entities::{LotteryResult, LotteryType, SystemState, lottery_result};
use crate::errors::Result;
use sea_orm::sea_query::{Index, TableCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

/// Database used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://lottery.sqlite?mode=rwc";

/// Name of the unique index over `(lottery_type_id, draw_number)`.
pub const UNIQUE_DRAW_INDEX: &str = "uk_type_draw";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to [`DEFAULT_DATABASE_URL`] when no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables and indexes if they do not already exist.
///
/// Safe to call on every start-up: each statement is `IF NOT EXISTS`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Parents before children so the foreign key target exists
    let tables = [
        table_if_not_exists(schema.create_table_from_entity(LotteryType)),
        table_if_not_exists(schema.create_table_from_entity(LotteryResult)),
        table_if_not_exists(schema.create_table_from_entity(SystemState)),
    ];
    for table in &tables {
        db.execute(builder.build(table)).await?;
    }

    let unique_draw = Index::create()
        .name(UNIQUE_DRAW_INDEX)
        .table(LotteryResult)
        .col(lottery_result::Column::LotteryTypeId)
        .col(lottery_result::Column::DrawNumber)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&unique_draw)).await?;

    info!("Database tables ensured");
    Ok(())
}

fn table_if_not_exists(mut table: TableCreateStatement) -> TableCreateStatement {
    table.if_not_exists();
    table
}

/// Connects and ensures the schema in one step.
pub async fn init_db() -> Result<DatabaseConnection> {
    let db = create_connection().await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Quick liveness check used at start-up.
pub async fn ping(db: &DatabaseConnection) -> Result<()> {
    let _ = LotteryType::find().one(db).await?;
    Ok(())
}
