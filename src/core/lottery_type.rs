//! Lottery type business logic - The catalogue of lottery games.
//!
//! Provides lookups by id and by code, creation with a unique code, and
//! idempotent seeding from the configuration file.

use crate::{
    config::settings::LotteryTypeConfig,
    entities::{LotteryResult, LotteryType, lottery_result, lottery_type},
    errors::{Error, Result, is_unique_violation},
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use tracing::{debug, info};

const MAX_CODE_LEN: usize = 20;
const MAX_NAME_LEN: usize = 50;

/// Retrieves every lottery type, ordered by id.
pub async fn get_all_lottery_types(db: &DatabaseConnection) -> Result<Vec<lottery_type::Model>> {
    LotteryType::find()
        .order_by_asc(lottery_type::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a lottery type by its id.
pub async fn get_lottery_type_by_id(
    db: &DatabaseConnection,
    lottery_type_id: i64,
) -> Result<Option<lottery_type::Model>> {
    LotteryType::find_by_id(lottery_type_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a lottery type by its unique code. The comparison is exact.
pub async fn get_lottery_type_by_code(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<lottery_type::Model>> {
    LotteryType::find()
        .filter(lottery_type::Column::TypeCode.eq(code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the lottery types that have at least one stored draw, ordered by id.
pub async fn get_active_lottery_types(
    db: &DatabaseConnection,
) -> Result<Vec<lottery_type::Model>> {
    let active_ids: Vec<i64> = LotteryResult::find()
        .select_only()
        .column(lottery_result::Column::LotteryTypeId)
        .distinct()
        .into_tuple()
        .all(db)
        .await?;

    if active_ids.is_empty() {
        return Ok(Vec::new());
    }

    LotteryType::find()
        .filter(lottery_type::Column::Id.is_in(active_ids))
        .order_by_asc(lottery_type::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new lottery type.
///
/// Code and name are trimmed; both must be non-empty and within the column
/// limits (20 and 50 characters). The code must not already exist.
///
/// # Errors
/// Returns an error if:
/// - The code or name is blank or too long
/// - A type with the same code exists
/// - The database insert fails
pub async fn create_lottery_type(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
    description: Option<String>,
) -> Result<lottery_type::Model> {
    let code = code.trim();
    let name = name.trim();
    validate_text("lottery type code", code, MAX_CODE_LEN)?;
    validate_text("lottery type name", name, MAX_NAME_LEN)?;

    if get_lottery_type_by_code(db, code).await?.is_some() {
        return Err(Error::DuplicateTypeCode {
            code: code.to_string(),
        });
    }

    let now = chrono::Utc::now();
    let lottery_type = lottery_type::ActiveModel {
        type_code: Set(code.to_string()),
        type_name: Set(name.to_string()),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    lottery_type.insert(db).await.map_err(|e| {
        if is_unique_violation(&e) {
            Error::DuplicateTypeCode {
                code: code.to_string(),
            }
        } else {
            e.into()
        }
    })
}

/// Inserts every configured lottery type whose code is not stored yet.
///
/// Existing types are left untouched, so running this on every start-up is safe.
/// Returns the number of types inserted.
pub async fn seed_lottery_types(
    db: &DatabaseConnection,
    configs: &[LotteryTypeConfig],
) -> Result<usize> {
    info!(
        "Seeding lottery types. Found {} configurations.",
        configs.len()
    );
    let mut inserted = 0;

    for config in configs {
        if get_lottery_type_by_code(db, config.code.trim()).await?.is_some() {
            debug!("Lottery type '{}' already exists. Skipping.", config.code);
            continue;
        }

        create_lottery_type(db, &config.code, &config.name, config.description.clone()).await?;
        info!("Seeded lottery type '{}'", config.code);
        inserted += 1;
    }

    Ok(inserted)
}

fn validate_text(field: &str, value: &str, max_len: usize) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidArgument {
            message: format!("{field} cannot be empty"),
        });
    }
    if value.chars().count() > max_len {
        return Err(Error::InvalidArgument {
            message: format!("{field} cannot exceed {max_len} characters"),
        });
    }
    Ok(())
}
