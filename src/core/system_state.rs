//! Key-value bookkeeping in the `system_state` table.
//!
//! Used by the background jobs to remember when they last completed. Values are
//! stored as strings; timestamps use RFC 3339.

use crate::{
    entities::{SystemState, system_state},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{Set, prelude::*};
use tracing::{debug, instrument};

/// Retrieves a value from the `system_state` table, `None` if the key is absent.
pub async fn get_system_state_value<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let state = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;
    debug!("System state for key '{key}': {:?}", state.as_ref().map(|s| &s.value));
    Ok(state.map(|s| s.value))
}

/// Sets or replaces a value in the `system_state` table.
#[instrument(skip(db))]
pub async fn set_system_state_value<C>(db: &C, key: &str, value: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(state) = existing {
        let mut active_model: system_state::ActiveModel = state.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_state = system_state::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
    }

    Ok(())
}

/// Reads a timestamp stored by [`set_system_state_time`].
pub async fn get_system_state_time<C>(db: &C, key: &str) -> Result<Option<DateTime<Utc>>>
where
    C: ConnectionTrait,
{
    match get_system_state_value(db, key).await? {
        Some(value) => DateTime::parse_from_rfc3339(&value)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|e| Error::Config {
                message: format!("Failed to parse timestamp stored under '{key}': {e}"),
            }),
        None => Ok(None),
    }
}

/// Stores a timestamp under `key`.
pub async fn set_system_state_time<C>(db: &C, key: &str, time: DateTime<Utc>) -> Result<()>
where
    C: ConnectionTrait,
{
    set_system_state_value(db, key, &time.to_rfc3339()).await
}
