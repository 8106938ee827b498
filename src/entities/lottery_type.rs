//! Lottery type entity - One lottery game or product variant.
//!
//! Each type is identified by a short unique code (e.g. `"SSQ"`) and carries a
//! display name and an optional description. Draw results reference their type
//! through `lottery_results.lottery_type_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lottery type database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lottery_types")]
pub struct Model {
    /// Unique identifier for the lottery type
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Globally unique short code (e.g., `"DLT"`, `"SSQ"`)
    #[sea_orm(unique)]
    pub type_code: String,
    /// Display name; not required to be unique
    pub type_name: String,
    /// Free-text description of the game rules
    pub description: Option<String>,
    /// When the type was created
    pub created_at: DateTimeUtc,
    /// When the type was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `LotteryType` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One lottery type has many draw results
    #[sea_orm(has_many = "super::lottery_result::Entity")]
    Results,
}

impl Related<super::lottery_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Results.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
