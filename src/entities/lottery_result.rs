//! Lottery result entity - One drawing event of a lottery type.
//!
//! A result is identified in the real world by its draw number, which is only
//! unique together with the owning lottery type. `created_at` is stamped once by
//! the create operation and never rewritten.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lottery result database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lottery_results")]
pub struct Model {
    /// Unique identifier for the result
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the lottery type this draw belongs to
    pub lottery_type_id: i64,
    /// Draw number, 4 to 8 digits (e.g., `"2024001"`)
    pub draw_number: String,
    /// Calendar date of the draw
    pub draw_date: Date,
    /// Time of day of the draw, if known
    pub draw_time: Option<Time>,
    /// Drawn numbers as published, free-form (e.g., `"01 05 12 23 30 + 04 11"`)
    pub numbers: String,
    /// Ticket sales for this draw
    pub sales_amount: Option<f64>,
    /// Prize pool after this draw
    pub prize_pool: Option<f64>,
    /// When the result was stored
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `LotteryResult` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each result belongs to one lottery type
    #[sea_orm(
        belongs_to = "super::lottery_type::Entity",
        from = "Column::LotteryTypeId",
        to = "super::lottery_type::Column::Id"
    )]
    LotteryType,
}

impl Related<super::lottery_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LotteryType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
