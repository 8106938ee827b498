//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod lottery_result;
pub mod lottery_type;
pub mod system_state;

// Re-export specific types to avoid conflicts
pub use lottery_result::{
    Column as LotteryResultColumn, Entity as LotteryResult, Model as LotteryResultModel,
};
pub use lottery_type::{
    Column as LotteryTypeColumn, Entity as LotteryType, Model as LotteryTypeModel,
};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
