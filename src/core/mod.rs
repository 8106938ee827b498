//! Core business logic - lottery catalogue, result mutations, the query engine
//! and aggregate statistics. Framework-agnostic; every function takes a
//! `DatabaseConnection` and returns the crate [`Result`](crate::errors::Result).

/// Lottery type catalogue and seeding
pub mod lottery_type;
/// Filtered listing, latest draws and natural-key lookup
pub mod query;
/// Create, partial update, delete and batch import of results
pub mod result;
/// Aggregate counts and sums
pub mod statistics;
/// Crawler sync boundary and integrity check
pub mod sync;
/// Key-value job bookkeeping
pub mod system_state;
