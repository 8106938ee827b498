//! Unified error type for the lottery result store.
//!
//! Every fallible operation in the crate returns [`Result`]. Callers that sit on
//! top of the core (a transport layer, the scheduler binary) use
//! [`Error::kind`] to decide how to surface a failure.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Broad classification of an [`Error`], used to map failures onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced result does not exist
    NotFound,
    /// A natural key is already taken
    Conflict,
    /// The caller supplied malformed or out-of-range input
    InvalidArgument,
    /// The operation has no implementation behind it
    NotImplemented,
    /// Storage or configuration failure
    Internal,
}

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Draw number does not match the 4 to 8 digit pattern
    #[error("Invalid draw number '{draw_number}': expected 4 to 8 digits")]
    InvalidDrawNumber {
        /// The rejected draw number
        draw_number: String,
    },

    /// A monetary amount is negative or not finite
    #[error("Invalid {field}: {amount}")]
    InvalidAmount {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        amount: f64,
    },

    /// Any other malformed input (blank text, bad limit, zero page size)
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the input
        message: String,
    },

    /// A result referenced a lottery type that does not exist
    #[error("Unknown lottery type id: {lottery_type_id}")]
    UnknownLotteryType {
        /// The referenced lottery type id
        lottery_type_id: i64,
    },

    /// Result lookup by id or draw number found nothing
    #[error("Lottery result not found: {key}")]
    ResultNotFound {
        /// Id or draw number that was looked up
        key: String,
    },

    /// The (lottery type, draw number) pair is already stored
    #[error("Draw number {draw_number} already exists for lottery type {lottery_type_id}")]
    DuplicateDrawNumber {
        /// Lottery type of the duplicate
        lottery_type_id: i64,
        /// Duplicated draw number
        draw_number: String,
    },

    /// A lottery type with this code is already stored
    #[error("Lottery type code already exists: {code}")]
    DuplicateTypeCode {
        /// Duplicated code
        code: String,
    },

    /// Feature exists as an entry point only
    #[error("Not implemented: {feature}")]
    NotImplemented {
        /// Name of the missing feature
        feature: &'static str,
    },
}

impl Error {
    /// Classifies this error for the caller.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ResultNotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateDrawNumber { .. } | Self::DuplicateTypeCode { .. } => {
                ErrorKind::Conflict
            }
            Self::InvalidDrawNumber { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidArgument { .. }
            | Self::UnknownLotteryType { .. } => ErrorKind::InvalidArgument,
            Self::NotImplemented { .. } => ErrorKind::NotImplemented,
            Self::Database(_) | Self::Config { .. } => ErrorKind::Internal,
        }
    }
}

/// Returns true when the database rejected a write because of a unique index.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
