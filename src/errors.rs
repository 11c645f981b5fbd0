//! Unified error type for the enrollment desk.
//!
//! Configuration and window errors are construction-time defects and are never retried.
//! Database errors come from the persistence collaborator and are passed through unchanged.

use rust_decimal::Decimal;
use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// A currency format or conversion was given an unusable setting (e.g. negative decimal places)
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// What was wrong with the setting
        message: String,
    },

    /// An enrollment window whose dates are out of order
    #[error("Invalid enrollment window: {message}")]
    InvalidWindow {
        /// Which ordering rule was broken
        message: String,
    },

    /// The configuration file or environment could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the failure
        message: String,
    },

    /// A monetary amount that cannot be stored (negative, zero payment, or out of range)
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount in display units
        amount: Decimal,
    },

    /// No school year with this id
    #[error("School year not found: {id}")]
    SchoolYearNotFound {
        /// Primary key that was looked up
        id: i64,
    },

    /// No fee with this id
    #[error("Fee not found: {id}")]
    FeeNotFound {
        /// Primary key that was looked up
        id: i64,
    },

    /// Error from the persistence layer
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem error, e.g. creating the database directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
