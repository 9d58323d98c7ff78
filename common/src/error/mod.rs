//! Error types for the cuadre workspace
//!
//! This module provides a unified error type shared by the engine, the ledger
//! service and the CLI, together with helpers for adding context.

use std::fmt::Display;
use thiserror::Error;

/// Reconciliation error type
#[derive(Debug, Error)]
pub enum Error {
    /// Exchange rate missing, zero or negative
    #[error("Invalid exchange rate: {0}")]
    InvalidExchangeRate(String),

    /// Amount that cannot be represented as money (NaN, infinite, out of range)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Error when a ledger entry cannot be found
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// Generic validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Decimal conversion or overflow error
    #[error("Decimal conversion error: {0}")]
    DecimalError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait to add context to error results
pub trait ErrorExt<T> {
    /// Add context information to an error
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T> ErrorExt<T> for Result<T> {
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        self.map_err(|e| {
            let context = context_fn().to_string();
            match e {
                Error::InvalidExchangeRate(msg) => Error::InvalidExchangeRate(format!("{}: {}", context, msg)),
                Error::InvalidAmount(msg) => Error::InvalidAmount(format!("{}: {}", context, msg)),
                Error::EntryNotFound(msg) => Error::EntryNotFound(format!("{}: {}", context, msg)),
                Error::ValidationError(msg) => Error::ValidationError(format!("{}: {}", context, msg)),
                Error::ConfigurationError(msg) => Error::ConfigurationError(format!("{}: {}", context, msg)),
                Error::Internal(msg) => Error::Internal(format!("{}: {}", context, msg)),
                Error::Serialization(e) => Error::Serialization(e),
                Error::DecimalError(msg) => Error::DecimalError(format!("{}: {}", context, msg)),
            }
        })
    }
}

/// From rust_decimal::Error
impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::DecimalError(err.to_string())
    }
}
