//! Common types and utilities for the cuadre workspace
//!
//! This library contains the shared money helpers, error handling and domain
//! models used by the reconciliation engine, the ledger service and the CLI.

pub mod error;
pub mod model;
pub mod decimal;

/// Re-export important types
pub use error::{Error, Result, ErrorExt};
pub use decimal::*;
