//! Ledger service: records an agency's movements and reconciles a period

pub mod service;
pub mod repository;
pub mod config;

pub use service::{LedgerService, ReconciliationReport};
pub use repository::{LedgerRepository, InMemoryLedgerRepository};
pub use config::CuadreConfig;
