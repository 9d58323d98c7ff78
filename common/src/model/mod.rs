//! Domain models for the cuadre workspace

pub mod currency;
pub mod reconciliation;
pub mod period;
pub mod ledger;
