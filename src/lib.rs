// Metapackage tying the workspace crates together for cross-crate tests

pub use common;
pub use cuadre_engine;
pub use ledger_service;
