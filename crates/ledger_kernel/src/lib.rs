//! Ledger Kernel - Foundational types for the ledger entity engine
//!
//! This crate provides the building blocks shared by all domain crates:
//! - The unified error taxonomy for validation, state-machine, and store failures
//! - The `LedgerGateway` port consumed by every entity service
//! - The JSON document codec
//! - The lazy history projection over a key's change log
//! - The load/validate/mutate/persist store orchestration helpers
//!
//! The kernel knows nothing about any particular entity kind. Domain crates
//! own their document types and business rules; the kernel owns the shape
//! of a read-modify-write against the external ledger.

pub mod codec;
pub mod error;
pub mod history;
pub mod ports;
pub mod store;

pub use error::EngineError;
pub use history::{HistoryProjection, HistoryRecord};
pub use ports::{HistoryEntry, LedgerGateway, QueryHit};
