//! Ledger gateway port
//!
//! The engine's sole persistence substrate is an external append-only,
//! history-preserving key-value store. This module defines the capability
//! contract the engine consumes; the platform hosting the engine supplies
//! the adapter. Ordering and commit semantics are entirely the platform's:
//! the entries handed back by `history` are already-ordered, already-committed
//! facts, and concurrent writers against the same key are last-writer-wins.
//!
//! The engine treats every call as a blocking I/O step that may fail with
//! `EngineError::Backend` and never retries internally.

use async_trait::async_trait;

use crate::error::EngineError;

/// One modification from a key's change log
///
/// `value` is `None` for deletion markers. Timestamps are seconds since the
/// Unix epoch, as recorded by the transaction-ordering platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub tx_id: String,
    pub timestamp_seconds: i64,
    pub value: Option<Vec<u8>>,
    pub is_delete: bool,
}

/// One match from a predicate query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHit {
    pub key: String,
    pub value: Vec<u8>,
}

/// Capability contract for the external ledger
///
/// Adapters implement this against the real platform; `test_utils` provides
/// an in-memory double for tests.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Returns the current value under `key`, or `None` if the key is absent
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, EngineError>;

    /// Writes `value` under `key`, appending to the key's change history
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), EngineError>;

    /// Returns the full change log for `key`, oldest first
    async fn history(&self, key: &str) -> Result<Vec<HistoryEntry>, EngineError>;

    /// Executes an opaque equality-selector query (JSON selector string)
    async fn query(&self, selector_json: &str) -> Result<Vec<QueryHit>, EngineError>;
}
