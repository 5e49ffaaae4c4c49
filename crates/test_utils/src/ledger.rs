//! In-memory ledger gateway double
//!
//! `MemoryLedger` mimics the external store's contract closely enough for
//! the engine's tests: per-key append-only change logs, last-writer-wins
//! current values, and a single-field equality selector. An `offline`
//! switch simulates the store being unavailable so tests can exercise
//! backend-failure propagation.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use ledger_kernel::{EngineError, HistoryEntry, LedgerGateway, QueryHit};

#[derive(Debug, Clone)]
struct StoredVersion {
    tx_id: String,
    timestamp_seconds: i64,
    value: Vec<u8>,
}

/// In-memory `LedgerGateway` implementation for tests
#[derive(Default)]
pub struct MemoryLedger {
    logs: Mutex<HashMap<String, Vec<StoredVersion>>>,
    offline: AtomicBool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with a backend error
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of committed writes under `key`
    pub fn write_count(&self, key: &str) -> usize {
        self.logs
            .lock()
            .unwrap()
            .get(key)
            .map(|log| log.len())
            .unwrap_or(0)
    }

    fn check_online(&self) -> Result<(), EngineError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(EngineError::backend("store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerGateway for MemoryLedger {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, EngineError> {
        self.check_online()?;
        let logs = self.logs.lock().unwrap();
        Ok(logs.get(key).and_then(|log| log.last()).map(|v| v.value.clone()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), EngineError> {
        self.check_online()?;
        let mut logs = self.logs.lock().unwrap();
        logs.entry(key.to_string()).or_default().push(StoredVersion {
            tx_id: Uuid::new_v4().to_string(),
            timestamp_seconds: Utc::now().timestamp(),
            value,
        });
        Ok(())
    }

    async fn history(&self, key: &str) -> Result<Vec<HistoryEntry>, EngineError> {
        self.check_online()?;
        let logs = self.logs.lock().unwrap();
        Ok(logs
            .get(key)
            .map(|log| {
                log.iter()
                    .map(|v| HistoryEntry {
                        tx_id: v.tx_id.clone(),
                        timestamp_seconds: v.timestamp_seconds,
                        value: Some(v.value.clone()),
                        is_delete: false,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query(&self, selector_json: &str) -> Result<Vec<QueryHit>, EngineError> {
        self.check_online()?;
        let parsed: Value = serde_json::from_str(selector_json)
            .map_err(|e| EngineError::backend(format!("bad selector: {e}")))?;
        let selector = parsed
            .get("selector")
            .and_then(Value::as_object)
            .ok_or_else(|| EngineError::backend("selector object missing"))?;

        let logs = self.logs.lock().unwrap();
        let mut keys: Vec<&String> = logs.keys().collect();
        keys.sort();

        let mut hits = Vec::new();
        for key in keys {
            let Some(version) = logs[key].last() else { continue };
            // Documents that do not parse still match no selector; the
            // engine's decode-skip behavior is exercised separately.
            let doc: Value = match serde_json::from_slice(&version.value) {
                Ok(doc) => doc,
                Err(_) => continue,
            };
            let matches = selector
                .iter()
                .all(|(field, expected)| doc.get(field) == Some(expected));
            if matches {
                hits.push(QueryHit {
                    key: key.clone(),
                    value: version.value.clone(),
                });
            }
        }
        Ok(hits)
    }
}
