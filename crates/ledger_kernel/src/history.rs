//! Lazy projection over a key's change log
//!
//! The gateway hands back raw `HistoryEntry` values; consumers usually want
//! the decoded document per modification. `HistoryProjection` decodes each
//! entry on demand, skipping values that no longer parse instead of aborting
//! the whole traversal: an old document written by a previous schema revision
//! must not make the key's history unreadable.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::warn;

use crate::codec;
use crate::ports::HistoryEntry;

/// One decoded modification of a key
///
/// `value` is `None` for deletion markers. Entries whose value fails to
/// decode are dropped by the projection and never surface here.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord<T> {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: Option<T>,
    pub is_delete: bool,
}

/// Lazy, finite, restartable traversal of a key's history
///
/// Decoding happens one entry at a time as the iterator is driven, so a
/// consumer that stops early never pays for the rest. `restart` rewinds to
/// the first entry without going back to the gateway.
pub struct HistoryProjection<T> {
    entries: Vec<HistoryEntry>,
    pos: usize,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> HistoryProjection<T> {
    /// Wraps the raw change log handed back by the gateway
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries,
            pos: 0,
            _marker: PhantomData,
        }
    }

    /// Rewinds the traversal to the oldest entry
    pub fn restart(&mut self) {
        self.pos = 0;
    }

    /// Number of raw entries, decoded or not
    pub fn raw_len(&self) -> usize {
        self.entries.len()
    }
}

impl<T: DeserializeOwned> Iterator for HistoryProjection<T> {
    type Item = HistoryRecord<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.entries.len() {
            let entry = &self.entries[self.pos];
            self.pos += 1;

            let value = match &entry.value {
                Some(bytes) => match codec::decode::<T>(bytes) {
                    Ok(doc) => Some(doc),
                    Err(e) => {
                        warn!(tx_id = %entry.tx_id, error = %e, "skipping undecodable history entry");
                        continue;
                    }
                },
                None => None,
            };

            let timestamp = Utc
                .timestamp_opt(entry.timestamp_seconds, 0)
                .single()
                .unwrap_or_default();

            return Some(HistoryRecord {
                tx_id: entry.tx_id.clone(),
                timestamp,
                value,
                is_delete: entry.is_delete,
            });
        }
        None
    }
}
