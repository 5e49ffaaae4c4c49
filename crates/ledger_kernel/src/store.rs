//! Store orchestration helpers
//!
//! Every entity service runs the same load -> validate -> mutate -> persist
//! sequence against the gateway. These helpers write that shape once so the
//! domain crates only contribute their rules. None of them retries, and a
//! failed check upstream means the single terminal `put` never happens.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::codec;
use crate::error::EngineError;
use crate::history::HistoryProjection;
use crate::ports::LedgerGateway;

/// Loads and decodes the document under `key`
///
/// Fails with `NotFound` if the key holds no value. A malformed stored
/// document surfaces as `Decode` here because the caller is about to
/// mutate and rewrite it.
pub async fn load<T: DeserializeOwned>(
    gateway: &dyn LedgerGateway,
    entity: &str,
    key: &str,
) -> Result<T, EngineError> {
    let bytes = gateway
        .get(key)
        .await?
        .ok_or_else(|| EngineError::not_found(entity, key))?;
    debug!(entity, key, "loaded document");
    codec::decode(&bytes)
}

/// Writes a brand-new document under `key`
///
/// Fails with `DuplicateKey` if the key already holds a value; creates are
/// the only operations that require prior absence.
pub async fn create<T: Serialize>(
    gateway: &dyn LedgerGateway,
    entity: &str,
    key: &str,
    doc: &T,
) -> Result<(), EngineError> {
    if gateway.get(key).await?.is_some() {
        return Err(EngineError::duplicate_key(entity, key));
    }
    let bytes = codec::encode(doc)?;
    gateway.put(key, bytes).await?;
    debug!(entity, key, "created document");
    Ok(())
}

/// Persists an updated document under `key`
///
/// The caller has already validated the mutation on its in-memory copy;
/// this is the single terminal write of the operation.
pub async fn save<T: Serialize>(
    gateway: &dyn LedgerGateway,
    entity: &str,
    key: &str,
    doc: &T,
) -> Result<(), EngineError> {
    let bytes = codec::encode(doc)?;
    gateway.put(key, bytes).await?;
    debug!(entity, key, "saved document");
    Ok(())
}

/// Produces the lazy decoded projection of a key's change log
pub async fn history<T: DeserializeOwned>(
    gateway: &dyn LedgerGateway,
    key: &str,
) -> Result<HistoryProjection<T>, EngineError> {
    let entries = gateway.history(key).await?;
    Ok(HistoryProjection::new(entries))
}

/// Runs a single-field equality query and decodes the matches
///
/// Hits whose value fails to decode are logged and dropped rather than
/// failing the whole query.
pub async fn query_by_field<T: DeserializeOwned>(
    gateway: &dyn LedgerGateway,
    field: &str,
    value: &str,
) -> Result<Vec<T>, EngineError> {
    let selector = json!({ "selector": { field: value } }).to_string();
    let hits = gateway.query(&selector).await?;

    let mut docs = Vec::with_capacity(hits.len());
    for hit in hits {
        match codec::decode::<T>(&hit.value) {
            Ok(doc) => docs.push(doc),
            Err(e) => warn!(key = %hit.key, error = %e, "skipping undecodable query hit"),
        }
    }
    Ok(docs)
}
