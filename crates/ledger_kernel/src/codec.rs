//! Document codec
//!
//! Entity documents travel to and from the store as UTF-8 JSON. Field names
//! and date formats are part of the external wire contract, so the codec is
//! a thin seam over `serde_json` and the shapes live on the document types.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::EngineError;

/// Encodes a document to its stored byte representation
pub fn encode<T: Serialize>(doc: &T) -> Result<Vec<u8>, EngineError> {
    serde_json::to_vec(doc).map_err(|e| EngineError::decode(format!("encode: {e}")))
}

/// Decodes a stored byte representation back into a document
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, EngineError> {
    serde_json::from_slice(bytes).map_err(EngineError::decode)
}
