//! Claim sub-records
//!
//! Claims are owned exclusively by their parent policy document and are never
//! persisted independently. The engine assigns claim identifiers; callers
//! never supply them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Claim lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClaimStatus::Pending => "PENDING",
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// A claim embedded in a policy document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub claim_id: String,
    pub date_submitted: DateTime<Utc>,
    pub amount: Decimal,
    pub status: ClaimStatus,
    pub description: String,
    pub documents: Vec<String>,
}

/// Caller payload for submitting a new claim
///
/// The claim id and initial PENDING status are assigned by the engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub amount: Decimal,
    pub description: String,
    #[serde(default)]
    pub documents: Vec<String>,
}

/// Builds a claim identifier in the externally observable
/// `CLM-<submission-epoch-ms>-<1-based-sequence-in-policy>` format.
///
/// The format is part of the wire contract and must be preserved exactly.
/// Two submissions within the same millisecond at the same sequence position
/// could collide; the format carries no stronger uniqueness guarantee.
pub(crate) fn claim_id(submitted: DateTime<Utc>, sequence: usize) -> String {
    format!("CLM-{}-{}", submitted.timestamp_millis(), sequence)
}
