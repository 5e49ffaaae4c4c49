//! Quality check sub-records
//!
//! Checks are appended to the product document whether they pass or fail;
//! a failing check is history worth keeping, not an error. The pass/fail
//! outcome is always derived from the product's storage bounds, never
//! supplied by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a quality check
///
/// `Pending` is accepted on decode for compatibility with older documents
/// but is never produced: every recorded check carries a derived outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityStatus {
    Passed,
    Failed,
    Pending,
}

/// A quality check embedded in a product document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCheck {
    pub quality_check_id: String,
    pub check_date: DateTime<Utc>,
    pub status: QualityStatus,
    pub temperature: f64,
    pub humidity: f64,
    pub inspector: String,
    pub notes: Vec<String>,
}

/// Builds a check identifier in the externally observable `QC-<epoch-ms>`
/// format. The format is part of the wire contract and must be preserved.
pub(crate) fn quality_check_id(at: DateTime<Utc>) -> String {
    format!("QC-{}", at.timestamp_millis())
}
