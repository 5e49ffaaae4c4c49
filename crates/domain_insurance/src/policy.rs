//! Policy document and its business rules
//!
//! The policy document is the sole unit of consistency for the insurance
//! domain: claims live inside it and every mutation is validated against the
//! in-memory copy before the single terminal write.
//!
//! # Invariants
//!
//! - `premium <= coverageAmount`
//! - `coverageAmount >= 1000`, `premium >= 100`
//! - `endDate > startDate`
//! - sum of APPROVED claim amounts never exceeds `coverageAmount`,
//!   enforced at claim submission time
//!
//! # State machine
//!
//! CANCELLED is absorbing and EXPIRED may only move to CLAIMED. Every other
//! requested transition between PENDING, ACTIVE, EXPIRED, and CLAIMED is
//! permitted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use ledger_kernel::EngineError;

use crate::claim::{claim_id, Claim, ClaimRequest, ClaimStatus};

/// Minimum admissible coverage amount
pub const MINIMUM_COVERAGE: Decimal = dec!(1000);
/// Minimum admissible premium
pub const MINIMUM_PREMIUM: Decimal = dec!(100);

/// Kinds of policies the engine administers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyType {
    Health,
    Vehicle,
    Life,
    Property,
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PolicyType::Health => "HEALTH",
            PolicyType::Vehicle => "VEHICLE",
            PolicyType::Life => "LIFE",
            PolicyType::Property => "PROPERTY",
        };
        f.write_str(s)
    }
}

/// Policy lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
    Claimed,
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PolicyStatus::Pending => "PENDING",
            PolicyStatus::Active => "ACTIVE",
            PolicyStatus::Expired => "EXPIRED",
            PolicyStatus::Cancelled => "CANCELLED",
            PolicyStatus::Claimed => "CLAIMED",
        };
        f.write_str(s)
    }
}

/// Contract terms embedded in the policy document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceTerms {
    pub deductible: Decimal,
    pub copayment: Decimal,
    pub exclusions: Vec<String>,
    pub waiting_period: u32,
    pub max_coverage: Decimal,
}

/// Caller payload for creating a policy
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDraft {
    pub policy_id: String,
    pub policy_holder_name: String,
    #[serde(rename = "policyHolderID")]
    pub policy_holder_id: String,
    pub policy_type: PolicyType,
    pub coverage_amount: Decimal,
    pub premium: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: PolicyStatus,
    pub terms: InsuranceTerms,
    #[serde(default)]
    pub claims: Vec<Claim>,
    pub created_at: Option<DateTime<Utc>>,
}

/// The stored policy document
///
/// Field names and date formats follow the external JSON wire contract,
/// including the irregular `policyHolderID` capitalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub policy_id: String,
    pub policy_holder_name: String,
    #[serde(rename = "policyHolderID")]
    pub policy_holder_id: String,
    pub policy_type: PolicyType,
    pub coverage_amount: Decimal,
    pub premium: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: PolicyStatus,
    pub claims: Vec<Claim>,
    pub terms: InsuranceTerms,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Policy {
    /// Validates a draft and produces the initial policy document
    ///
    /// # Errors
    ///
    /// Fails with `Validation` naming the offending field when any identity
    /// field is empty, the amount or date invariants are violated, or a
    /// PENDING policy is backdated.
    pub fn new(draft: PolicyDraft) -> Result<Self, EngineError> {
        let now = Utc::now();

        require_non_empty("policyId", &draft.policy_id)?;
        require_non_empty("policyHolderName", &draft.policy_holder_name)?;
        require_non_empty("policyHolderID", &draft.policy_holder_id)?;

        if draft.coverage_amount < MINIMUM_COVERAGE {
            return Err(EngineError::validation(
                "coverageAmount",
                format!("must be at least {MINIMUM_COVERAGE}"),
            ));
        }
        if draft.premium < MINIMUM_PREMIUM {
            return Err(EngineError::validation(
                "premium",
                format!("must be at least {MINIMUM_PREMIUM}"),
            ));
        }
        if draft.premium > draft.coverage_amount {
            return Err(EngineError::validation(
                "premium",
                "cannot be greater than coverage amount",
            ));
        }
        if draft.end_date <= draft.start_date {
            return Err(EngineError::validation(
                "endDate",
                "must be after start date",
            ));
        }
        // New policies may not start retroactively.
        if draft.status == PolicyStatus::Pending && draft.start_date < now {
            return Err(EngineError::validation(
                "startDate",
                "cannot be in the past for new policies",
            ));
        }

        Ok(Self {
            policy_id: draft.policy_id,
            policy_holder_name: draft.policy_holder_name,
            policy_holder_id: draft.policy_holder_id,
            policy_type: draft.policy_type,
            coverage_amount: draft.coverage_amount,
            premium: draft.premium,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: draft.status,
            claims: draft.claims,
            terms: draft.terms,
            created_at: draft.created_at.unwrap_or(now),
            last_updated: now,
        })
    }

    /// Moves the policy to a new status through the transition guard
    ///
    /// # Errors
    ///
    /// Fails with `InvalidTransition` out of CANCELLED, or out of EXPIRED
    /// into anything but CLAIMED.
    pub fn update_status(&mut self, new_status: PolicyStatus) -> Result<(), EngineError> {
        match self.status {
            PolicyStatus::Cancelled => {
                return Err(EngineError::invalid_transition(self.status, new_status));
            }
            PolicyStatus::Expired if new_status != PolicyStatus::Claimed => {
                return Err(EngineError::invalid_transition(self.status, new_status));
            }
            _ => {}
        }

        self.status = new_status;
        self.touch();
        Ok(())
    }

    /// Appends a new claim with an engine-assigned id and PENDING status
    ///
    /// Coverage is checked here, against the sum of currently APPROVED claim
    /// amounts, and nowhere else: approving claims later never re-runs this
    /// check. Two claims that were individually admissible at submission can
    /// therefore both be approved even if their sum exceeds coverage.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the policy is ACTIVE; `CoverageExceeded` when
    /// the approved total plus the new amount would pass the coverage amount.
    pub fn submit_claim(&mut self, request: ClaimRequest) -> Result<String, EngineError> {
        if self.status != PolicyStatus::Active {
            return Err(EngineError::invalid_state(
                "claims can only be submitted to active policies",
            ));
        }

        let approved = self.approved_claims_total();
        if approved + request.amount > self.coverage_amount {
            return Err(EngineError::CoverageExceeded {
                requested: request.amount,
                available: self.coverage_amount - approved,
            });
        }

        let now = Utc::now();
        let id = claim_id(now, self.claims.len() + 1);
        self.claims.push(Claim {
            claim_id: id.clone(),
            date_submitted: now,
            amount: request.amount,
            status: ClaimStatus::Pending,
            description: request.description,
            documents: request.documents,
        });
        self.touch();
        Ok(id)
    }

    /// Sets the status of a PENDING claim
    ///
    /// # Errors
    ///
    /// `NotFound` if no claim carries the id; `InvalidState` if the claim is
    /// no longer PENDING.
    pub fn update_claim_status(
        &mut self,
        claim_id: &str,
        new_status: ClaimStatus,
    ) -> Result<(), EngineError> {
        let claim = self
            .claims
            .iter_mut()
            .find(|c| c.claim_id == claim_id)
            .ok_or_else(|| EngineError::not_found("claim", claim_id))?;

        if claim.status != ClaimStatus::Pending {
            return Err(EngineError::invalid_state("can only update pending claims"));
        }

        claim.status = new_status;
        self.touch();
        Ok(())
    }

    /// Appends a document identifier to a claim
    ///
    /// Duplicate identifiers are allowed; appends are not deduplicated.
    pub fn attach_claim_document(
        &mut self,
        claim_id: &str,
        document_id: impl Into<String>,
    ) -> Result<(), EngineError> {
        let claim = self
            .claims
            .iter_mut()
            .find(|c| c.claim_id == claim_id)
            .ok_or_else(|| EngineError::not_found("claim", claim_id))?;

        claim.documents.push(document_id.into());
        self.touch();
        Ok(())
    }

    /// Sum of all APPROVED claim amounts
    pub fn approved_claims_total(&self) -> Decimal {
        self.claims
            .iter()
            .filter(|c| c.status == ClaimStatus::Approved)
            .map(|c| c.amount)
            .sum()
    }

    /// Coverage still available: `max(coverageAmount - approved total, 0)`
    pub fn remaining_coverage(&self) -> Decimal {
        (self.coverage_amount - self.approved_claims_total()).max(Decimal::ZERO)
    }

    /// Whole days until the policy's end date, never negative
    pub fn remaining_validity_days(&self) -> i64 {
        let seconds = (self.end_date - Utc::now()).num_seconds();
        let days = (seconds as f64 / 86_400.0).ceil() as i64;
        days.max(0)
    }

    /// True once the end date has passed
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.end_date
    }

    fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), EngineError> {
    if value.trim().is_empty() {
        return Err(EngineError::validation(field, "missing required field"));
    }
    Ok(())
}
