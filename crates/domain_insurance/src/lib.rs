//! Insurance Policy Domain
//!
//! This crate implements policy administration over the external ledger:
//! the policy document, its claims, the status transition guard, and the
//! derived coverage values.
//!
//! # Policy lifecycle
//!
//! ```text
//! PENDING <-> ACTIVE <-> EXPIRED -> CLAIMED
//!     \________\____________\----> CANCELLED (absorbing)
//! ```
//!
//! CANCELLED permits no further transitions and EXPIRED may only move to
//! CLAIMED; every other requested edge between the four live states is
//! allowed.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_insurance::{PolicyService, ClaimRequest};
//!
//! let service = PolicyService::new(gateway);
//! service.create_policy(draft).await?;
//! let claim_id = service.submit_claim("POL-001", request).await?;
//! let remaining = service.remaining_coverage("POL-001").await?;
//! ```

pub mod claim;
pub mod policy;
pub mod service;

pub use claim::{Claim, ClaimRequest, ClaimStatus};
pub use policy::{
    InsuranceTerms, Policy, PolicyDraft, PolicyStatus, PolicyType, MINIMUM_COVERAGE,
    MINIMUM_PREMIUM,
};
pub use service::PolicyService;
