//! Policy entity service
//!
//! Orchestrates load -> validate -> mutate -> persist against the ledger
//! gateway. Each operation reconstructs the policy in full from the stored
//! document; a failed rule means the terminal write never happens. The
//! service holds no state between invocations and relies on the platform
//! for per-key ordering.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;

use ledger_kernel::{store, EngineError, HistoryProjection, LedgerGateway};

use crate::claim::{ClaimRequest, ClaimStatus};
use crate::policy::{Policy, PolicyDraft, PolicyStatus, PolicyType};

const ENTITY: &str = "policy";

/// Entity service for insurance policies
pub struct PolicyService {
    gateway: Arc<dyn LedgerGateway>,
}

impl PolicyService {
    pub fn new(gateway: Arc<dyn LedgerGateway>) -> Self {
        Self { gateway }
    }

    /// Validates and stores a brand-new policy
    ///
    /// # Errors
    ///
    /// `DuplicateKey` if the key already holds a value; `Validation` per the
    /// create invariants.
    #[instrument(skip(self, draft), fields(policy_id = %draft.policy_id))]
    pub async fn create_policy(&self, draft: PolicyDraft) -> Result<Policy, EngineError> {
        let policy = Policy::new(draft)?;
        store::create(self.gateway.as_ref(), ENTITY, &policy.policy_id, &policy).await?;
        Ok(policy)
    }

    /// Loads the current policy document
    pub async fn get_policy(&self, policy_id: &str) -> Result<Policy, EngineError> {
        store::load(self.gateway.as_ref(), ENTITY, policy_id).await
    }

    /// Drives the policy status through the transition guard
    #[instrument(skip(self), fields(policy_id))]
    pub async fn update_status(
        &self,
        policy_id: &str,
        new_status: PolicyStatus,
    ) -> Result<Policy, EngineError> {
        let mut policy = self.get_policy(policy_id).await?;
        policy.update_status(new_status)?;
        store::save(self.gateway.as_ref(), ENTITY, policy_id, &policy).await?;
        Ok(policy)
    }

    /// Submits a claim against an ACTIVE policy
    ///
    /// Returns the engine-assigned claim id.
    #[instrument(skip(self, request), fields(policy_id))]
    pub async fn submit_claim(
        &self,
        policy_id: &str,
        request: ClaimRequest,
    ) -> Result<String, EngineError> {
        let mut policy = self.get_policy(policy_id).await?;
        let claim_id = policy.submit_claim(request)?;
        store::save(self.gateway.as_ref(), ENTITY, policy_id, &policy).await?;
        Ok(claim_id)
    }

    /// Sets the status of a PENDING claim
    #[instrument(skip(self), fields(policy_id, claim_id))]
    pub async fn update_claim_status(
        &self,
        policy_id: &str,
        claim_id: &str,
        new_status: ClaimStatus,
    ) -> Result<Policy, EngineError> {
        let mut policy = self.get_policy(policy_id).await?;
        policy.update_claim_status(claim_id, new_status)?;
        store::save(self.gateway.as_ref(), ENTITY, policy_id, &policy).await?;
        Ok(policy)
    }

    /// Appends a document identifier to an existing claim
    #[instrument(skip(self), fields(policy_id, claim_id))]
    pub async fn attach_claim_document(
        &self,
        policy_id: &str,
        claim_id: &str,
        document_id: &str,
    ) -> Result<Policy, EngineError> {
        let mut policy = self.get_policy(policy_id).await?;
        policy.attach_claim_document(claim_id, document_id)?;
        store::save(self.gateway.as_ref(), ENTITY, policy_id, &policy).await?;
        Ok(policy)
    }

    /// Coverage still available under the policy; read-only
    pub async fn remaining_coverage(&self, policy_id: &str) -> Result<Decimal, EngineError> {
        let policy = self.get_policy(policy_id).await?;
        Ok(policy.remaining_coverage())
    }

    /// Lazy decoded projection of the policy's change history
    pub async fn history(&self, policy_id: &str) -> Result<HistoryProjection<Policy>, EngineError> {
        store::history(self.gateway.as_ref(), policy_id).await
    }

    /// All policies held by the given policyholder
    pub async fn find_by_holder(&self, holder_id: &str) -> Result<Vec<Policy>, EngineError> {
        store::query_by_field(self.gateway.as_ref(), "policyHolderID", holder_id).await
    }

    /// All policies of the given type
    pub async fn find_by_type(&self, policy_type: PolicyType) -> Result<Vec<Policy>, EngineError> {
        store::query_by_field(self.gateway.as_ref(), "policyType", &policy_type.to_string()).await
    }
}
