//! Unit tests for the Policy document rules
//!
//! Covers create validation, the status transition guard, claim submission
//! and adjudication, and the derived coverage values.

use chrono::{Duration, Utc};
use domain_insurance::{
    ClaimRequest, ClaimStatus, InsuranceTerms, Policy, PolicyDraft, PolicyStatus, PolicyType,
};
use ledger_kernel::EngineError;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn test_terms() -> InsuranceTerms {
    InsuranceTerms {
        deductible: dec!(250),
        copayment: dec!(20),
        exclusions: vec!["pre-existing".to_string()],
        waiting_period: 30,
        max_coverage: dec!(5000),
    }
}

fn test_draft() -> PolicyDraft {
    PolicyDraft {
        policy_id: "POL-001".to_string(),
        policy_holder_name: "Asha Verma".to_string(),
        policy_holder_id: "HOLDER-9".to_string(),
        policy_type: PolicyType::Health,
        coverage_amount: dec!(5000),
        premium: dec!(200),
        start_date: Utc::now() + Duration::days(1),
        end_date: Utc::now() + Duration::days(366),
        status: PolicyStatus::Active,
        terms: test_terms(),
        claims: vec![],
        created_at: None,
    }
}

fn claim(amount: Decimal) -> ClaimRequest {
    ClaimRequest {
        amount,
        description: "test claim".to_string(),
        documents: vec![],
    }
}

mod creation {
    use super::*;

    #[test]
    fn valid_draft_creates_policy() {
        let policy = Policy::new(test_draft()).unwrap();
        assert_eq!(policy.status, PolicyStatus::Active);
        assert!(policy.claims.is_empty());
    }

    #[test]
    fn empty_policy_id_is_rejected() {
        let mut draft = test_draft();
        draft.policy_id = "".to_string();
        let result = Policy::new(draft);
        assert!(matches!(result, Err(EngineError::Validation { field, .. }) if field == "policyId"));
    }

    #[test]
    fn empty_holder_name_is_rejected() {
        let mut draft = test_draft();
        draft.policy_holder_name = "  ".to_string();
        assert!(Policy::new(draft).is_err());
    }

    #[test]
    fn coverage_below_minimum_is_rejected() {
        let mut draft = test_draft();
        draft.coverage_amount = dec!(999);
        draft.premium = dec!(100);
        let result = Policy::new(draft);
        assert!(
            matches!(result, Err(EngineError::Validation { field, .. }) if field == "coverageAmount")
        );
    }

    #[test]
    fn coverage_at_minimum_is_accepted() {
        let mut draft = test_draft();
        draft.coverage_amount = dec!(1000);
        draft.premium = dec!(100);
        assert!(Policy::new(draft).is_ok());
    }

    #[test]
    fn premium_below_minimum_is_rejected() {
        let mut draft = test_draft();
        draft.premium = dec!(99);
        let result = Policy::new(draft);
        assert!(matches!(result, Err(EngineError::Validation { field, .. }) if field == "premium"));
    }

    #[test]
    fn premium_above_coverage_is_rejected() {
        let mut draft = test_draft();
        draft.coverage_amount = dec!(1000);
        draft.premium = dec!(1001);
        let result = Policy::new(draft);
        assert!(matches!(result, Err(EngineError::Validation { field, .. }) if field == "premium"));
    }

    #[test]
    fn end_date_not_after_start_is_rejected() {
        let mut draft = test_draft();
        draft.end_date = draft.start_date;
        let result = Policy::new(draft);
        assert!(matches!(result, Err(EngineError::Validation { field, .. }) if field == "endDate"));
    }

    #[test]
    fn pending_policy_may_not_start_in_the_past() {
        let mut draft = test_draft();
        draft.status = PolicyStatus::Pending;
        draft.start_date = Utc::now() - Duration::days(1);
        let result = Policy::new(draft);
        assert!(
            matches!(result, Err(EngineError::Validation { field, .. }) if field == "startDate")
        );
    }

    #[test]
    fn active_policy_may_start_in_the_past() {
        let mut draft = test_draft();
        draft.status = PolicyStatus::Active;
        draft.start_date = Utc::now() - Duration::days(30);
        assert!(Policy::new(draft).is_ok());
    }
}

mod transitions {
    use super::*;

    #[test]
    fn live_states_move_freely() {
        let mut policy = Policy::new(test_draft()).unwrap();
        policy.update_status(PolicyStatus::Pending).unwrap();
        policy.update_status(PolicyStatus::Active).unwrap();
        policy.update_status(PolicyStatus::Claimed).unwrap();
        policy.update_status(PolicyStatus::Active).unwrap();
    }

    #[test]
    fn cancelled_blocks_every_exit() {
        for target in [
            PolicyStatus::Pending,
            PolicyStatus::Active,
            PolicyStatus::Expired,
            PolicyStatus::Claimed,
            PolicyStatus::Cancelled,
        ] {
            let mut policy = Policy::new(test_draft()).unwrap();
            policy.update_status(PolicyStatus::Cancelled).unwrap();
            let result = policy.update_status(target);
            assert!(
                matches!(result, Err(EngineError::InvalidTransition { .. })),
                "cancelled -> {target} should be blocked"
            );
        }
    }

    #[test]
    fn expired_only_admits_claimed() {
        for target in [
            PolicyStatus::Pending,
            PolicyStatus::Active,
            PolicyStatus::Cancelled,
            PolicyStatus::Expired,
        ] {
            let mut policy = Policy::new(test_draft()).unwrap();
            policy.update_status(PolicyStatus::Expired).unwrap();
            let result = policy.update_status(target);
            assert!(
                matches!(result, Err(EngineError::InvalidTransition { .. })),
                "expired -> {target} should be blocked"
            );
        }

        let mut policy = Policy::new(test_draft()).unwrap();
        policy.update_status(PolicyStatus::Expired).unwrap();
        policy.update_status(PolicyStatus::Claimed).unwrap();
    }
}

mod claims {
    use super::*;

    #[test]
    fn submit_requires_active_policy() {
        let mut policy = Policy::new(test_draft()).unwrap();
        policy.update_status(PolicyStatus::Pending).unwrap();

        let result = policy.submit_claim(claim(dec!(100)));
        assert!(matches!(result, Err(EngineError::InvalidState { .. })));
        assert!(policy.claims.is_empty());
    }

    #[test]
    fn submitted_claim_is_pending_with_engine_assigned_id() {
        let mut policy = Policy::new(test_draft()).unwrap();
        let id = policy.submit_claim(claim(dec!(3000))).unwrap();

        assert_eq!(policy.claims.len(), 1);
        assert_eq!(policy.claims[0].claim_id, id);
        assert_eq!(policy.claims[0].status, ClaimStatus::Pending);
    }

    #[test]
    fn coverage_is_checked_against_approved_total_only() {
        let mut policy = Policy::new(test_draft()).unwrap();
        policy.submit_claim(claim(dec!(3000))).unwrap();

        // The first claim is PENDING, so the full coverage is still open.
        policy.submit_claim(claim(dec!(4000))).unwrap();
        assert_eq!(policy.claims.len(), 2);
    }

    #[test]
    fn over_coverage_submission_leaves_claims_unchanged() {
        let mut policy = Policy::new(test_draft()).unwrap();
        let id = policy.submit_claim(claim(dec!(3000))).unwrap();
        policy.update_claim_status(&id, ClaimStatus::Approved).unwrap();

        let before = policy.claims.clone();
        let result = policy.submit_claim(claim(dec!(2500)));
        assert!(matches!(result, Err(EngineError::CoverageExceeded { .. })));
        assert_eq!(policy.claims, before);
    }

    #[test]
    fn updating_a_missing_claim_fails_with_not_found() {
        let mut policy = Policy::new(test_draft()).unwrap();
        let result = policy.update_claim_status("CLM-0-1", ClaimStatus::Approved);
        assert!(matches!(result, Err(EngineError::NotFound { .. })));
    }

    #[test]
    fn only_pending_claims_can_be_updated() {
        let mut policy = Policy::new(test_draft()).unwrap();
        let id = policy.submit_claim(claim(dec!(1000))).unwrap();
        policy.update_claim_status(&id, ClaimStatus::Rejected).unwrap();

        let result = policy.update_claim_status(&id, ClaimStatus::Approved);
        assert!(matches!(result, Err(EngineError::InvalidState { .. })));
    }

    #[test]
    fn approval_is_not_rechecked_against_coverage() {
        // Two claims that are individually admissible may both be approved
        // even though together they pass the coverage amount; coverage is a
        // submission-time check only.
        let mut policy = Policy::new(test_draft()).unwrap();
        let first = policy.submit_claim(claim(dec!(3000))).unwrap();
        let second = policy.submit_claim(claim(dec!(4000))).unwrap();

        policy.update_claim_status(&first, ClaimStatus::Approved).unwrap();
        policy.update_claim_status(&second, ClaimStatus::Approved).unwrap();

        assert_eq!(policy.approved_claims_total(), dec!(7000));
        assert_eq!(policy.remaining_coverage(), Decimal::ZERO);
    }

    #[test]
    fn attached_documents_are_not_deduplicated() {
        let mut policy = Policy::new(test_draft()).unwrap();
        let id = policy.submit_claim(claim(dec!(100))).unwrap();

        policy.attach_claim_document(&id, "DOC-1").unwrap();
        policy.attach_claim_document(&id, "DOC-1").unwrap();

        assert_eq!(policy.claims[0].documents, vec!["DOC-1", "DOC-1"]);
    }

    #[test]
    fn attach_to_missing_claim_fails_with_not_found() {
        let mut policy = Policy::new(test_draft()).unwrap();
        let result = policy.attach_claim_document("CLM-0-1", "DOC-1");
        assert!(matches!(result, Err(EngineError::NotFound { .. })));
    }
}

mod derived_values {
    use super::*;

    #[test]
    fn remaining_coverage_tracks_approvals_only() {
        let mut policy = Policy::new(test_draft()).unwrap();
        assert_eq!(policy.remaining_coverage(), dec!(5000));

        let id = policy.submit_claim(claim(dec!(3000))).unwrap();
        // Still PENDING: nothing approved yet.
        assert_eq!(policy.remaining_coverage(), dec!(5000));

        policy.update_claim_status(&id, ClaimStatus::Approved).unwrap();
        assert_eq!(policy.remaining_coverage(), dec!(2000));

        let result = policy.submit_claim(claim(dec!(2500)));
        assert!(matches!(
            result,
            Err(EngineError::CoverageExceeded { requested, available })
                if requested == dec!(2500) && available == dec!(2000)
        ));
    }

    #[test]
    fn remaining_validity_counts_whole_days() {
        let policy = Policy::new(test_draft()).unwrap();
        let days = policy.remaining_validity_days();
        assert!(days >= 365 && days <= 366, "got {days}");
        assert!(!policy.is_expired());
    }

    #[test]
    fn past_end_date_means_expired_and_zero_validity() {
        let mut draft = test_draft();
        draft.start_date = Utc::now() - Duration::days(400);
        draft.end_date = Utc::now() - Duration::days(10);
        let policy = Policy::new(draft).unwrap();

        assert!(policy.is_expired());
        assert_eq!(policy.remaining_validity_days(), 0);
    }
}

proptest! {
    /// After any sequence of submissions and adjudications, remaining
    /// coverage equals max(coverageAmount - approved total, 0).
    #[test]
    fn remaining_coverage_identity_holds(
        ops in prop::collection::vec((1u32..=2000, any::<bool>()), 0..20)
    ) {
        let mut policy = Policy::new(test_draft()).unwrap();
        let mut approved_total = Decimal::ZERO;

        for (amount, approve) in ops {
            let amount = Decimal::from(amount);
            if let Ok(id) = policy.submit_claim(claim(amount)) {
                if approve {
                    policy.update_claim_status(&id, ClaimStatus::Approved).unwrap();
                    approved_total += amount;
                }
            }
        }

        prop_assert_eq!(policy.approved_claims_total(), approved_total);
        let expected = (policy.coverage_amount - approved_total).max(Decimal::ZERO);
        prop_assert_eq!(policy.remaining_coverage(), expected);
    }
}
