//! PatientService tests against the in-memory ledger gateway
//!
//! The patient domain has no transition guards, so these focus on the
//! create/replace semantics, consent bookkeeping, and the wire contract.

use chrono::{Duration, Utc};
use domain_patient::{
    AccessLevel, ConsentRecord, ConsentStatus, ContactInfo, InsuranceInfo, MedicalRecord,
    MedicalRecordStatus, Patient, PatientService, PatientStatus, PersonalInfo,
};
use ledger_kernel::{codec, EngineError};
use std::sync::Arc;
use test_utils::MemoryLedger;

fn test_patient(patient_id: &str) -> Patient {
    Patient {
        patient_id: patient_id.to_string(),
        personal_info: PersonalInfo {
            name: "Ravi Kumar".to_string(),
            date_of_birth: "1985-03-14".to_string(),
            gender: "male".to_string(),
            contact_info: ContactInfo {
                phone: "+91-98000-00000".to_string(),
                email: "ravi@example.com".to_string(),
                address: "12 Lake Road, Chennai".to_string(),
            },
        },
        medical_history: vec![],
        insurance_info: InsuranceInfo {
            policy_number: "POL-001".to_string(),
            provider: "Acme Insurance".to_string(),
            valid_until: Utc::now() + Duration::days(365),
            coverage_details: None,
        },
        consent: vec![],
        last_updated: Utc::now(),
        status: PatientStatus::Inactive,
    }
}

fn test_record(record_id: &str) -> MedicalRecord {
    MedicalRecord {
        record_id: record_id.to_string(),
        timestamp: Utc::now(),
        doctor_id: "DOC-1".to_string(),
        diagnosis: "seasonal flu".to_string(),
        treatment: "rest and fluids".to_string(),
        prescriptions: vec![],
        attachments: vec![],
        status: MedicalRecordStatus::Active,
        notes: None,
    }
}

fn test_consent(consent_id: &str) -> ConsentRecord {
    ConsentRecord {
        consent_id: consent_id.to_string(),
        grantee_name: "Dr. Mehta".to_string(),
        grantee_id: "DOC-1".to_string(),
        access_level: AccessLevel::Read,
        valid_from: Utc::now(),
        valid_until: Utc::now() + Duration::days(90),
        purpose: "treatment".to_string(),
        status: ConsentStatus::Active,
    }
}

fn service_with_ledger() -> (PatientService, Arc<MemoryLedger>) {
    test_utils::init_tracing();
    let ledger = Arc::new(MemoryLedger::new());
    (PatientService::new(ledger.clone()), ledger)
}

#[tokio::test]
async fn create_forces_active_status_and_round_trips() {
    let (service, _ledger) = service_with_ledger();

    // The caller's status is overridden on the way in.
    let created = service.create_patient(test_patient("PAT-1")).await.unwrap();
    assert_eq!(created.status, PatientStatus::Active);

    let loaded = service.get_patient("PAT-1").await.unwrap();
    assert_eq!(loaded, created);
}

#[tokio::test]
async fn duplicate_create_fails_with_duplicate_key() {
    let (service, ledger) = service_with_ledger();
    service.create_patient(test_patient("PAT-1")).await.unwrap();

    let result = service.create_patient(test_patient("PAT-1")).await;
    assert!(matches!(result, Err(EngineError::DuplicateKey { .. })));
    assert_eq!(ledger.write_count("PAT-1"), 1);
}

#[tokio::test]
async fn update_requires_prior_existence() {
    let (service, ledger) = service_with_ledger();

    let result = service.update_patient("PAT-404", test_patient("PAT-404")).await;
    assert!(matches!(result, Err(EngineError::NotFound { .. })));
    assert_eq!(ledger.write_count("PAT-404"), 0);
}

#[tokio::test]
async fn update_replaces_the_whole_document() {
    let (service, _ledger) = service_with_ledger();
    let created = service.create_patient(test_patient("PAT-1")).await.unwrap();

    let mut replacement = test_patient("PAT-1");
    replacement.personal_info.contact_info.phone = "+91-98000-11111".to_string();
    replacement.status = PatientStatus::Archived;
    service.update_patient("PAT-1", replacement).await.unwrap();

    let loaded = service.get_patient("PAT-1").await.unwrap();
    assert_eq!(loaded.personal_info.contact_info.phone, "+91-98000-11111");
    // Unlike create, the replace keeps the caller's status untouched.
    assert_eq!(loaded.status, PatientStatus::Archived);
    assert!(loaded.last_updated >= created.last_updated);
}

#[tokio::test]
async fn medical_records_append_in_order() {
    let (service, _ledger) = service_with_ledger();
    service.create_patient(test_patient("PAT-1")).await.unwrap();

    service.append_medical_record("PAT-1", test_record("REC-1")).await.unwrap();
    service.append_medical_record("PAT-1", test_record("REC-2")).await.unwrap();

    let patient = service.get_patient("PAT-1").await.unwrap();
    let ids: Vec<&str> = patient
        .medical_history
        .iter()
        .map(|r| r.record_id.as_str())
        .collect();
    assert_eq!(ids, vec!["REC-1", "REC-2"]);
}

#[tokio::test]
async fn grant_does_not_deduplicate_consent_ids() {
    let (service, _ledger) = service_with_ledger();
    service.create_patient(test_patient("PAT-1")).await.unwrap();

    service.grant_consent("PAT-1", test_consent("CON-1")).await.unwrap();
    service.grant_consent("PAT-1", test_consent("CON-1")).await.unwrap();

    let patient = service.get_patient("PAT-1").await.unwrap();
    assert_eq!(patient.consent.len(), 2);
}

#[tokio::test]
async fn revoke_marks_only_the_first_match() {
    let (service, _ledger) = service_with_ledger();
    service.create_patient(test_patient("PAT-1")).await.unwrap();
    service.grant_consent("PAT-1", test_consent("CON-1")).await.unwrap();
    service.grant_consent("PAT-1", test_consent("CON-1")).await.unwrap();

    let patient = service.revoke_consent("PAT-1", "CON-1").await.unwrap();
    assert_eq!(patient.consent[0].status, ConsentStatus::Revoked);
    assert_eq!(patient.consent[1].status, ConsentStatus::Active);
}

#[tokio::test]
async fn revoking_unknown_consent_fails_and_does_not_write() {
    let (service, ledger) = service_with_ledger();
    service.create_patient(test_patient("PAT-1")).await.unwrap();
    let writes_before = ledger.write_count("PAT-1");

    let result = service.revoke_consent("PAT-1", "CON-404").await;
    assert!(matches!(result, Err(EngineError::NotFound { .. })));
    assert_eq!(ledger.write_count("PAT-1"), writes_before);
}

#[tokio::test]
async fn history_yields_create_plus_each_mutation_in_order() {
    let (service, _ledger) = service_with_ledger();
    service.create_patient(test_patient("PAT-1")).await.unwrap();
    service.append_medical_record("PAT-1", test_record("REC-1")).await.unwrap();
    service.grant_consent("PAT-1", test_consent("CON-1")).await.unwrap();

    let records: Vec<_> = service.history("PAT-1").await.unwrap().collect();
    assert_eq!(records.len(), 3);

    let record_counts: Vec<usize> = records
        .iter()
        .map(|r| r.value.as_ref().unwrap().medical_history.len())
        .collect();
    assert_eq!(record_counts, vec![0, 1, 1]);
    assert_eq!(records.last().unwrap().value.as_ref().unwrap().consent.len(), 1);
}

#[tokio::test]
async fn query_by_field_matches_top_level_fields() {
    let (service, _ledger) = service_with_ledger();
    service.create_patient(test_patient("PAT-1")).await.unwrap();
    service.create_patient(test_patient("PAT-2")).await.unwrap();

    let hits = service.query_by_field("patientId", "PAT-2").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].patient_id, "PAT-2");
}

#[tokio::test]
async fn wire_format_matches_the_external_contract() {
    let mut patient = test_patient("PAT-1");
    patient.status = PatientStatus::Active;
    patient.medical_history.push(test_record("REC-1"));
    patient.consent.push(test_consent("CON-1"));

    let bytes = codec::encode(&patient).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["patientId"], "PAT-1");
    assert_eq!(json["status"], "ACTIVE");
    assert_eq!(json["personalInfo"]["contactInfo"]["phone"], "+91-98000-00000");
    assert_eq!(json["medicalHistory"][0]["status"], "ACTIVE");
    assert_eq!(json["consent"][0]["accessLevel"], "READ");
    assert_eq!(json["insuranceInfo"]["policyNumber"], "POL-001");
    // Optional fields stay off the wire entirely when unset.
    assert!(json["medicalHistory"][0].get("notes").is_none());
    assert!(json["insuranceInfo"].get("coverageDetails").is_none());

    let back: Patient = codec::decode(&bytes).unwrap();
    assert_eq!(back, patient);
}
