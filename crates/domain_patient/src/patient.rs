//! Patient document and its sub-records
//!
//! The patient domain carries deliberately weaker guarantees than the
//! policy and product domains: medical-record and consent statuses are
//! caller-supplied enumerations with no engine-enforced transition graph.
//! This asymmetry is intentional scope, not a gap — the engine's job here
//! is append-only history and consent bookkeeping, not adjudication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledger_kernel::EngineError;

/// Patient lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatientStatus {
    Active,
    Inactive,
    Archived,
}

/// Medical record lifecycle states (caller-supplied, not guarded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedicalRecordStatus {
    Active,
    Completed,
    Cancelled,
}

/// Prescription lifecycle states (caller-supplied, not guarded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrescriptionStatus {
    Active,
    Completed,
    Cancelled,
}

/// Consent lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentStatus {
    Active,
    Revoked,
    Expired,
}

/// Access level granted by a consent entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    Read,
    Write,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub contact_info: ContactInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub prescription_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub prescribed_by: String,
    pub status: PrescriptionStatus,
}

/// A medical record appended to the patient's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub record_id: String,
    pub timestamp: DateTime<Utc>,
    pub doctor_id: String,
    pub diagnosis: String,
    pub treatment: String,
    #[serde(default)]
    pub prescriptions: Vec<Prescription>,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub status: MedicalRecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceInfo {
    pub policy_number: String,
    pub provider: String,
    pub valid_until: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_details: Option<String>,
}

/// A consent entry with its validity window
///
/// `consentId` is caller-supplied and not checked for uniqueness at grant
/// time; callers are expected to generate unique ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    pub consent_id: String,
    pub grantee_name: String,
    pub grantee_id: String,
    pub access_level: AccessLevel,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub purpose: String,
    pub status: ConsentStatus,
}

/// The stored patient document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub patient_id: String,
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub medical_history: Vec<MedicalRecord>,
    pub insurance_info: InsuranceInfo,
    #[serde(default)]
    pub consent: Vec<ConsentRecord>,
    pub last_updated: DateTime<Utc>,
    pub status: PatientStatus,
}

impl Patient {
    /// Appends a medical record; no ordering or dedup constraint
    pub fn append_medical_record(&mut self, record: MedicalRecord) {
        self.medical_history.push(record);
        self.touch();
    }

    /// Appends a consent entry; duplicate `consentId`s are possible
    pub fn grant_consent(&mut self, consent: ConsentRecord) {
        self.consent.push(consent);
        self.touch();
    }

    /// Marks the consent entry with the given id as REVOKED
    ///
    /// Other entries are untouched, including any duplicates beyond the
    /// first match.
    ///
    /// # Errors
    ///
    /// `NotFound` if no entry carries the id.
    pub fn revoke_consent(&mut self, consent_id: &str) -> Result<(), EngineError> {
        let entry = self
            .consent
            .iter_mut()
            .find(|c| c.consent_id == consent_id)
            .ok_or_else(|| EngineError::not_found("consent", consent_id))?;

        entry.status = ConsentStatus::Revoked;
        self.touch();
        Ok(())
    }

    pub(crate) fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}
