//! Patient Record Domain
//!
//! Patient documents over the external ledger: personal and insurance
//! details, an append-only medical history, and consent entries with
//! validity windows.
//!
//! Unlike the policy and product domains there is no engine-enforced state
//! machine here: medical-record and consent statuses are caller-supplied.
//! The engine guarantees only create-once semantics, append-only history,
//! and that revoking a consent touches exactly one entry.

pub mod patient;
pub mod service;

pub use patient::{
    AccessLevel, ConsentRecord, ConsentStatus, ContactInfo, InsuranceInfo, MedicalRecord,
    MedicalRecordStatus, Patient, PatientStatus, PersonalInfo, Prescription, PrescriptionStatus,
};
pub use service::PatientService;
