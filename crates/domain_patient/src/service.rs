//! Patient entity service

use std::sync::Arc;
use tracing::instrument;

use ledger_kernel::{store, EngineError, HistoryProjection, LedgerGateway};

use crate::patient::{ConsentRecord, MedicalRecord, Patient, PatientStatus};

const ENTITY: &str = "patient";

/// Entity service for patient records
pub struct PatientService {
    gateway: Arc<dyn LedgerGateway>,
}

impl PatientService {
    pub fn new(gateway: Arc<dyn LedgerGateway>) -> Self {
        Self { gateway }
    }

    /// Stores a brand-new patient, forcing status ACTIVE
    ///
    /// # Errors
    ///
    /// `DuplicateKey` if the key already holds a value.
    #[instrument(skip(self, patient), fields(patient_id = %patient.patient_id))]
    pub async fn create_patient(&self, mut patient: Patient) -> Result<Patient, EngineError> {
        patient.status = PatientStatus::Active;
        patient.touch();
        let key = patient.patient_id.clone();
        store::create(self.gateway.as_ref(), ENTITY, &key, &patient).await?;
        Ok(patient)
    }

    /// Loads the current patient document
    pub async fn get_patient(&self, patient_id: &str) -> Result<Patient, EngineError> {
        store::load(self.gateway.as_ref(), ENTITY, patient_id).await
    }

    /// Replaces the patient document wholesale, re-deriving lastUpdated
    ///
    /// # Errors
    ///
    /// `NotFound` if the key holds no value.
    #[instrument(skip(self, updated), fields(patient_id))]
    pub async fn update_patient(
        &self,
        patient_id: &str,
        mut updated: Patient,
    ) -> Result<Patient, EngineError> {
        // The replace still requires prior existence.
        let _current: Patient = self.get_patient(patient_id).await?;
        updated.touch();
        store::save(self.gateway.as_ref(), ENTITY, patient_id, &updated).await?;
        Ok(updated)
    }

    /// Appends a medical record to the patient's history
    #[instrument(skip(self, record), fields(patient_id))]
    pub async fn append_medical_record(
        &self,
        patient_id: &str,
        record: MedicalRecord,
    ) -> Result<Patient, EngineError> {
        let mut patient = self.get_patient(patient_id).await?;
        patient.append_medical_record(record);
        store::save(self.gateway.as_ref(), ENTITY, patient_id, &patient).await?;
        Ok(patient)
    }

    /// Appends a consent entry with a caller-supplied id
    #[instrument(skip(self, consent), fields(patient_id))]
    pub async fn grant_consent(
        &self,
        patient_id: &str,
        consent: ConsentRecord,
    ) -> Result<Patient, EngineError> {
        let mut patient = self.get_patient(patient_id).await?;
        patient.grant_consent(consent);
        store::save(self.gateway.as_ref(), ENTITY, patient_id, &patient).await?;
        Ok(patient)
    }

    /// Marks a consent entry REVOKED
    #[instrument(skip(self), fields(patient_id, consent_id))]
    pub async fn revoke_consent(
        &self,
        patient_id: &str,
        consent_id: &str,
    ) -> Result<Patient, EngineError> {
        let mut patient = self.get_patient(patient_id).await?;
        patient.revoke_consent(consent_id)?;
        store::save(self.gateway.as_ref(), ENTITY, patient_id, &patient).await?;
        Ok(patient)
    }

    /// Lazy decoded projection of the patient's change history
    pub async fn history(
        &self,
        patient_id: &str,
    ) -> Result<HistoryProjection<Patient>, EngineError> {
        store::history(self.gateway.as_ref(), patient_id).await
    }

    /// Single-field equality query over patient documents
    pub async fn query_by_field(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Vec<Patient>, EngineError> {
        store::query_by_field(self.gateway.as_ref(), field, value).await
    }
}
