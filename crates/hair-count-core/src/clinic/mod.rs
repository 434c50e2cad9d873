//! Clinic service: validated operations over a [`RecordStore`].
//!
//! The store is handed in explicitly, so the same service runs against the
//! SQLite database or the key-value store.

mod overview;
mod seed;

pub use overview::*;
pub use seed::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{local_today, NewTreatment, Patient, PatientInput, TreatmentRecord};
use crate::store::{RecordStore, StoreError};
use crate::summary::{summarize, TreatmentSummary};
use crate::validation::{validate_patient, validate_treatment, ValidationError};

/// Clinic service errors.
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Patient not found: {0}")]
    PatientNotFound(String),
}

pub type ClinicResult<T> = Result<T, ClinicError>;

/// Everything shown on a patient's page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDetail {
    pub patient: Patient,
    /// Newest first
    pub history: Vec<TreatmentRecord>,
    pub summary: TreatmentSummary,
}

/// Clinic operations over a record store.
pub struct Clinic<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> Clinic<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // =========================================================================
    // Patients
    // =========================================================================

    /// Register a new patient.
    pub fn register_patient(&mut self, input: PatientInput) -> ClinicResult<Patient> {
        if let Err(e) = validate_patient(&input) {
            tracing::warn!(error = %e, "Rejected patient registration");
            return Err(e.into());
        }

        let patient = Patient::from_input(input);
        self.store.insert_patient(&patient)?;
        tracing::info!(patient_id = %patient.id, "Registered patient");
        Ok(patient)
    }

    /// Update a patient. Returns false if the ID is unknown.
    pub fn update_patient(&mut self, id: &str, input: PatientInput) -> ClinicResult<bool> {
        if let Err(e) = validate_patient(&input) {
            tracing::warn!(patient_id = id, error = %e, "Rejected patient update");
            return Err(e.into());
        }

        let Some(mut patient) = self.store.get_patient(id)? else {
            return Ok(false);
        };
        patient.apply(input);
        let updated = self.store.update_patient(&patient)?;
        tracing::info!(patient_id = id, updated, "Updated patient");
        Ok(updated)
    }

    pub fn patient(&self, id: &str) -> ClinicResult<Option<Patient>> {
        Ok(self.store.get_patient(id)?)
    }

    /// All patients, ordered by name.
    pub fn patients(&self) -> ClinicResult<Vec<Patient>> {
        Ok(self.store.list_patients()?)
    }

    /// Patients whose name, email or phone contains `term`.
    pub fn search_patients(&self, term: &str) -> ClinicResult<Vec<Patient>> {
        let mut patients = self.store.list_patients()?;
        patients.retain(|p| p.matches(term));
        Ok(patients)
    }

    // =========================================================================
    // Treatments
    // =========================================================================

    /// Record a session, validated against the local date.
    pub fn record_treatment(&mut self, treatment: NewTreatment) -> ClinicResult<TreatmentRecord> {
        self.record_treatment_on(treatment, local_today())
    }

    /// Record a session, validated against an explicit `today`.
    pub fn record_treatment_on(
        &mut self,
        treatment: NewTreatment,
        today: NaiveDate,
    ) -> ClinicResult<TreatmentRecord> {
        if let Err(e) = validate_treatment(&treatment, today) {
            tracing::warn!(patient_id = %treatment.patient_id, error = %e, "Rejected treatment");
            return Err(e.into());
        }

        if self.store.get_patient(&treatment.patient_id)?.is_none() {
            return Err(ClinicError::PatientNotFound(treatment.patient_id));
        }

        // The store dates undated sessions itself; pin them to the validated day.
        let treatment = NewTreatment {
            treatment_date: Some(treatment.treatment_date.unwrap_or(today)),
            ..treatment
        };
        Ok(self.store.add_treatment(treatment)?)
    }

    /// Delete a session. Returns false if it did not exist.
    pub fn delete_treatment(&mut self, id: &str) -> ClinicResult<bool> {
        Ok(self.store.delete_treatment(id)?)
    }

    /// A patient's sessions, newest first.
    pub fn treatment_history(&self, patient_id: &str) -> ClinicResult<Vec<TreatmentRecord>> {
        let mut history = self.store.list_treatments(patient_id)?;
        history.sort_by(|a, b| b.treatment_date.cmp(&a.treatment_date));
        Ok(history)
    }

    /// Discount summary for a patient. Unknown patients get the zero summary.
    pub fn treatment_summary(&self, patient_id: &str) -> ClinicResult<TreatmentSummary> {
        let history = self.store.list_treatments(patient_id)?;
        Ok(summarize(&history))
    }

    /// Patient, history and summary in one read.
    pub fn patient_detail(&self, id: &str) -> ClinicResult<Option<PatientDetail>> {
        let Some(patient) = self.store.get_patient(id)? else {
            return Ok(None);
        };
        let history = self.treatment_history(id)?;
        let summary = summarize(&history);

        Ok(Some(PatientDetail {
            patient,
            history,
            summary,
        }))
    }
}
