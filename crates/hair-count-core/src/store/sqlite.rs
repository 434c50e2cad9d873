//! [`RecordStore`] over the SQLite database.

use super::{RecordStore, StoreError, StoreResult};
use crate::db::Database;
use crate::models::{local_today, NewTreatment, Patient, TreatmentRecord};

impl RecordStore for Database {
    fn insert_patient(&mut self, patient: &Patient) -> StoreResult<()> {
        if Database::get_patient(self, &patient.id)?.is_some() {
            return Err(StoreError::Duplicate(patient.id.clone()));
        }
        Ok(Database::insert_patient(self, patient)?)
    }

    fn update_patient(&mut self, patient: &Patient) -> StoreResult<bool> {
        Ok(Database::update_patient(self, patient)?)
    }

    fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
        Ok(Database::get_patient(self, id)?)
    }

    fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        Ok(Database::list_patients(self)?)
    }

    fn list_treatments(&self, patient_id: &str) -> StoreResult<Vec<TreatmentRecord>> {
        tracing::debug!(patient_id, "Listing treatments from database");
        Ok(self.list_treatments_for_patient(patient_id)?)
    }

    fn list_all_treatments(&self) -> StoreResult<Vec<TreatmentRecord>> {
        Ok(Database::list_all_treatments(self)?)
    }

    fn add_treatment(&mut self, treatment: NewTreatment) -> StoreResult<TreatmentRecord> {
        if Database::get_patient(self, &treatment.patient_id)?.is_none() {
            return Err(StoreError::UnknownPatient(treatment.patient_id));
        }
        let record = self.insert_treatment(treatment, local_today())?;
        tracing::info!(
            treatment_id = %record.id,
            patient_id = %record.patient_id,
            treatment_type = %record.treatment_type,
            "Treatment stored in database"
        );
        Ok(record)
    }

    fn delete_treatment(&mut self, id: &str) -> StoreResult<bool> {
        let deleted = Database::delete_treatment(self, id)?;
        tracing::info!(treatment_id = id, deleted, "Treatment delete in database");
        Ok(deleted)
    }
}
