//! Record store abstraction.
//!
//! Both persistence backends sit behind [`RecordStore`]:
//!
//! - [`Database`](crate::db::Database): relational SQLite tables
//! - [`KeyValueStore`]: JSON documents under fixed keys, for clients without a
//!   database (browser local storage, app preferences)
//!
//! Stores only persist records. Summaries are always computed by
//! [`summarize`](crate::summary::summarize) over what a store returns.

mod kv;
mod sqlite;

pub use kv::*;

use thiserror::Error;

use crate::db::DbError;
use crate::models::{NewTreatment, Patient, TreatmentRecord};

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Unknown patient: {0}")]
    UnknownPatient(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for patients and their treatment sessions.
pub trait RecordStore: Send {
    /// Insert a new patient.
    fn insert_patient(&mut self, patient: &Patient) -> StoreResult<()>;

    /// Update an existing patient. Returns false if the ID is unknown.
    fn update_patient(&mut self, patient: &Patient) -> StoreResult<bool>;

    /// Get a patient by ID.
    fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>>;

    /// All patients, ordered by name.
    fn list_patients(&self) -> StoreResult<Vec<Patient>>;

    /// All treatments of one patient. Callers must not rely on the order.
    fn list_treatments(&self, patient_id: &str) -> StoreResult<Vec<TreatmentRecord>>;

    /// All treatments in the store.
    fn list_all_treatments(&self) -> StoreResult<Vec<TreatmentRecord>>;

    /// Store a treatment under a fresh ID. A missing date becomes the local today.
    ///
    /// Fails with [`StoreError::UnknownPatient`] when the patient does not exist.
    fn add_treatment(&mut self, treatment: NewTreatment) -> StoreResult<TreatmentRecord>;

    /// Delete a treatment. Returns false if nothing was removed.
    fn delete_treatment(&mut self, id: &str) -> StoreResult<bool>;

    /// Serialized copy of the whole store, for backends kept outside a database.
    ///
    /// `None` when the backend persists on its own.
    fn snapshot(&self) -> StoreResult<Option<String>> {
        Ok(None)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn insert_patient(&mut self, patient: &Patient) -> StoreResult<()> {
        (**self).insert_patient(patient)
    }

    fn update_patient(&mut self, patient: &Patient) -> StoreResult<bool> {
        (**self).update_patient(patient)
    }

    fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
        (**self).get_patient(id)
    }

    fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        (**self).list_patients()
    }

    fn list_treatments(&self, patient_id: &str) -> StoreResult<Vec<TreatmentRecord>> {
        (**self).list_treatments(patient_id)
    }

    fn list_all_treatments(&self) -> StoreResult<Vec<TreatmentRecord>> {
        (**self).list_all_treatments()
    }

    fn add_treatment(&mut self, treatment: NewTreatment) -> StoreResult<TreatmentRecord> {
        (**self).add_treatment(treatment)
    }

    fn delete_treatment(&mut self, id: &str) -> StoreResult<bool> {
        (**self).delete_treatment(id)
    }

    fn snapshot(&self) -> StoreResult<Option<String>> {
        (**self).snapshot()
    }
}
